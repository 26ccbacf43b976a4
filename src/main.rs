use anyhow::{anyhow, bail, Result};
use is_terminal::IsTerminal;
use lazy_static::lazy_static;
use std::sync::Arc;
use time::macros::format_description;
use time::OffsetDateTime;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zonecrab::error::Error;
use zonecrab::{
    check_zone, CheckContext, Config, DynZoneSource, SharedConfig, Zone, ZoneCheckReport,
};

lazy_static! {
    static ref TIMESTAMP_FORMATTER: &'static [time::format_description::FormatItem<'static>] =
        format_description!(
            version = 2,
            "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
        );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Validate,
    Check,
}

#[derive(Debug)]
struct Args {
    action: Action,
    config_file: String,
    verbose: bool,
    zones: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut args = std::env::args();
    let program_name = args.next().unwrap_or("zonecrab".to_string());
    let args = parse_args(&program_name, args)?;

    let config = config_init(&args.config_file)?;
    let source: DynZoneSource = Arc::new(config.zone_source().await?);
    let zones = select_zones(&source, &args.zones).await?;
    let style = Style::detect();

    match args.action {
        Action::Validate => {
            render_validation(&zones, args.verbose, style);
            Ok(())
        }
        Action::Check => check(&config, &zones, args.verbose, style).await,
    }
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zonecrab=info".into()),
        )
        .init();
}

fn parse_args(program_name: &str, args: impl Iterator<Item = String>) -> Result<Args> {
    let usage = || {
        anyhow!("usage: {program_name} <validate|check> /path/to/config.json [-v|--verbose] [ZONE...]")
    };

    let mut action = None;
    let mut config_file = None;
    let mut verbose = false;
    let mut zones = vec![];
    for arg in args {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ if arg.starts_with('-') => return Err(usage()),
            "validate" if action.is_none() => action = Some(Action::Validate),
            "check" if action.is_none() => action = Some(Action::Check),
            _ if action.is_none() => return Err(usage()),
            _ if config_file.is_none() => config_file = Some(arg),
            _ => zones.push(arg),
        }
    }

    match (action, config_file) {
        (Some(action), Some(config_file)) => Ok(Args {
            action,
            config_file,
            verbose,
            zones,
        }),
        _ => Err(usage()),
    }
}

fn config_init(config_file: &str) -> Result<SharedConfig> {
    let config = Config::try_from_file(config_file)?;
    tracing::debug!("loaded config from {config_file}");
    Ok(Arc::new(config))
}

async fn select_zones(source: &DynZoneSource, names: &[String]) -> Result<Vec<Zone>> {
    if names.is_empty() {
        return Ok(source.zones().await?);
    }
    let mut zones = Vec::with_capacity(names.len());
    for name in names {
        zones.push(source.zone(name).await?);
    }
    Ok(zones)
}

async fn check(config: &SharedConfig, zones: &[Zone], verbose: bool, style: Style) -> Result<()> {
    let factory = config.resolver_factory()?;
    let options = config.check_options(verbose);

    let ctx = CheckContext::new();
    let on_signal = ctx.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("cancelling from signal");
            on_signal.cancel();
        }
    });

    let started = OffsetDateTime::now_utc()
        .format(*TIMESTAMP_FORMATTER)
        .unwrap_or_default();
    println!("drift check of {} zones started {started}", zones.len());

    let (mut drifted, mut failed) = (0, 0);
    for zone in zones {
        match check_zone(&ctx, zone, &factory, &options).await {
            Ok(report) => {
                render_report(&report, style);
                if !report.is_clean() {
                    drifted += 1;
                }
            }
            Err(err @ (Error::Incomplete { .. } | Error::Join(_))) => {
                if let Error::Incomplete { report, .. } = &err {
                    render_report(report, style);
                }
                return Err(err.into());
            }
            Err(err) => {
                tracing::error!("{}: {:#}", zone.name(), anyhow::Error::from(err));
                failed += 1;
            }
        }
    }

    if drifted + failed > 0 {
        bail!(
            "{drifted} of {} zones drifted, {failed} could not be checked",
            zones.len()
        );
    }
    tracing::info!("no drift found");
    Ok(())
}

/// ANSI colouring, only when stdout is a terminal.
#[derive(Debug, Clone, Copy)]
struct Style {
    color: bool,
}

impl Style {
    fn detect() -> Self {
        Style {
            color: std::io::stdout().is_terminal(),
        }
    }

    fn paint(self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

fn render_validation(zones: &[Zone], verbose: bool, style: Style) {
    for zone in zones {
        println!(
            "{} ({}): {} records {}",
            style.paint("1", zone.name()),
            zone.id(),
            zone.records().len(),
            style.paint("32", "valid")
        );
        if verbose {
            for record in zone.records() {
                println!("  {record}");
            }
        }
    }
}

fn render_report(report: &ZoneCheckReport, style: Style) {
    println!(
        "{}: {} matched, {} mismatched, {} missing, {} unchecked",
        style.paint("1", &report.zone),
        report.matched,
        report.mismatch.len(),
        report.missing.len(),
        report.unchecked.len()
    );
    for record in &report.mismatch {
        println!("  {} {record}", style.paint("31", "mismatch "));
    }
    for record in &report.missing {
        println!("  {} {record}", style.paint("33", "missing  "));
    }
    for unchecked in &report.unchecked {
        println!(
            "  {} {} ({})",
            style.paint("35", "unchecked"),
            unchecked.record,
            unchecked.reason
        );
    }
}
