use crate::check::{check_record, CheckContext, CheckOptions, CheckResult, Verdict};
use crate::dns::{DynLookup, ResolverFactory};
use crate::error::Error;
use crate::model::{Record, Zone};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A record whose check produced no verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UncheckedRecord {
    pub record: Record,
    pub reason: String,
}

/// Drift report for one zone. Record lists are in the zone's canonical order and never include
/// `SOA` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ZoneCheckReport {
    pub zone: String,
    pub matched: usize,
    pub mismatch: Vec<Record>,
    pub missing: Vec<Record>,
    pub unchecked: Vec<UncheckedRecord>,
}

impl ZoneCheckReport {
    fn new(zone: &str) -> Self {
        ZoneCheckReport {
            zone: zone.to_string(),
            ..Self::default()
        }
    }

    /// True if every checked record matched and no record was left unchecked.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatch.is_empty() && self.missing.is_empty() && self.unchecked.is_empty()
    }

    /// Number of records that received a verdict.
    #[must_use]
    pub fn checked(&self) -> usize {
        self.matched + self.mismatch.len() + self.missing.len()
    }

    fn add(&mut self, record: Record, verdict: Verdict) {
        match verdict {
            Verdict::Match => self.matched += 1,
            Verdict::Mismatch => self.mismatch.push(record),
            Verdict::Missing => self.missing.push(record),
        }
    }
}

/// Check every record of `zone` against its authoritative nameserver.
///
/// # Errors
///
/// Returns the setup errors of [`ResolverFactory::for_zone`] before any record is queried, and
/// the errors of [`check_records`].
pub async fn check_zone(
    ctx: &CheckContext,
    zone: &Zone,
    factory: &ResolverFactory,
    options: &CheckOptions,
) -> Result<ZoneCheckReport, Error> {
    let resolver = tokio::select! {
        () = ctx.cancelled() => return Err(incomplete(zone)),
        resolver = factory.for_zone(zone.name()) => resolver?,
    };
    let nameserver = resolver.nameserver();
    tracing::info!(
        "checking {} against {} ({})",
        zone.name(),
        nameserver.name,
        nameserver.addr
    );
    check_records(ctx, zone, resolver.lookup(), options).await
}

/// Check every non-`SOA` record of `zone` with `resolver`, at most `options.concurrency`
/// records at a time.
///
/// Records whose query fails are reported as unchecked rather than failing the zone.
///
/// # Errors
///
/// Returns [`Error::Incomplete`] with the partial report if `ctx` is cancelled before every
/// record was checked, or [`Error::Join`] if a record check task panicked.
pub async fn check_records(
    ctx: &CheckContext,
    zone: &Zone,
    resolver: DynLookup,
    options: &CheckOptions,
) -> Result<ZoneCheckReport, Error> {
    let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, record) in zone.records().iter().enumerate() {
        if !record.rtype().is_checkable() {
            continue;
        }
        let ctx = ctx.clone();
        let record = record.clone();
        let zone_name = zone.name().to_string();
        let resolver = Arc::clone(&resolver);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => check_record(&ctx, &record, &zone_name, resolver.as_ref()).await,
                Err(_) => Err(Error::Cancelled),
            };
            (index, record, result)
        });
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(outcome) = tasks.join_next().await {
        outcomes.push(outcome?);
    }
    outcomes.sort_by_key(|(index, ..)| *index);

    let mut report = ZoneCheckReport::new(zone.name());
    let mut cancelled = false;
    for (_, record, result) in outcomes {
        match result {
            Ok(CheckResult { verdict, ttl }) => {
                let ttl = ttl.map_or_else(|| "-".to_string(), |ttl| ttl.to_string());
                if options.verbose {
                    tracing::info!("{record}: {verdict} (ttl {ttl})");
                } else {
                    tracing::debug!("{record}: {verdict} (ttl {ttl})");
                }
                report.add(record, verdict);
            }
            Err(Error::Cancelled) => {
                cancelled = true;
                report.unchecked.push(UncheckedRecord {
                    record,
                    reason: Error::Cancelled.to_string(),
                });
            }
            Err(err) => {
                let reason = error_chain(&err);
                tracing::warn!("{record}: {reason}");
                report.unchecked.push(UncheckedRecord { record, reason });
            }
        }
    }

    if cancelled {
        return Err(Error::Incomplete {
            zone: zone.name().to_string(),
            report: Box::new(report),
        });
    }
    tracing::debug!(
        "{}: {} matched, {} mismatched, {} missing, {} unchecked",
        zone.name(),
        report.matched,
        report.mismatch.len(),
        report.missing.len(),
        report.unchecked.len()
    );
    Ok(report)
}

// Cancelled before the resolver existed: nothing was checked.
fn incomplete(zone: &Zone) -> Error {
    let mut report = ZoneCheckReport::new(zone.name());
    report.unchecked = zone
        .records()
        .iter()
        .filter(|record| record.rtype().is_checkable())
        .map(|record| UncheckedRecord {
            record: record.clone(),
            reason: Error::Cancelled.to_string(),
        })
        .collect();
    Error::Incomplete {
        zone: zone.name().to_string(),
        report: Box::new(report),
    }
}

fn error_chain(err: &Error) -> String {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
