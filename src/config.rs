use crate::check::CheckOptions;
use crate::dns::resolver::check_opts;
use crate::dns::ResolverFactory;
use crate::error::Error;
use crate::source::FileZoneSource;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::IpAddr;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_resolver::config::ResolverOpts;

pub type SharedConfig = Arc<Config>;

const CHECK_CONCURRENCY_RANGE: RangeInclusive<usize> = 1..=64;

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub zones_path: String,
    #[serde(default)]
    pub bootstrap_nameservers: Vec<IpAddr>,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout: Duration,
    #[serde(default = "default_dns_attempts")]
    pub dns_attempts: usize,
    #[serde(default = "default_check_concurrency")]
    pub check_concurrency: usize,
}

fn default_dns_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_dns_attempts() -> usize {
    2
}

fn default_check_concurrency() -> usize {
    CheckOptions::default().concurrency
}

impl Config {
    /// Load and validate a [`Config`] from the JSON file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the file can't be read, [`Error::InvalidJSON`] if it isn't a
    /// valid config, or [`Error::InvalidConfig`] if a value is out of range.
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.validate()?;
        Ok(conf)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.zones_path.is_empty() {
            return Err(Error::InvalidConfig("zones_path cannot be empty".to_string()));
        }
        if self.dns_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "dns_timeout must be at least 1 second".to_string(),
            ));
        }
        if self.dns_attempts == 0 {
            return Err(Error::InvalidConfig("dns_attempts must be at least 1".to_string()));
        }
        if !CHECK_CONCURRENCY_RANGE.contains(&self.check_concurrency) {
            return Err(Error::InvalidConfig(format!(
                "check_concurrency must be between {} and {}, not {}",
                CHECK_CONCURRENCY_RANGE.start(),
                CHECK_CONCURRENCY_RANGE.end(),
                self.check_concurrency
            )));
        }
        Ok(())
    }

    /// Options for the resolvers querying authoritative nameservers.
    #[must_use]
    pub fn resolver_opts(&self) -> ResolverOpts {
        check_opts(self.dns_timeout, self.dns_attempts)
    }

    /// A [`ResolverFactory`] bootstrapping from `bootstrap_nameservers`, or from the system
    /// resolver configuration if none are configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolver`] if the bootstrap resolver can't be constructed.
    pub fn resolver_factory(&self) -> Result<ResolverFactory, Error> {
        if self.bootstrap_nameservers.is_empty() {
            ResolverFactory::from_system_conf(self.resolver_opts())
        } else {
            ResolverFactory::from_nameservers(&self.bootstrap_nameservers, self.resolver_opts())
        }
    }

    #[must_use]
    pub fn check_options(&self, verbose: bool) -> CheckOptions {
        CheckOptions {
            verbose,
            concurrency: self.check_concurrency,
        }
    }

    /// Load the configured zone file.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FileZoneSource::try_from_file`].
    pub async fn zone_source(&self) -> Result<FileZoneSource, Error> {
        FileZoneSource::try_from_file(&self.zones_path).await
    }
}
