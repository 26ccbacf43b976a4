//! Drift checks: comparing a zone's intended records with what its authoritative nameserver
//! publishes.
//!
//! # Verdicts
//!
//! Every checked record gets one of three verdicts:
//!
//! - `match`: at least one live record equals the intended value.
//! - `mismatch`: records of the type exist at the name, but none equals the intended value.
//! - `missing`: the name doesn't exist, or holds no records of the type.
//!
//! A record whose query failed for any other reason (a timeout, `SERVFAIL`) gets no verdict. It
//! is listed as unchecked in the [`ZoneCheckReport`] together with the reason.
//!
//! # Comparison
//!
//! Both sides are normalized before comparing:
//!
//! | type                 | compared form                                                |
//! |----------------------|--------------------------------------------------------------|
//! | `A`, `AAAA`          | canonical address text, e.g. `2001:db8::1`                   |
//! | `CNAME`, `NS`, `PTR` | hostname without trailing dot, relative names in the zone    |
//! | `MX`                 | `<preference> <exchange>`, exchange as for `CNAME`           |
//! | `SRV`                | `<priority> <weight> <port> <target>`, target as for `CNAME` |
//! | `TXT`                | one quoted string, segments joined without separator         |
//! | `CAA`                | presentation text                                            |
//!
//! `SOA` records are never checked.
//!
//! E.g. in zone `example.com` the record `MX @ "10 mail"` is compared as `10 mail.example.com`,
//! and matches the live answer:
//!
//! ```bash
//! ❯ dig @192.0.2.53 +short example.com MX
//! 10 mail.example.com.
//! ```

pub mod record;
pub mod zone;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

pub use record::check_record;
pub use zone::{check_records, check_zone, UncheckedRecord, ZoneCheckReport};

/// The outcome of comparing one record with live DNS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Match,
    Mismatch,
    Missing,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Verdict::Match => "match",
            Verdict::Mismatch => "mismatch",
            Verdict::Missing => "missing",
        })
    }
}

/// A verdict and the TTL advertised with the live records. `ttl` is `None` iff the verdict is
/// [`Verdict::Missing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub verdict: Verdict,
    pub ttl: Option<u32>,
}

impl CheckResult {
    #[must_use]
    pub fn missing() -> Self {
        CheckResult {
            verdict: Verdict::Missing,
            ttl: None,
        }
    }
}

/// State shared by the record checks of one run.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    cancel: CancellationToken,
}

impl CheckContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort outstanding queries of every check using this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}

/// Options for a zone check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Log every record verdict at `info` level instead of `debug`.
    pub verbose: bool,
    /// Maximum number of records queried at the same time.
    pub concurrency: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            verbose: false,
            concurrency: 4,
        }
    }
}
