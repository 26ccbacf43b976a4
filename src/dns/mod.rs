//! DNS lookups for drift checks.
//!
//! All queries go through the [`DnsLookup`] trait. Two implementations are provided: the
//! trust-dns [`TokioAsyncResolver`][trust_dns_resolver::TokioAsyncResolver], normally built by
//! a [`ResolverFactory`] to query a zone's authoritative nameserver directly, and
//! [`InMemoryLookup`], which serves canned answers.
//!
//! # Authoritative Resolution
//!
//! Drift checks should reflect what a zone's own nameservers publish, not what a caching
//! resolver remembers. For a zone such as `example.com` the [`ResolverFactory`]:
//!
//! 1. asks the bootstrap resolver for the `NS` records of `example.com` and takes the first
//!    nameserver, e.g. `ns1.example.net.`;
//! 2. asks the bootstrap resolver for the `A` record of that nameserver, e.g. `192.0.2.53`;
//! 3. builds a resolver sending every query to `192.0.2.53:53`.
//!
//! This is equivalent to:
//!
//! ```bash
//! ❯ dig +short example.com NS
//! ns1.example.net.
//! ❯ dig +short ns1.example.net A
//! 192.0.2.53
//! ❯ dig @192.0.2.53 +short www.example.com A
//! 192.0.2.1
//! ```
//!
//! # Missing vs Failed
//!
//! A lookup either returns the matching [`RecordSet`] or a [`LookupError`]. Only
//! [`LookupError::NotFound`] means the record is absent: the name doesn't exist (`NXDOMAIN`) or
//! holds no records of the queried type. Every other error (a timeout, `SERVFAIL`, `REFUSED`,
//! a malformed response) means the answer is unknown.

pub mod memory;
pub mod resolver;

use std::sync::Arc;
use trust_dns_proto::op::ResponseCode;
use trust_dns_proto::rr::{RData, RecordType};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

pub use memory::InMemoryLookup;
pub use resolver::{AuthoritativeResolver, Nameserver, ResolverFactory};

/// `DynLookup` is a type alias for a [`DnsLookup`] shared between concurrent record checks.
pub type DynLookup = Arc<dyn DnsLookup + Send + Sync>;

/// The records of one type found at a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub ttl: u32,
    pub rdata: Vec<RData>,
}

/// Why a lookup produced no [`RecordSet`].
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// The name doesn't exist, or has no records of the queried type.
    #[error("no such record")]
    NotFound,

    #[error("query timed out")]
    Timeout,

    /// The server answered with an error response code such as `SERVFAIL` or `REFUSED`.
    #[error("server responded {0}")]
    Response(ResponseCode),

    #[error("invalid query name {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    Resolve(ResolveError),
}

impl From<ResolveError> for LookupError {
    fn from(err: ResolveError) -> Self {
        let response_code = match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } => Some(*response_code),
            ResolveErrorKind::Timeout => return LookupError::Timeout,
            _ => None,
        };
        match response_code {
            Some(ResponseCode::NXDomain | ResponseCode::NoError) => LookupError::NotFound,
            Some(code) => LookupError::Response(code),
            None => LookupError::Resolve(err),
        }
    }
}

/// An async trait describing a DNS client able to answer a single question.
#[async_trait::async_trait]
pub trait DnsLookup {
    /// Look up the records of type `rtype` at `name`, a fully qualified name written without
    /// the trailing dot.
    async fn lookup(&self, name: &str, rtype: RecordType) -> Result<RecordSet, LookupError>;
}
