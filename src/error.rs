//! Error types.

use crate::check::ZoneCheckReport;
use crate::dns::LookupError;
use crate::model::RecordType;
use trust_dns_resolver::error::ResolveError;

/// `ValidationError` enumerates the ways a [`Record`][crate::model::Record] or a
/// [`Zone`][crate::model::Zone] can fail construction.
///
/// Validation errors are never retried: the offending zone data must be fixed by the operator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Record ID {0:?} must be a 32-character hexadecimal string")]
    InvalidRecordId(String),

    #[error("Record type cannot be empty")]
    EmptyRecordType,

    #[error("Invalid record type: {0:?}")]
    InvalidRecordType(String),

    #[error("Record name cannot be empty, use `@` for the zone root")]
    EmptyRecordName,

    #[error("Invalid record name {name:?}: {reason}")]
    InvalidRecordName { name: String, reason: String },

    #[error("Record value cannot be empty")]
    EmptyRecordValue,

    /// Returned when a value doesn't satisfy the grammar of its record type, e.g. an `A` record
    /// holding something other than an IPv4 address.
    #[error("{reason}: {value:?}")]
    InvalidRecordValue {
        rtype: RecordType,
        value: String,
        reason: String,
    },

    #[error("Zone ID cannot be empty")]
    EmptyZoneId,

    #[error("Zone ID {0:?} must be a 22-character alphanumeric string")]
    InvalidZoneId(String),

    #[error("Zone name cannot be empty")]
    EmptyZoneName,

    #[error("Invalid zone name {name:?}: {reason}")]
    InvalidZoneName { name: String, reason: String },

    /// Returned when two records of a zone share the same type, name and value. Record IDs are
    /// not considered.
    #[error("Duplicate record found: {rtype} {name} {value}")]
    DuplicateRecord {
        rtype: RecordType,
        name: String,
        value: String,
    },
}

/// Error enumerates the possible Zone Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when zone or record data is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Returned when the bootstrap resolver can't answer the `NS` or `A` query used to find a
    /// zone's authoritative nameserver. Fatal for the whole zone check.
    #[error("could not discover the authoritative nameserver for {zone}")]
    ResolutionSetup {
        zone: String,
        #[source]
        source: LookupError,
    },

    /// Returned when a zone's `NS` answer holds no nameserver names.
    #[error("no NS records published for {0}")]
    NoNameservers(String),

    /// Returned when a zone's first nameserver has no IPv4 address.
    #[error("nameserver {nameserver} of {zone} has no IPv4 address")]
    NoNameserverAddress { zone: String, nameserver: String },

    /// Returned when a trust-dns resolver can't be constructed, e.g. from a broken
    /// `/etc/resolv.conf`.
    #[error("could not create DNS resolver")]
    Resolver(#[from] ResolveError),

    /// Returned when a record query failed for a reason other than the name not existing:
    /// timeouts, `SERVFAIL`, malformed responses. The record's state is unknown, not missing.
    #[error("query for {rtype} {fqdn} failed")]
    Query {
        fqdn: String,
        rtype: RecordType,
        #[source]
        source: LookupError,
    },

    /// Returned when a record of a type that isn't compared against live DNS (`SOA`) is checked.
    #[error("{0} records are not checked against DNS")]
    NotCheckable(RecordType),

    /// Returned by a single record check when its [`CheckContext`][crate::check::CheckContext]
    /// was cancelled.
    #[error("check cancelled")]
    Cancelled,

    /// Returned by a zone check that was cancelled before every record was checked. The partial
    /// report lists the records that were left unchecked.
    #[error("check of zone {zone} was cancelled before every record was checked")]
    Incomplete {
        zone: String,
        report: Box<ZoneCheckReport>,
    },

    /// Returned when a record check task panicked or was aborted.
    #[error("record check task failed")]
    Join(#[from] tokio::task::JoinError),

    /// Returned when a zone source holds two zones with the same name.
    #[error("duplicate zone {0:?}")]
    DuplicateZone(String),

    /// Returned when a zone is requested by name but isn't present in the zone source.
    #[error("unknown zone {0:?}")]
    UnknownZone(String),

    /// Returned when a [`Config`][crate::config::Config] value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g.
    /// [trying to load a `Config`][crate::config::Config::try_from_file], or
    /// [trying to load a `FileZoneSource`][crate::source::FileZoneSource::try_from_file]) fails
    /// due to invalid JSON content or invalid zone data.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}
