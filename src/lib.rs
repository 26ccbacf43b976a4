//! Zone Crab
//!
//! Validates DNS zones kept as structured data, and checks them for drift against what their
//! authoritative nameservers actually publish.
//!
//! Zones are validated when they are constructed: every [`Record`] is checked against the
//! grammar of its type, and a [`Zone`] rejects duplicate records and keeps its records in
//! canonical order. A drift check ([`check::check_zone`]) discovers a zone's authoritative
//! nameserver, queries it for every record, and reports each record as matching, mismatched or
//! missing.
//!
//! Zone data enters through the [`ZoneSource`] trait. Intended for operators pushing zones to a
//! DNS hosting provider from version control, to reject malformed records before they are
//! pushed and to notice changes made behind the zone file's back.
//!
#![warn(clippy::pedantic)]

pub mod check;
pub mod config;
pub mod dns;
pub mod error;
pub mod model;
pub mod normalize;
pub mod source;

pub use check::{check_zone, CheckContext, CheckOptions, ZoneCheckReport};
pub use config::{Config, SharedConfig};
pub use model::{Record, RecordType, Zone};
pub use source::{DynZoneSource, FileZoneSource, InMemoryZoneSource, ZoneSource};
