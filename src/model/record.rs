use crate::error::ValidationError;
use crate::model::grammar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use trust_dns_proto::rr::RecordType as QueryType;

/// Owner name denoting the zone apex.
pub const APEX: &str = "@";

const RECORD_ID_LENGTH: usize = 32;

/// The record types a zone may hold.
///
/// Variants are declared in alphabetical order of their mnemonic, which is the order records are
/// sorted in within a [`Zone`][super::Zone].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    A,
    AAAA,
    CAA,
    CNAME,
    MX,
    NS,
    PTR,
    SOA,
    SRV,
    TXT,
}

impl RecordType {
    pub const ALL: [RecordType; 10] = [
        Self::A,
        Self::AAAA,
        Self::CAA,
        Self::CNAME,
        Self::MX,
        Self::NS,
        Self::PTR,
        Self::SOA,
        Self::SRV,
        Self::TXT,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CAA => "CAA",
            Self::CNAME => "CNAME",
            Self::MX => "MX",
            Self::NS => "NS",
            Self::PTR => "PTR",
            Self::SOA => "SOA",
            Self::SRV => "SRV",
            Self::TXT => "TXT",
        }
    }

    /// The DNS query type used to look the record up.
    #[must_use]
    pub fn query_type(self) -> QueryType {
        match self {
            Self::A => QueryType::A,
            Self::AAAA => QueryType::AAAA,
            Self::CAA => QueryType::CAA,
            Self::CNAME => QueryType::CNAME,
            Self::MX => QueryType::MX,
            Self::NS => QueryType::NS,
            Self::PTR => QueryType::PTR,
            Self::SOA => QueryType::SOA,
            Self::SRV => QueryType::SRV,
            Self::TXT => QueryType::TXT,
        }
    }

    /// Whether records of this type are compared against live DNS. `SOA` records are managed by
    /// the provider and are only ever validated.
    #[must_use]
    pub fn is_checkable(self) -> bool {
        self != Self::SOA
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::EmptyRecordType);
        }
        Self::ALL
            .into_iter()
            .find(|rtype| rtype.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidRecordType(s.to_string()))
    }
}

/// One resource record intended for a zone.
///
/// Records can only be obtained through [`Record::new`] (or deserialization, which calls it), so
/// every instance satisfies the id, name and per-type value rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    id: String,
    #[serde(rename = "type")]
    rtype: RecordType,
    name: String,
    value: String,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    rtype: String,
    name: String,
    value: String,
}

impl TryFrom<RawRecord> for Record {
    type Error = ValidationError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Record::new(raw.id, &raw.rtype, raw.name, raw.value)
    }
}

impl Record {
    /// Validate and construct a record.
    ///
    /// `id` may be empty for a record that doesn't exist at the provider yet.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first field that fails validation, checked in
    /// the order id, type, name, value.
    pub fn new(
        id: impl Into<String>,
        rtype: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (id, name, value) = (id.into(), name.into(), value.into());
        validate_id(&id)?;
        let rtype: RecordType = rtype.parse()?;
        validate_name(&name)?;
        validate_value(rtype, &value)?;
        Ok(Record {
            id,
            rtype,
            name,
            value,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_apex(&self) -> bool {
        self.name == APEX
    }

    /// The fully qualified name (without trailing dot) the record is published at in
    /// `zone_name`.
    #[must_use]
    pub fn fqdn(&self, zone_name: &str) -> String {
        if self.is_apex() {
            zone_name.to_string()
        } else {
            format!("{}.{zone_name}", self.name)
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rtype, self.name, self.value)
    }
}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Ok(());
    }
    let is_hex = id
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if id.len() != RECORD_ID_LENGTH || !is_hex {
        return Err(ValidationError::InvalidRecordId(id.to_string()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyRecordName);
    }
    if name == APEX {
        return Ok(());
    }
    grammar::check_labels(name).map_err(|reason| ValidationError::InvalidRecordName {
        name: name.to_string(),
        reason,
    })
}

fn validate_value(rtype: RecordType, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyRecordValue);
    }
    grammar::check_value(rtype, value).map_err(|reason| ValidationError::InvalidRecordValue {
        rtype,
        value: value.to_string(),
        reason,
    })
}
