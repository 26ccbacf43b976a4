use crate::error::ValidationError;
use crate::model::{grammar, Record, RecordType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const ZONE_ID_LENGTH: usize = 22;
const MIN_TLD_LENGTH: usize = 2;

/// A DNS zone and its intended record set.
///
/// Records are held in canonical order: by type mnemonic, then by owner name. Records sharing
/// type and name keep the order they were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawZone")]
pub struct Zone {
    id: String,
    name: String,
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct RawZone {
    id: String,
    name: String,
    #[serde(default)]
    records: Vec<Record>,
}

impl TryFrom<RawZone> for Zone {
    type Error = ValidationError;

    fn try_from(raw: RawZone) -> Result<Self, Self::Error> {
        Zone::new(raw.id, raw.name, raw.records)
    }
}

impl Zone {
    /// Validate and construct a zone, putting `records` into canonical order.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id or name is malformed, or
    /// [`ValidationError::DuplicateRecord`] if two records share type, name and value.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mut records: Vec<Record>,
    ) -> Result<Self, ValidationError> {
        let (id, name) = (id.into(), name.into());
        validate_id(&id)?;
        validate_name(&name)?;
        reject_duplicates(&records)?;
        records.sort_by(|a, b| canonical_key(a).cmp(&canonical_key(b)));
        Ok(Zone { id, name, records })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records of the given type, in canonical order.
    pub fn records_of(&self, rtype: RecordType) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.rtype() == rtype)
    }
}

fn canonical_key(record: &Record) -> (&'static str, &str) {
    (record.rtype().as_str(), record.name())
}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyZoneId);
    }
    if id.len() != ZONE_ID_LENGTH || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidZoneId(id.to_string()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyZoneName);
    }
    let invalid = |reason: String| ValidationError::InvalidZoneName {
        name: name.to_string(),
        reason,
    };
    if name.ends_with('.') {
        return Err(invalid("zone names must not end with a dot".to_string()));
    }
    grammar::check_labels(name).map_err(invalid)?;
    match name.rsplit_once('.') {
        None => Err(invalid("missing top-level domain".to_string())),
        Some((_, tld)) if tld.len() < MIN_TLD_LENGTH => Err(invalid(format!(
            "top-level domain {tld:?} is shorter than {MIN_TLD_LENGTH} characters"
        ))),
        Some((_, tld)) if tld.bytes().all(|b| b.is_ascii_digit()) => Err(invalid(format!(
            "top-level domain {tld:?} is numeric"
        ))),
        Some(_) => Ok(()),
    }
}

fn reject_duplicates(records: &[Record]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert((record.rtype(), record.name(), record.value())) {
            return Err(ValidationError::DuplicateRecord {
                rtype: record.rtype(),
                name: record.name().to_string(),
                value: record.value().to_string(),
            });
        }
    }
    Ok(())
}
