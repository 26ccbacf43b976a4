use crate::error::Error;
use crate::model::Zone;
use crate::source::ZoneSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Zones held in memory, keyed by name.
///
/// Serializes as `{"zones": [...]}`, with zones ordered by name.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ZoneList", into = "ZoneList")]
pub struct InMemoryZoneSource {
    zones: BTreeMap<String, Zone>,
}

#[derive(Serialize, Deserialize)]
struct ZoneList {
    zones: Vec<Zone>,
}

impl TryFrom<ZoneList> for InMemoryZoneSource {
    type Error = Error;

    fn try_from(list: ZoneList) -> Result<Self, Self::Error> {
        Self::new(list.zones)
    }
}

impl From<InMemoryZoneSource> for ZoneList {
    fn from(source: InMemoryZoneSource) -> Self {
        ZoneList {
            zones: source.zones.into_values().collect(),
        }
    }
}

impl InMemoryZoneSource {
    /// # Errors
    ///
    /// Returns [`Error::DuplicateZone`] if two zones share a name.
    pub fn new(zones: Vec<Zone>) -> Result<Self, Error> {
        let mut by_name = BTreeMap::new();
        for zone in zones {
            let name = zone.name().to_string();
            if by_name.insert(name.clone(), zone).is_some() {
                return Err(Error::DuplicateZone(name));
            }
        }
        Ok(Self { zones: by_name })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[async_trait::async_trait]
impl ZoneSource for InMemoryZoneSource {
    async fn zones(&self) -> Result<Vec<Zone>, Error> {
        Ok(self.zones.values().cloned().collect())
    }

    async fn zone(&self, name: &str) -> Result<Zone, Error> {
        self.zones
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownZone(name.to_string()))
    }
}
