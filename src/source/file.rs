//! A JSON file-backed implementation of the [`ZoneSource`][super::ZoneSource] trait.
//!
//! Wraps a [`InMemoryZoneSource`][super::memory::InMemoryZoneSource] loaded from a zone file kept
//! alongside the rest of an operator's infrastructure code.
use crate::error::Error;
use crate::model::Zone;
use crate::source::memory::InMemoryZoneSource;
use crate::source::ZoneSource;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Zones loaded from a JSON zone file. The file is read once; every zone in it is validated
/// before the source is returned.
#[derive(Default, Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct FileZoneSource {
    zones: InMemoryZoneSource,
    path: String,
}

impl FileZoneSource {
    /// Load a [`FileZoneSource`] from the JSON zone file located at the given path, or return an
    /// Error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJSON`] if the zone file is invalid JSON, or holds an invalid zone
    /// or record.
    ///
    /// Returns [`Error::IO`] if the path can't be opened or read.
    pub async fn try_from_file(p: &str) -> Result<Self, Error> {
        let mut f = File::open(p).await?;
        let mut contents = vec![];
        f.read_to_end(&mut contents).await?;

        let zones: InMemoryZoneSource = serde_json::from_slice(&contents)?;
        tracing::debug!("loaded {} zones from {p}", zones.len());
        Ok(Self {
            zones,
            path: p.to_string(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait::async_trait]
impl ZoneSource for FileZoneSource {
    async fn zones(&self) -> Result<Vec<Zone>, Error> {
        self.zones.zones().await
    }

    async fn zone(&self, name: &str) -> Result<Zone, Error> {
        self.zones.zone(name).await
    }
}
