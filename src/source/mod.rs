//! Zone data sources.
//!
//! Zones enter the checker through the [`ZoneSource`] trait, the seam behind which a DNS
//! provider's API client can sit. Every zone a source hands out has been validated on
//! construction.
//!
//! Two implementations are provided, [`memory::InMemoryZoneSource`] and
//! [`file::FileZoneSource`]. The latter loads zones kept as JSON on disk:
//!
//! ```json
//! {
//!   "zones": [
//!     {
//!       "id": "Z0123456789ABCDEFGHIJK",
//!       "name": "example.com",
//!       "records": [
//!         { "id": "", "type": "A", "name": "www", "value": "192.0.2.1" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::Error;
use crate::model::Zone;
use std::sync::Arc;

pub mod file;
pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use file::FileZoneSource;
#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryZoneSource;

/// `DynZoneSource` is a type alias for a [`ZoneSource`] shared between consumers.
#[allow(clippy::module_name_repetitions)]
pub type DynZoneSource = Arc<dyn ZoneSource + Send + Sync>;

/// An async trait describing a supplier of validated zones, keyed by zone name.
#[async_trait::async_trait]
#[allow(clippy::module_name_repetitions)]
pub trait ZoneSource {
    /// All zones, ordered by name.
    async fn zones(&self) -> Result<Vec<Zone>, Error>;

    /// The zone with the given name, or [`Error::UnknownZone`].
    async fn zone(&self, name: &str) -> Result<Zone, Error>;
}
