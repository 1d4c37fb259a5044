//! Domain model (IDs, queued events, connectivity vocabulary, errors).

pub mod connectivity;
pub mod errors;
pub mod event;
pub mod ids;

pub use connectivity::{ChangeSource, NetworkState};
pub use errors::{ConfigError, KioskError};
pub use event::{KioskEventKind, KioskQueueItem, NewKioskEvent, ScanPayload, StatusPayload};
pub use ids::{IdMarker, KioskEventId};
