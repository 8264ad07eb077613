//! Per-storm analysis archive.

pub mod record;
pub mod regression;
pub mod store;

pub use record::{CloudScene, EyeScene, HistoryRecord, LandFlag};
pub use regression::{trend, TrendTarget, INTERCEPT_UNAVAILABLE};
pub use store::{CommitOutcome, HistoryStore, RecordPatch};
