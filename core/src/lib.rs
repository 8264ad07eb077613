//! Analysis core for the automated Dvorak technique.
//!
//! Scene typing of a storm-centred IR image, FFT harmonic counts of its
//! temperature profiles, and the passive-microwave adjustment of the
//! resulting intensity, all operating on an explicit per-storm session.

pub mod geodesy;
pub mod history;
pub mod math;
pub mod microwave;
pub mod prelude;
pub mod scene;
pub mod session;
pub mod telemetry;

pub use history::{HistoryRecord, HistoryStore};
pub use prelude::{
    AnalysisConfig, AnalysisError, AnalysisResult, IntensityEstimator, TopographySource,
};
pub use session::{AnalysisSession, PassInput, PassReport};
