//! Passive-microwave eye score adjustment of IR intensities.

pub mod engine;
pub mod state;

pub use engine::{AdjustmentPlan, MicrowaveAdjustmentEngine, MicrowaveObservation};
pub use state::{is_armed, score_floor, transition, AdjustmentState, RampAnchors, Transition};
