use serde::{Deserialize, Serialize};

use crate::history::{HistoryRecord, HistoryStore, LandFlag};

/// Analysis switches shared by every pass of a storm session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Treat land-flagged records as unusable in history walks.
    pub land_flag_enabled: bool,
    /// Initial raw T-number seeding the lookback when no history exists.
    pub init_raw_t: f64,
    /// Analyst-entered radius of maximum wind in km; values <= 0 mean none.
    pub manual_rmw_km: f64,
    /// When false the scene lookback ignores history entirely.
    pub run_full_analysis: bool,
    /// Run the +/-1 degree box search once a curved band is found.
    pub curved_band_max_search: bool,
    /// Pressure domain override, -1 selects the domain from the ocean basin.
    pub domain_override: i32,
    /// Use the Knaff-Zehr wind-pressure relation instead of the tables.
    pub use_ckz: bool,
    /// Gale-force wind radius in nmi; negative values are ROCI estimates.
    pub ckz_gale_radius: f64,
    /// Environmental mean sea level pressure in hPa.
    pub ckz_penv: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            land_flag_enabled: true,
            init_raw_t: 1.0,
            manual_rmw_km: -99.0,
            run_full_analysis: true,
            curved_band_max_search: true,
            domain_override: -1,
            use_ckz: false,
            ckz_gale_radius: 75.0,
            ckz_penv: 1012.0,
        }
    }
}

impl AnalysisConfig {
    pub fn has_manual_rmw(&self) -> bool {
        self.manual_rmw_km > 0.0
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        let numeric = [
            ("init_raw_t", self.init_raw_t),
            ("manual_rmw_km", self.manual_rmw_km),
            ("ckz_gale_radius", self.ckz_gale_radius),
            ("ckz_penv", self.ckz_penv),
        ];
        if let Some((name, value)) = numeric.iter().find(|(_, value)| !value.is_finite()) {
            return Err(AnalysisError::InvalidConfig(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if !(-1..=1).contains(&self.domain_override) {
            return Err(AnalysisError::InvalidConfig(format!(
                "domain_override must be -1, 0 or 1, got {}",
                self.domain_override
            )));
        }
        Ok(())
    }
}

/// Error type for the structural failures of the analysis core.
///
/// Numerical routines report failure through sentinel values instead.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("history snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Land/water lookup for a storm center.
pub trait TopographySource {
    fn land_flag(&self, latitude: f64, longitude: f64) -> LandFlag;
}

/// Produces the raw intensity estimate that the microwave engine may revise.
pub trait IntensityEstimator {
    fn estimate(&self, current: &HistoryRecord, history: &HistoryStore) -> f64;
}
