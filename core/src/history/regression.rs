//! Trend and extrapolation fits over a trailing window of history.

use super::record::{HistoryRecord, LandFlag};
use crate::math::StatsHelper;
use crate::prelude::AnalysisConfig;

/// Value returned for a position fit with too few points.
pub const INTERCEPT_UNAVAILABLE: f64 = 999.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendTarget {
    FinalT,
    RawT,
    Latitude,
    Longitude,
}

impl TrendTarget {
    fn is_intensity(self) -> bool {
        matches!(self, Self::FinalT | Self::RawT)
    }

    fn value(self, record: &HistoryRecord) -> f64 {
        match self {
            Self::FinalT => record.tfinal,
            Self::RawT => record.traw,
            Self::Latitude => record.latitude,
            Self::Longitude => record.longitude,
        }
    }
}

/// Slope (per day) of a T-number over the last `window_hours`, or the
/// position intercept at the current time for latitude and longitude.
///
/// Intensity fits include the current record and need six points; they
/// fall back to 0.0. Position fits need four and fall back to
/// [`INTERCEPT_UNAVAILABLE`].
pub fn trend(
    history: &[HistoryRecord],
    current: &HistoryRecord,
    window_hours: f64,
    target: TrendTarget,
    config: &AnalysisConfig,
) -> f64 {
    let current_time = current.time_value();
    let window_start = current_time - window_hours / 24.0;

    let mut points = Vec::new();
    let mut first_lon: Option<f64> = None;
    for record in history {
        let time = record.time_value();
        if time >= current_time || time < window_start {
            if !points.is_empty() {
                break;
            }
            continue;
        }
        // intensity trends skip land; the raw-T floor reads the configured seed
        if target.is_intensity()
            && ((config.land_flag_enabled && record.land == LandFlag::Land)
                || config.init_raw_t < 1.0)
        {
            continue;
        }
        let mut value = target.value(record);
        if target == TrendTarget::Longitude {
            match first_lon {
                None => first_lon = Some(value),
                Some(first) if first > 100.0 && value < -100.0 => value += 360.0,
                Some(first) if first < -100.0 && value > 100.0 => value -= 360.0,
                Some(_) => {}
            }
        }
        points.push((current_time - time, value));
    }

    let minimum = if target.is_intensity() {
        points.push((0.0, target.value(current)));
        6
    } else {
        4
    };

    if points.len() < minimum {
        return if target.is_intensity() {
            0.0
        } else {
            INTERCEPT_UNAVAILABLE
        };
    }

    let fit = StatsHelper::linear_fit(&points);
    match target {
        TrendTarget::FinalT | TrendTarget::RawT => fit.slope,
        TrendTarget::Latitude => fit.intercept,
        TrendTarget::Longitude => {
            let mut intercept = fit.intercept;
            if intercept < -180.0 {
                intercept += 360.0;
            }
            if intercept > 180.0 {
                intercept -= 360.0;
            }
            intercept
        }
    }
}
