//! Stand-ins for the topography and intensity collaborators.

use adtcore::history::{CloudScene, LandFlag};
use adtcore::math::StatsHelper;
use adtcore::scene::categorize;
use adtcore::{HistoryRecord, HistoryStore, IntensityEstimator, TopographySource};
use serde::{Deserialize, Serialize};

const MAX_STEP_PER_PASS: f64 = 1.0;
const SHEAR_CEILING: f64 = 3.5;

/// Rectangular land area in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LandBox {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat)
            && (self.lon_min..=self.lon_max).contains(&lon)
    }
}

/// Land mask made of boxes; everything outside them is water.
#[derive(Clone, Debug, Default)]
pub struct BoxTopography {
    boxes: Vec<LandBox>,
}

impl BoxTopography {
    pub fn new(boxes: Vec<LandBox>) -> Self {
        Self { boxes }
    }
}

impl TopographySource for BoxTopography {
    fn land_flag(&self, latitude: f64, longitude: f64) -> LandFlag {
        if self.boxes.iter().any(|b| b.contains(latitude, longitude)) {
            LandFlag::Land
        } else {
            LandFlag::Water
        }
    }
}

/// Maps the cloud-wall BD category to a raw T#, with an optional fixed
/// value taking precedence.
#[derive(Clone, Debug, Default)]
pub struct SceneTableEstimator {
    fixed: Option<f64>,
}

impl SceneTableEstimator {
    pub fn new(fixed: Option<f64>) -> Self {
        Self { fixed }
    }
}

impl IntensityEstimator for SceneTableEstimator {
    fn estimate(&self, current: &HistoryRecord, history: &HistoryStore) -> f64 {
        if let Some(value) = self.fixed {
            return value;
        }
        let cw = categorize(current.cw_cloud_temp).value();
        let mut raw = 1.0 + 0.5 * cw;
        if current.eye_scene.has_eye() {
            raw += 0.5;
        }
        if current.cloud_scene == CloudScene::Shear {
            raw = raw.min(SHEAR_CEILING);
        }
        if let Some(previous) = history
            .before(current.time_value())
            .filter(|r| r.traw >= 1.0)
            .last()
        {
            raw = raw.clamp(
                previous.tfinal - MAX_STEP_PER_PASS,
                previous.tfinal + MAX_STEP_PER_PASS,
            );
        }
        StatsHelper::round_tenth(raw.clamp(1.0, 8.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adtcore::history::EyeScene;

    fn record(cw: f64, eye: EyeScene) -> HistoryRecord {
        let mut record = HistoryRecord::new(2005250, 120000, 20.0, -60.0);
        record.cw_cloud_temp = cw;
        record.eye_scene = eye;
        record
    }

    #[test]
    fn boxes_mark_land() {
        let topo = BoxTopography::new(vec![LandBox {
            lat_min: 25.0,
            lat_max: 35.0,
            lon_min: -100.0,
            lon_max: -80.0,
        }]);
        assert_eq!(topo.land_flag(30.0, -90.0), LandFlag::Land);
        assert_eq!(topo.land_flag(20.0, -60.0), LandFlag::Water);
    }

    #[test]
    fn colder_cloud_wall_means_stronger_storm() {
        let estimator = SceneTableEstimator::default();
        let history = HistoryStore::new();
        let weak = estimator.estimate(&record(-45.0, EyeScene::NoEye), &history);
        let strong = estimator.estimate(&record(-72.0, EyeScene::Eye), &history);
        assert!(strong > weak);
        // band 6 plus a third, half a number for the eye
        assert_eq!(strong, 4.7);
    }

    #[test]
    fn step_from_previous_analysis_is_limited() {
        let mut previous = HistoryRecord::new(2005250, 60000, 20.0, -60.0);
        previous.set_intensity(2.0);
        let history = HistoryStore::from_records(vec![previous]);
        let estimate =
            SceneTableEstimator::default().estimate(&record(-80.0, EyeScene::Eye), &history);
        assert_eq!(estimate, 3.0);
    }

    #[test]
    fn fixed_value_wins() {
        let estimator = SceneTableEstimator::new(Some(4.5));
        assert_eq!(
            estimator.estimate(&record(-80.0, EyeScene::Eye), &HistoryStore::new()),
            4.5
        );
    }
}
