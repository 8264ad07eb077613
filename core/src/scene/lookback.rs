use crate::history::{CloudScene, EyeScene, HistoryRecord, HistoryStore};
use crate::prelude::AnalysisConfig;

const LOOKBACK_DAYS: f64 = 0.5;
const LAND_DECAY_PER_DAY: f64 = 1.0;

/// What the classifier needs to know about the storm's recent past.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLookback {
    /// A usable record was found inside the last 12 hours, or the
    /// analysis is running without history.
    pub found_minus_12hr: bool,
    /// Final T# of the oldest usable record inside the last 12 hours.
    pub tno_minus_12hr: f64,
    /// `None` when no usable record precedes the current time.
    pub previous_eye_scene: Option<EyeScene>,
    pub previous_cloud_scene: CloudScene,
    pub last_rule9: i32,
    /// Final T# of the latest usable record, decayed while over land.
    pub previous_tno: f64,
    pub max_rule9_tno: f64,
    pub found_eye_scene: bool,
}

impl HistoryLookback {
    /// Seeds the lookback from the configured initial T# when there is no
    /// history to read.
    fn genesis(config: &AnalysisConfig, cw_category: f64) -> Self {
        let init = config.init_raw_t;
        let (previous_cloud_scene, tno_minus_12hr) = if cw_category < 3.5 && init < 3.5 {
            (CloudScene::CurvedBand, init)
        } else {
            (CloudScene::UniformCdo, init.max(4.0))
        };
        Self {
            found_minus_12hr: true,
            tno_minus_12hr,
            previous_eye_scene: Some(EyeScene::NoEye),
            previous_cloud_scene,
            last_rule9: 1,
            previous_tno: -99.0,
            max_rule9_tno: -99.0,
            found_eye_scene: false,
        }
    }

    /// Walks the history up to `current_time`.
    ///
    /// `cw_category` is the BD category value of the cloud-wall
    /// temperature of the current image.
    pub fn scan(
        history: &HistoryStore,
        current_time: f64,
        config: &AnalysisConfig,
        cw_category: f64,
    ) -> Self {
        if history.is_empty() || !config.run_full_analysis {
            return Self::genesis(config, cw_category);
        }

        let window_start = current_time - LOOKBACK_DAYS;
        let mut lookback = Self {
            found_minus_12hr: false,
            tno_minus_12hr: 0.0,
            previous_eye_scene: None,
            previous_cloud_scene: CloudScene::CurvedBand,
            last_rule9: 0,
            previous_tno: -99.0,
            max_rule9_tno: -99.0,
            found_eye_scene: false,
        };
        let mut last_valid_time = 0.0;
        let mut last_valid_tno = -99.0;

        for record in history.records() {
            let time = record.time_value();
            let usable = record.is_usable(config.land_flag_enabled);
            if time < current_time && usable {
                last_valid_time = time;
                lookback.absorb(record, time >= window_start);
                last_valid_tno = lookback.previous_tno;
            } else if !usable && time - last_valid_time > LOOKBACK_DAYS {
                // long land track: forget the eye and decay the intensity
                lookback.found_eye_scene = false;
                lookback.previous_tno =
                    last_valid_tno - LAND_DECAY_PER_DAY * (time - last_valid_time);
            }
        }

        if !lookback.found_minus_12hr {
            lookback.tno_minus_12hr = lookback.previous_tno;
        }
        lookback
    }

    fn absorb(&mut self, record: &HistoryRecord, in_window: bool) {
        if in_window && !self.found_minus_12hr {
            self.tno_minus_12hr = record.tfinal;
            self.found_minus_12hr = true;
        }
        self.previous_tno = record.tfinal;
        self.previous_cloud_scene = record.cloud_scene;
        self.previous_eye_scene = Some(record.eye_scene);
        if record.eye_scene.has_eye() {
            self.found_eye_scene = true;
        }
        if record.cloud_scene == CloudScene::Shear && record.eye_scene == EyeScene::NoEye {
            self.found_eye_scene = false;
        }
        self.last_rule9 = record.rule9;
        self.max_rule9_tno = self.max_rule9_tno.max(record.tfinal);
    }

    /// True unless the latest usable record had no eye. An empty walk
    /// counts as true.
    pub fn previous_eye_present(&self) -> bool {
        self.previous_eye_scene.map_or(true, EyeScene::has_eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::LandFlag;

    fn record(hour: i32, tfinal: f64, eye: EyeScene, cloud: CloudScene) -> HistoryRecord {
        let mut record = HistoryRecord::new(2005250, hour * 10000, 20.0, -60.0);
        record.set_intensity(tfinal);
        record.eye_scene = eye;
        record.cloud_scene = cloud;
        record
    }

    fn at_hour(hour: f64) -> f64 {
        HistoryRecord::new(2005250, 0, 0.0, 0.0).time_value() + hour / 24.0
    }

    #[test]
    fn genesis_with_weak_seed_leans_curved_band() {
        let config = AnalysisConfig {
            init_raw_t: 3.0,
            ..AnalysisConfig::default()
        };
        let lookback = HistoryLookback::scan(&HistoryStore::new(), at_hour(12.0), &config, 2.0);
        assert!(lookback.found_minus_12hr);
        assert_eq!(lookback.previous_cloud_scene.code(), 3);
        assert_eq!(lookback.last_rule9, 1);
        assert_eq!(lookback.tno_minus_12hr, 3.0);
        assert_eq!(lookback.previous_eye_scene, Some(EyeScene::NoEye));
    }

    #[test]
    fn genesis_with_strong_seed_leans_cdo() {
        let config = AnalysisConfig {
            init_raw_t: 3.0,
            ..AnalysisConfig::default()
        };
        let lookback = HistoryLookback::scan(&HistoryStore::new(), at_hour(12.0), &config, 4.2);
        assert_eq!(lookback.previous_cloud_scene, CloudScene::UniformCdo);
        assert_eq!(lookback.tno_minus_12hr, 4.0);
    }

    #[test]
    fn history_is_ignored_without_full_analysis() {
        let history = HistoryStore::from_records(vec![record(
            2,
            5.5,
            EyeScene::Eye,
            CloudScene::UniformCdo,
        )]);
        let config = AnalysisConfig {
            run_full_analysis: false,
            ..AnalysisConfig::default()
        };
        let lookback = HistoryLookback::scan(&history, at_hour(6.0), &config, 4.2);
        assert_eq!(lookback.max_rule9_tno, -99.0);
        assert!(!lookback.found_eye_scene);
    }

    #[test]
    fn walk_picks_oldest_record_inside_window() {
        let history = HistoryStore::from_records(vec![
            record(0, 3.0, EyeScene::NoEye, CloudScene::CurvedBand),
            record(8, 3.5, EyeScene::NoEye, CloudScene::UniformCdo),
            record(14, 4.0, EyeScene::Eye, CloudScene::UniformCdo),
            record(18, 4.5, EyeScene::Eye, CloudScene::UniformCdo),
        ]);
        let lookback =
            HistoryLookback::scan(&history, at_hour(20.0), &AnalysisConfig::default(), 4.0);
        assert!(lookback.found_minus_12hr);
        assert_eq!(lookback.tno_minus_12hr, 3.5);
        assert_eq!(lookback.previous_tno, 4.5);
        assert_eq!(lookback.max_rule9_tno, 4.5);
        assert!(lookback.found_eye_scene);
        assert_eq!(lookback.previous_eye_scene, Some(EyeScene::Eye));
    }

    #[test]
    fn gap_falls_back_to_latest_value() {
        let history = HistoryStore::from_records(vec![record(
            0,
            3.2,
            EyeScene::NoEye,
            CloudScene::UniformCdo,
        )]);
        let lookback =
            HistoryLookback::scan(&history, at_hour(20.0), &AnalysisConfig::default(), 4.0);
        assert!(!lookback.found_minus_12hr);
        assert_eq!(lookback.tno_minus_12hr, 3.2);
        assert!(!lookback.previous_eye_present());
    }

    #[test]
    fn long_land_track_decays_intensity() {
        let mut land = record(18, 4.0, EyeScene::Eye, CloudScene::UniformCdo);
        land.land = LandFlag::Land;
        let history = HistoryStore::from_records(vec![
            record(0, 4.0, EyeScene::Eye, CloudScene::UniformCdo),
            land,
        ]);
        let lookback =
            HistoryLookback::scan(&history, at_hour(20.0), &AnalysisConfig::default(), 4.0);
        assert!(!lookback.found_eye_scene);
        assert!((lookback.previous_tno - 3.25).abs() < 1e-9);
    }
}
