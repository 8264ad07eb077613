use serde::{Deserialize, Serialize};

use crate::geodesy::time::calctime;
use crate::microwave::AdjustmentState;

/// Surface type under the storm center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LandFlag {
    Land,
    #[default]
    Water,
}

impl LandFlag {
    pub fn code(self) -> i32 {
        match self {
            Self::Land => 1,
            Self::Water => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EyeScene {
    Eye,
    PinholeEye,
    LargeEye,
    NoEye,
}

impl EyeScene {
    pub fn code(self) -> i32 {
        match self {
            Self::Eye => 0,
            Self::PinholeEye => 1,
            Self::LargeEye => 2,
            Self::NoEye => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Eye),
            1 => Some(Self::PinholeEye),
            2 => Some(Self::LargeEye),
            3 => Some(Self::NoEye),
            _ => None,
        }
    }

    /// Any of the three eye scenes.
    pub fn has_eye(self) -> bool {
        self != Self::NoEye
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Eye => "EYE",
            Self::PinholeEye => "PINHOLE EYE",
            Self::LargeEye => "LARGE EYE",
            Self::NoEye => "NO EYE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudScene {
    UniformCdo,
    EmbeddedCenter,
    IrregularCdo,
    CurvedBand,
    Shear,
}

impl CloudScene {
    pub fn code(self) -> i32 {
        match self {
            Self::UniformCdo => 0,
            Self::EmbeddedCenter => 1,
            Self::IrregularCdo => 2,
            Self::CurvedBand => 3,
            Self::Shear => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::UniformCdo),
            1 => Some(Self::EmbeddedCenter),
            2 => Some(Self::IrregularCdo),
            3 => Some(Self::CurvedBand),
            4 => Some(Self::Shear),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UniformCdo => "UNIFORM CDO",
            Self::EmbeddedCenter => "EMBEDDED CENTER",
            Self::IrregularCdo => "IRREGULAR CDO",
            Self::CurvedBand => "CURVED BAND",
            Self::Shear => "SHEAR",
        }
    }
}

/// One analysis at one image time.
///
/// Sentinels follow the archive conventions: -99 for unavailable
/// distances and scores, -999.99 for unavailable positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryRecord {
    pub date: i32,
    pub time: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub land: LandFlag,
    pub satellite_id: i32,

    pub traw: f64,
    pub tfinal: f64,
    pub ci: f64,

    pub eye_scene: EyeScene,
    pub cloud_scene: CloudScene,
    pub eye_scene_old: Option<EyeScene>,
    pub cloud_scene_old: Option<CloudScene>,

    pub eye_temp: f64,
    pub eye_stdv: f64,
    pub cloud_temp: f64,
    pub cw_cloud_temp: f64,
    pub cloud_symmetry: f64,
    pub eye_fft: i32,
    pub cloud_fft: i32,

    pub rmw: f64,
    pub eye_cdo_size: f64,
    pub ring_cb: i32,
    pub ring_cb_val: i32,
    pub ring_cb_val_max: i32,
    pub ring_cb_val_max_lat: f64,
    pub ring_cb_val_max_lon: f64,

    pub mw_score: f64,
    pub mw_date: i32,
    pub mw_time: i32,

    /// Microwave adjustment state; `None` for records never touched by it.
    pub rule8: Option<AdjustmentState>,
    pub rule9: i32,
    pub comment: String,
}

impl Default for HistoryRecord {
    fn default() -> Self {
        Self {
            date: 0,
            time: 0,
            latitude: 0.0,
            longitude: 0.0,
            land: LandFlag::Water,
            satellite_id: -1,
            traw: 0.0,
            tfinal: 0.0,
            ci: 0.0,
            eye_scene: EyeScene::NoEye,
            cloud_scene: CloudScene::UniformCdo,
            eye_scene_old: None,
            cloud_scene_old: None,
            eye_temp: 0.0,
            eye_stdv: 0.0,
            cloud_temp: 0.0,
            cw_cloud_temp: 0.0,
            cloud_symmetry: 0.0,
            eye_fft: 0,
            cloud_fft: 0,
            rmw: -99.0,
            eye_cdo_size: 0.0,
            ring_cb: 0,
            ring_cb_val: 0,
            ring_cb_val_max: 0,
            ring_cb_val_max_lat: -999.99,
            ring_cb_val_max_lon: -999.99,
            mw_score: -99.0,
            mw_date: 0,
            mw_time: 0,
            rule8: None,
            rule9: 0,
            comment: String::new(),
        }
    }
}

impl HistoryRecord {
    pub fn new(date: i32, time: i32, latitude: f64, longitude: f64) -> Self {
        Self {
            date,
            time,
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn time_value(&self) -> f64 {
        calctime(self.date, self.time)
    }

    /// Whether this record takes part in history walks.
    pub fn is_usable(&self, land_flag_enabled: bool) -> bool {
        !((land_flag_enabled && self.land == LandFlag::Land) || self.traw < 1.0)
    }

    pub fn set_intensity(&mut self, value: f64) {
        self.traw = value;
        self.set_final_intensity(value);
    }

    /// Sets the reported T# while keeping the raw estimate.
    pub fn set_final_intensity(&mut self, value: f64) {
        self.tfinal = value;
        self.ci = value;
    }

    /// Replaces the scene pair with an analyst override, keeping the
    /// automated pair in the `*_old` fields.
    ///
    /// Codes 0..=3 select an eye scene over a uniform CDO, codes 4..=7 a
    /// cloud scene `code - 3` without an eye.
    pub fn override_scene(&mut self, code: i32) -> bool {
        let cloud = CloudScene::from_code((code - 3).max(0));
        let eye = EyeScene::from_code(code.min(3));
        match (cloud, eye) {
            (Some(cloud), Some(eye)) if code >= 0 => {
                self.eye_scene_old = Some(self.eye_scene);
                self.cloud_scene_old = Some(self.cloud_scene);
                self.eye_scene = eye;
                self.cloud_scene = cloud;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_and_weak_records_are_not_usable() {
        let mut record = HistoryRecord::new(2005250, 0, 20.0, -60.0);
        record.set_intensity(3.0);
        assert!(record.is_usable(true));

        record.land = LandFlag::Land;
        assert!(!record.is_usable(true));
        assert!(record.is_usable(false));

        record.land = LandFlag::Water;
        record.traw = 0.5;
        assert!(!record.is_usable(false));
    }

    #[test]
    fn scene_codes_round_trip() {
        for code in 0..=3 {
            assert_eq!(EyeScene::from_code(code).unwrap().code(), code);
        }
        for code in 0..=4 {
            assert_eq!(CloudScene::from_code(code).unwrap().code(), code);
        }
        assert!(EyeScene::from_code(4).is_none());
        assert!(CloudScene::from_code(-1).is_none());
        assert!(EyeScene::LargeEye.has_eye());
        assert!(!EyeScene::NoEye.has_eye());
    }

    #[test]
    fn scene_override_keeps_previous_pair() {
        let mut record = HistoryRecord::new(2005250, 0, 20.0, -60.0);
        record.eye_scene = EyeScene::Eye;
        record.cloud_scene = CloudScene::UniformCdo;

        assert!(record.override_scene(6));
        assert_eq!(record.cloud_scene, CloudScene::CurvedBand);
        assert_eq!(record.eye_scene, EyeScene::NoEye);
        assert_eq!(record.eye_scene_old, Some(EyeScene::Eye));
        assert_eq!(record.cloud_scene_old, Some(CloudScene::UniformCdo));

        assert!(record.override_scene(1));
        assert_eq!(record.eye_scene, EyeScene::PinholeEye);
        assert_eq!(record.cloud_scene, CloudScene::UniformCdo);
    }

    #[test]
    fn invalid_override_is_ignored() {
        let mut record = HistoryRecord::new(2005250, 0, 20.0, -60.0);
        assert!(!record.override_scene(9));
        assert!(!record.override_scene(-2));
        assert_eq!(record.eye_scene_old, None);
    }

    #[test]
    fn final_intensity_keeps_raw() {
        let mut record = HistoryRecord::new(2005250, 0, 20.0, -60.0);
        record.set_intensity(3.5);
        record.set_final_intensity(4.3);
        assert_eq!((record.traw, record.tfinal, record.ci), (3.5, 4.3, 4.3));
    }

    #[test]
    fn record_serializes_with_defaults() {
        let json = r#"{"date": 2005250, "time": 120000, "traw": 3.5}"#;
        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.traw, 3.5);
        assert_eq!(record.rule8, None);
        assert_eq!(record.time_value(), 2005250.5);
    }
}
