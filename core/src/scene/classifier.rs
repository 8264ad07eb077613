use log::debug;

use super::bd_curve::{categorize, threshold_kelvin, BdCategory};
use super::cdo::{cdo_size, shear_distance};
use super::image::IrImage;
use super::logspiral::{log_spiral, SpiralSearch};
use super::lookback::HistoryLookback;
use crate::history::{CloudScene, EyeScene, HistoryRecord, HistoryStore};
use crate::prelude::AnalysisConfig;

const LARGE_EYE_RADIUS_KM: f64 = 38.0;
const PINHOLE_RMW_KM: f64 = 12.0;
const EYE_SCORE_THRESHOLD: f64 = 0.5;
/// BD levels tried by the CDO size pass: dark gray through white.
const CDO_LEVELS: std::ops::RangeInclusive<usize> = 2..=6;

/// Scene analysis for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneClassification {
    pub eye_scene: EyeScene,
    pub cloud_scene: CloudScene,
    pub eye_score: f64,
    pub cloud_score: f64,
    pub rmw_km: f64,
    /// Eye size for eye scenes, CDO radius at the dark gray level for
    /// CDO scenes, 4 km minimum for shear scenes.
    pub eye_cdo_size_km: f64,
    /// BD level at which a curved band was found, 0 otherwise.
    pub ring_cb: i32,
    pub ring_cb_val: i32,
    pub ring_cb_val_max: i32,
    pub ring_cb_val_max_lat: f64,
    pub ring_cb_val_max_lon: f64,
    /// CDO radius at each BD level 2..=6, when the size pass ran.
    pub cdo_profile: Option<[f64; 5]>,
    pub lookback: HistoryLookback,
}

impl SceneClassification {
    /// Writes the scene fields into `record`, clearing any override.
    pub fn apply_to(&self, record: &mut HistoryRecord) {
        record.eye_scene = self.eye_scene;
        record.cloud_scene = self.cloud_scene;
        record.eye_scene_old = None;
        record.cloud_scene_old = None;
        record.rmw = self.rmw_km;
        record.eye_cdo_size = self.eye_cdo_size_km;
        record.ring_cb = self.ring_cb;
        record.ring_cb_val = self.ring_cb_val;
        record.ring_cb_val_max = self.ring_cb_val_max;
        record.ring_cb_val_max_lat = self.ring_cb_val_max_lat;
        record.ring_cb_val_max_lon = self.ring_cb_val_max_lon;
    }
}

/// Temperature differences the scoring rules compare.
struct SceneContrast {
    eye: BdCategory,
    cloud: BdCategory,
    cw: BdCategory,
    /// cloud minus cloud-wall temperature
    cloud_temp_diff: f64,
    /// eye minus the colder of cloud and cloud-wall temperature
    eye_temp_diff: f64,
    eye_cw_value_diff: f64,
    eye_cloud_value_diff: f64,
    cloud_value_diff: f64,
    cloud_bd_diff: i32,
    eye_cloud_bd_diff: i32,
}

impl SceneContrast {
    fn new(record: &HistoryRecord) -> Self {
        let eye = categorize(record.eye_temp);
        let cloud = categorize(record.cloud_temp);
        let cw = categorize(record.cw_cloud_temp);
        Self {
            eye,
            cloud,
            cw,
            cloud_temp_diff: record.cloud_temp - record.cw_cloud_temp,
            eye_temp_diff: record.eye_temp - record.cloud_temp.min(record.cw_cloud_temp),
            eye_cw_value_diff: cw.value() - eye.value(),
            eye_cloud_value_diff: cloud.value() - eye.value(),
            cloud_value_diff: cloud.value() - cw.value(),
            cloud_bd_diff: cloud.index() - cw.index(),
            eye_cloud_bd_diff: cloud.index() - eye.index(),
        }
    }
}

/// Flags raised by the cloud score before the spiral searches.
#[derive(Debug, Default)]
struct CloudFlags {
    shear: bool,
    irregular: bool,
    curved: bool,
    gray_shade: bool,
    black_white: bool,
    embedded: bool,
}

/// Dvorak scene typing from BD categories, FFT harmonics and history.
#[derive(Debug, Clone)]
pub struct SceneClassifier {
    config: AnalysisConfig,
}

impl SceneClassifier {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classifies `current` against `history` and the image around the
    /// storm center. Pure in its inputs.
    pub fn classify(
        &self,
        current: &HistoryRecord,
        history: &HistoryStore,
        image: &IrImage,
    ) -> SceneClassification {
        let contrast = SceneContrast::new(current);
        let lookback =
            HistoryLookback::scan(history, current.time_value(), &self.config, contrast.cw.value());
        let (lat, lon) = (current.latitude, current.longitude);

        let eye_score = self.eye_score(current, &contrast, &lookback);
        let mut eye_scene = if eye_score >= EYE_SCORE_THRESHOLD {
            EyeScene::Eye
        } else {
            EyeScene::NoEye
        };

        let mut eye_cdo_size_km = 0.0;
        let rmw_km = if self.config.has_manual_rmw() {
            eye_cdo_size_km = self.config.manual_rmw_km - 1.0;
            self.config.manual_rmw_km
        } else {
            image.rmw_estimate_km
        };
        if eye_scene == EyeScene::Eye && eye_cdo_size_km >= LARGE_EYE_RADIUS_KM {
            eye_scene = EyeScene::LargeEye;
        }

        let cloud_score = cloud_score(current, &contrast, &lookback, eye_scene);
        let mut flags = cloud_flags(current, &contrast, eye_scene, cloud_score);

        let embedded_candidate = current.cloud_temp < current.cw_cloud_temp
            && current.cw_cloud_temp < current.eye_temp;
        if !flags.curved && embedded_candidate {
            let threshold = threshold_kelvin(contrast.cw.category + 1);
            let arc = log_spiral(image, lat, lon, threshold, SpiralSearch::SinglePoint);
            flags.embedded = (8..20).contains(&arc.arc_length);
            debug!("embedded center check: arc {}", arc.arc_length);
        }

        let mut cloud_scene = CloudScene::UniformCdo;
        let mut ring_cb = 0;
        let mut ring_cb_val = 0;
        let mut ring_cb_val_max = 0;
        let mut ring_cb_val_max_lat = lat;
        let mut ring_cb_val_max_lon = lon;

        if flags.curved {
            if flags.shear {
                eye_scene = EyeScene::NoEye;
                cloud_scene = CloudScene::Shear;
                eye_cdo_size_km = shear_size();
            } else if flags.irregular {
                eye_scene = EyeScene::NoEye;
                cloud_scene = CloudScene::IrregularCdo;
            } else {
                let band = search_curved_band(image, lat, lon, &contrast, &mut flags);
                match band {
                    Some((level, arc)) => {
                        ring_cb = level;
                        ring_cb_val = arc;
                        eye_scene = EyeScene::NoEye;
                        cloud_scene = CloudScene::CurvedBand;
                        if self.config.curved_band_max_search {
                            let threshold = threshold_kelvin(level as usize);
                            let best = log_spiral(image, lat, lon, threshold, SpiralSearch::Box);
                            ring_cb_val_max = best.arc_length;
                            ring_cb_val_max_lat = best.latitude;
                            ring_cb_val_max_lon = best.longitude;
                        }
                    }
                    None => {
                        flags.curved = false;
                        flags.embedded = false;
                    }
                }
            }
        }

        if !flags.curved {
            if flags.shear {
                eye_scene = EyeScene::NoEye;
                cloud_scene = CloudScene::Shear;
                eye_cdo_size_km = shear_size();
            } else {
                cloud_scene = CloudScene::UniformCdo;
                if flags.embedded {
                    cloud_scene = CloudScene::EmbeddedCenter;
                }
                if flags.irregular {
                    cloud_scene = CloudScene::IrregularCdo;
                }
                if self.is_pinhole(current, &contrast, &lookback, eye_score, cloud_scene) {
                    eye_scene = EyeScene::PinholeEye;
                }
            }
        }

        let mut cdo_profile = None;
        if cloud_scene.code() <= CloudScene::IrregularCdo.code() && eye_scene == EyeScene::NoEye {
            let mut profile = [0.0; 5];
            for (slot, level) in profile.iter_mut().zip(CDO_LEVELS) {
                *slot = cdo_size(image, lat, lon, threshold_kelvin(level)).radius_km;
            }
            eye_cdo_size_km = profile[0];
            cdo_profile = Some(profile);
        }

        debug!(
            "scene {} / {}: eye score {:.2}, cloud score {:.2}, size {:.1}",
            eye_scene.label(),
            cloud_scene.label(),
            eye_score,
            cloud_score,
            eye_cdo_size_km
        );

        SceneClassification {
            eye_scene,
            cloud_scene,
            eye_score,
            cloud_score,
            rmw_km,
            eye_cdo_size_km,
            ring_cb,
            ring_cb_val,
            ring_cb_val_max,
            ring_cb_val_max_lat,
            ring_cb_val_max_lon,
            cdo_profile,
            lookback,
        }
    }

    fn eye_score(
        &self,
        current: &HistoryRecord,
        contrast: &SceneContrast,
        lookback: &HistoryLookback,
    ) -> f64 {
        let harmonics = 1.0 - f64::from(current.eye_fft - 2) * 0.1;
        let eye_bd = -(contrast.eye.value() * 0.5);
        let mut variability = if current.eye_stdv > 10.0 { 0.5 } else { 0.0 };
        let contrast_term = contrast.eye_cloud_value_diff * 0.25 + contrast.eye_cw_value_diff * 0.5;
        if lookback.found_minus_12hr && lookback.previous_eye_present() && lookback.max_rule9_tno > 5.0
        {
            variability += 0.25;
        }
        let mut history_term = 0.0;
        if lookback.tno_minus_12hr <= 4.5 {
            history_term = (lookback.tno_minus_12hr - 4.5).max(-1.0);
        }
        if lookback.last_rule9 > 0 && lookback.previous_tno < 4.0 {
            history_term -= 0.5;
        }
        harmonics + eye_bd + variability + contrast_term + history_term
    }

    fn is_pinhole(
        &self,
        current: &HistoryRecord,
        contrast: &SceneContrast,
        lookback: &HistoryLookback,
        eye_score: f64,
        cloud_scene: CloudScene,
    ) -> bool {
        let manual = self.config.manual_rmw_km;
        if manual > 0.0 && manual < PINHOLE_RMW_KM {
            return true;
        }
        eye_score > -0.25
            && eye_score < 1.5
            && contrast.eye_cloud_bd_diff >= 2
            && current.eye_fft <= 2
            && contrast.cw.value() > 6.0
            && cloud_scene.code() <= CloudScene::EmbeddedCenter.code()
            && current.cloud_fft <= 4
            && lookback.tno_minus_12hr >= 3.5
    }
}

fn cloud_score(
    current: &HistoryRecord,
    contrast: &SceneContrast,
    lookback: &HistoryLookback,
    eye_scene: EyeScene,
) -> f64 {
    let cw = contrast.cw.value();
    let cw_term = cw * 0.25;
    let cloud_term = contrast.cloud.value() * 0.25;
    let harmonics = if current.cloud_fft <= 2 {
        (cw * 0.25).min(1.5)
    } else {
        0.0
    };
    let previous = if lookback.previous_cloud_scene.code() >= CloudScene::CurvedBand.code() {
        -0.5
    } else {
        0.5
    };
    let mut history_term = 0.0;
    if cw > 2.0 {
        let tno = lookback.tno_minus_12hr;
        if tno >= 2.5 {
            if eye_scene == EyeScene::Eye {
                history_term = (tno - 2.5).min(1.0);
            }
            if tno >= 3.5 {
                history_term += 1.0;
            }
        }
        if lookback.found_minus_12hr && lookback.found_eye_scene {
            history_term += 1.25;
        }
    }
    cw_term + cloud_term + harmonics + previous + history_term
}

/// Score bands are applied in ascending order and later bands overwrite
/// earlier ones.
fn cloud_flags(
    current: &HistoryRecord,
    contrast: &SceneContrast,
    eye_scene: EyeScene,
    score: f64,
) -> CloudFlags {
    let symmetry = current.cloud_symmetry;
    let mut flags = CloudFlags {
        curved: true,
        gray_shade: true,
        ..CloudFlags::default()
    };
    if score < 0.0 {
        flags.shear = true;
    }
    if score >= 1.0 && contrast.eye_temp_diff < 0.0 && symmetry > 40.0 {
        flags.irregular = true;
    }
    if (2.0..3.0).contains(&score) {
        if contrast.eye_temp_diff < 0.0 && symmetry > 30.0 {
            flags.irregular = true;
        }
        if contrast.cw.category >= 3 {
            if contrast.cloud_bd_diff > 0 && contrast.cloud_temp_diff < -8.0 {
                flags.gray_shade = false;
                flags.black_white = true;
            }
            let ragged_eye = contrast.eye.value() > 1.0 && contrast.eye_cloud_bd_diff >= 2;
            if eye_scene == EyeScene::Eye || ragged_eye {
                flags.curved = false;
            }
            if contrast.cloud_value_diff <= 0.0 && contrast.eye_cw_value_diff < 1.0 {
                flags.curved = false;
            }
        }
    }
    if score >= 3.0 {
        flags.curved = false;
        if contrast.cloud_bd_diff < 0 && contrast.cloud_temp_diff > 8.0 && symmetry > 30.0 {
            flags.irregular = true;
            flags.curved = true;
        }
    }
    flags
}

fn shear_size() -> f64 {
    shear_distance().max(4.0)
}

/// Gray-shade spiral search from light gray down to dark gray, falling
/// back to the black and white levels. Returns the BD level and arc.
fn search_curved_band(
    image: &IrImage,
    lat: f64,
    lon: f64,
    contrast: &SceneContrast,
    flags: &mut CloudFlags,
) -> Option<(i32, i32)> {
    let spiral = |level: i32| {
        log_spiral(image, lat, lon, threshold_kelvin(level as usize), SpiralSearch::SinglePoint)
            .arc_length
    };
    let mut found = false;
    let mut level = 4;
    let mut arc = 0;

    if flags.gray_shade {
        while level >= 2 && !found {
            arc = spiral(level);
            if arc >= 8 || level == 2 {
                if arc > 25 {
                    if level == 4 {
                        flags.gray_shade = false;
                        flags.black_white = true;
                        found = true;
                    } else {
                        level = 0;
                    }
                } else if level == 2 && arc < 7 {
                    flags.black_white = false;
                    flags.shear = true;
                    if contrast.eye.value() > 1.5 || contrast.cloud.value() > 2.5 {
                        flags.shear = false;
                        flags.irregular = true;
                    }
                    level -= 1;
                } else {
                    found = true;
                }
            } else {
                level -= 1;
            }
        }
    }

    if flags.black_white {
        found = false;
        flags.curved = false;
        level = 6;
        while level > 4 && !found {
            arc = spiral(level);
            if (9..=25).contains(&arc) {
                found = true;
            } else {
                level -= 1;
            }
        }
    }

    debug!("curved band search: level {}, arc {}, found {}", level, arc, found);
    found.then_some((level, arc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::distance::{distance_bearing, DistanceUnit};
    use crate::scene::logspiral::SpiralArc;
    use ndarray::Array2;

    fn grid(size: usize, step: f32) -> (Array2<f32>, Array2<f32>) {
        let half = size as f32 / 2.0;
        let lat = Array2::from_shape_fn((size, size), |(r, _)| 20.0 + (half - r as f32) * step);
        let lon = Array2::from_shape_fn((size, size), |(_, c)| -60.0 + (c as f32 - half) * step);
        (lat, lon)
    }

    /// Cold disc of `radius_deg` around (20, -60).
    fn disc_image(radius_deg: f32, cold_k: f32) -> IrImage {
        let (lat, lon) = grid(101, 0.02);
        let temp = Array2::from_shape_fn((101, 101), |(r, c)| {
            let dlat = lat[[r, c]] - 20.0;
            let dlon = lon[[r, c]] + 60.0;
            if (dlat * dlat + dlon * dlon).sqrt() <= radius_deg {
                cold_k
            } else {
                290.0
            }
        });
        IrImage::new(lat, lon, temp, 4.0).unwrap()
    }

    /// Band of `band_k` along the first `points` steps of a log spiral
    /// around (20, -60).
    fn band_image(points: usize, band_k: f32, background_k: f32) -> IrImage {
        let (lat, lon) = grid(200, 0.02);
        let track = SpiralArc {
            arc_length: 0,
            latitude: 20.0,
            longitude: -60.0,
            rotation_deg: 90,
        }
        .track();
        let inner = &track[..points];
        let mut temp = Array2::from_elem((200, 200), background_k);
        for ((r, c), t) in temp.indexed_iter_mut() {
            let (plat, plon) = (f64::from(lat[[r, c]]), f64::from(lon[[r, c]]));
            if inner.iter().any(|&(blat, blon)| {
                distance_bearing(blat, blon, plat, plon, DistanceUnit::Kilometers).distance <= 8.0
            }) {
                *t = band_k;
            }
        }
        IrImage::new(lat, lon, temp, 5.0).unwrap()
    }

    fn record(eye: f64, cloud: f64, cw: f64) -> HistoryRecord {
        let mut record = HistoryRecord::new(2005250, 120000, 20.0, -60.0);
        record.eye_temp = eye;
        record.cloud_temp = cloud;
        record.cw_cloud_temp = cw;
        record.eye_fft = 5;
        record.cloud_fft = 2;
        record
    }

    #[test]
    fn warm_disorganised_cloud_is_shear() {
        let classifier = SceneClassifier::new(AnalysisConfig::default());
        let result = classifier.classify(
            &record(20.0, 10.0, 15.0),
            &HistoryStore::new(),
            &disc_image(0.6, 200.0),
        );
        assert_eq!(result.cloud_scene, CloudScene::Shear);
        assert_eq!(result.eye_scene, EyeScene::NoEye);
        assert_eq!(result.eye_cdo_size_km, 4.0);
        assert!(result.cloud_score < 0.0);
        assert!(result.cdo_profile.is_none());
    }

    #[test]
    fn warm_eye_in_cold_ring_is_eye() {
        let mut current = record(15.0, -75.0, -72.0);
        current.eye_fft = 2;
        current.eye_stdv = 12.0;
        let classifier = SceneClassifier::new(AnalysisConfig::default());
        let result = classifier.classify(&current, &HistoryStore::new(), &disc_image(0.6, 200.0));
        assert_eq!(result.eye_scene, EyeScene::Eye);
        assert_eq!(result.cloud_scene, CloudScene::UniformCdo);
        assert!(result.eye_score > 5.0);
        assert_eq!(result.eye_cdo_size_km, 0.0);
        assert_eq!(result.rmw_km, -99.0);
    }

    #[test]
    fn manual_rmw_makes_large_eye() {
        let mut current = record(15.0, -75.0, -72.0);
        current.eye_fft = 2;
        current.eye_stdv = 12.0;
        let config = AnalysisConfig {
            manual_rmw_km: 45.0,
            ..AnalysisConfig::default()
        };
        let result = SceneClassifier::new(config).classify(
            &current,
            &HistoryStore::new(),
            &disc_image(0.6, 200.0),
        );
        assert_eq!(result.eye_scene, EyeScene::LargeEye);
        assert_eq!(result.rmw_km, 45.0);
        assert_eq!(result.eye_cdo_size_km, 44.0);
    }

    #[test]
    fn cold_overcast_without_eye_is_sized() {
        let classifier = SceneClassifier::new(AnalysisConfig::default());
        let result = classifier.classify(
            &record(-70.0, -75.0, -72.0),
            &HistoryStore::new(),
            &disc_image(1.0, 190.0),
        );
        assert_eq!(result.eye_scene, EyeScene::NoEye);
        assert_eq!(result.cloud_scene, CloudScene::UniformCdo);
        let profile = result.cdo_profile.unwrap();
        assert!(result.eye_cdo_size_km > 95.0 && result.eye_cdo_size_km < 120.0);
        assert_eq!(profile[0], result.eye_cdo_size_km);
        assert!(profile.iter().all(|&r| (r - profile[0]).abs() < 1e-9));
    }

    #[test]
    fn spiral_band_is_curved_band() {
        let config = AnalysisConfig {
            curved_band_max_search: false,
            ..AnalysisConfig::default()
        };
        let result = SceneClassifier::new(config).classify(
            &record(10.0, -40.0, -45.0),
            &HistoryStore::new(),
            &band_image(20, 215.0, 290.0),
        );
        assert_eq!(result.cloud_scene, CloudScene::CurvedBand);
        assert_eq!(result.eye_scene, EyeScene::NoEye);
        assert_eq!(result.ring_cb, 4);
        assert!((8..=25).contains(&result.ring_cb_val), "{}", result.ring_cb_val);
        assert_eq!(result.ring_cb_val_max, 0);
        assert_eq!(result.ring_cb_val_max_lat, 20.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = SceneClassifier::new(AnalysisConfig::default());
        let current = record(-70.0, -75.0, -72.0);
        let history = HistoryStore::new();
        let image = disc_image(1.0, 190.0);
        let first = classifier.classify(&current, &history, &image);
        let second = classifier.classify(&current, &history, &image);
        assert_eq!(first, second);
    }

    #[test]
    fn apply_clears_override() {
        let classifier = SceneClassifier::new(AnalysisConfig::default());
        let mut current = record(20.0, 10.0, 15.0);
        current.override_scene(5);
        let result = classifier.classify(&current, &HistoryStore::new(), &disc_image(0.6, 200.0));
        result.apply_to(&mut current);
        assert_eq!(current.cloud_scene, CloudScene::Shear);
        assert!(current.eye_scene_old.is_none());
        assert!(current.cloud_scene_old.is_none());
        assert_eq!(current.eye_cdo_size, 4.0);
    }

    #[test]
    fn small_manual_rmw_is_pinhole() {
        let config = AnalysisConfig {
            manual_rmw_km: 8.0,
            ..AnalysisConfig::default()
        };
        let result = SceneClassifier::new(config).classify(
            &record(-70.0, -75.0, -72.0),
            &HistoryStore::new(),
            &disc_image(1.0, 190.0),
        );
        assert!(result.eye_score < EYE_SCORE_THRESHOLD);
        assert_eq!(result.eye_scene, EyeScene::PinholeEye);
        assert_eq!(result.cloud_scene, CloudScene::UniformCdo);
        assert_eq!(result.rmw_km, 8.0);
        assert_eq!(result.eye_cdo_size_km, 7.0);
        assert!(result.cdo_profile.is_none());
    }

    #[test]
    fn short_cold_arc_under_warmer_eye_is_embedded() {
        let result = SceneClassifier::new(AnalysisConfig::default()).classify(
            &record(-71.0, -75.0, -72.0),
            &HistoryStore::new(),
            &band_image(12, 190.0, 290.0),
        );
        assert!(result.cloud_score >= 3.0);
        assert_eq!(result.eye_scene, EyeScene::NoEye);
        assert_eq!(result.cloud_scene, CloudScene::EmbeddedCenter);
        assert_eq!(result.ring_cb, 0);
        assert!(result.cdo_profile.is_some());
    }

    #[test]
    fn irregular_gate_depends_on_score_band() {
        // eye colder than both rings, cloud a BD band warmer than the wall
        let mut current = record(-80.0, -45.0, -60.0);
        let contrast = SceneContrast::new(&current);
        assert!(contrast.eye_temp_diff < 0.0);
        assert_eq!(contrast.cloud_bd_diff, -1);

        current.cloud_symmetry = 35.0;
        assert!(!cloud_flags(&current, &contrast, EyeScene::NoEye, 1.5).irregular);
        assert!(cloud_flags(&current, &contrast, EyeScene::NoEye, 2.5).irregular);
        let strong = cloud_flags(&current, &contrast, EyeScene::NoEye, 3.5);
        assert!(strong.irregular);
        assert!(strong.curved);

        current.cloud_symmetry = 45.0;
        assert!(cloud_flags(&current, &contrast, EyeScene::NoEye, 1.5).irregular);
        assert!(!cloud_flags(&current, &contrast, EyeScene::NoEye, 0.5).irregular);

        current.cloud_symmetry = 25.0;
        let flags = cloud_flags(&current, &contrast, EyeScene::NoEye, 3.5);
        assert!(!flags.irregular);
        assert!(!flags.curved);
    }

    #[test]
    fn earlier_band_outcome_survives_later_bands() {
        // same cloud and wall band, so the high-score irregular rule cannot fire
        let mut current = record(-80.0, -62.0, -60.0);
        current.cloud_symmetry = 45.0;
        let contrast = SceneContrast::new(&current);
        assert_eq!(contrast.cloud_bd_diff, 0);

        let flags = cloud_flags(&current, &contrast, EyeScene::NoEye, 3.5);
        assert!(flags.irregular);
        assert!(!flags.curved);
        assert!(!flags.shear);
    }

    #[test]
    fn curved_band_falls_back_to_black_and_white() {
        // everything is dark gray, so the gray-shade arc wraps the whole spiral
        let image = band_image(12, 205.0, 215.0);
        let contrast = SceneContrast::new(&record(10.0, -40.0, -45.0));
        let mut flags = CloudFlags {
            curved: true,
            gray_shade: true,
            ..CloudFlags::default()
        };
        let band = search_curved_band(&image, 20.0, -60.0, &contrast, &mut flags);
        assert!(!flags.gray_shade);
        assert!(flags.black_white);
        assert!(!flags.curved);
        let (level, arc) = band.unwrap();
        assert_eq!(level, 5);
        assert!((9..=25).contains(&arc), "{}", arc);
    }

    #[test]
    fn failed_black_and_white_search_finds_nothing() {
        let image = disc_image(0.6, 290.0);
        let contrast = SceneContrast::new(&record(10.0, -40.0, -45.0));
        let mut flags = CloudFlags {
            curved: true,
            black_white: true,
            ..CloudFlags::default()
        };
        assert_eq!(search_curved_band(&image, 20.0, -60.0, &contrast, &mut flags), None);
        assert!(!flags.curved);
    }
}
