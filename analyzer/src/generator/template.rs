use adtcore::geodesy::{distance_bearing, DistanceUnit};
use adtcore::scene::SpiralArc;
use serde::{Deserialize, Serialize};

const BACKGROUND_K: f64 = 290.0;
const BAND_HALF_WIDTH_KM: f64 = 8.0;
const BAND_TRACK_POINTS: usize = 20;

/// Idealised cloud patterns the synthetic scenes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SceneTemplate {
    #[default]
    Eye,
    Cdo,
    Band,
    Shear,
}

/// Eye, cloud and cloud-wall temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTemperatures {
    pub eye: f64,
    pub cloud: f64,
    pub cloud_wall: f64,
    pub eye_stdv: f64,
}

impl SceneTemplate {
    pub fn regions(self) -> RegionTemperatures {
        let (eye, cloud, cloud_wall, eye_stdv) = match self {
            Self::Eye => (15.0, -75.0, -72.0, 12.0),
            Self::Cdo => (-70.0, -75.0, -72.0, 2.0),
            Self::Band => (10.0, -40.0, -45.0, 4.0),
            Self::Shear => (20.0, 10.0, 15.0, 3.0),
        };
        RegionTemperatures {
            eye,
            cloud,
            cloud_wall,
            eye_stdv,
        }
    }

    /// Builds the noiseless brightness-temperature field around a center.
    pub fn painter(self, lat: f64, lon: f64) -> ScenePainter {
        let band: Vec<(f64, f64)> = match self {
            Self::Band => SpiralArc {
                arc_length: 0,
                latitude: lat,
                longitude: lon,
                rotation_deg: 90,
            }
            .track()
            .into_iter()
            .take(BAND_TRACK_POINTS)
            .collect(),
            _ => Vec::new(),
        };
        ScenePainter {
            template: self,
            lat,
            lon,
            band,
        }
    }
}

pub struct ScenePainter {
    template: SceneTemplate,
    lat: f64,
    lon: f64,
    band: Vec<(f64, f64)>,
}

impl ScenePainter {
    /// Brightness temperature in Kelvin at a pixel.
    pub fn kelvin(&self, lat: f64, lon: f64) -> f64 {
        let km = |a: f64, b: f64, c: f64, d: f64| {
            distance_bearing(a, b, c, d, DistanceUnit::Kilometers).distance
        };
        let from_center = km(lat, lon, self.lat, self.lon);
        match self.template {
            SceneTemplate::Eye if from_center <= 12.0 => 285.0,
            SceneTemplate::Eye if from_center <= 65.0 => 200.0,
            SceneTemplate::Cdo if from_center <= 110.0 => 190.0,
            SceneTemplate::Band
                if self
                    .band
                    .iter()
                    .any(|&(blat, blon)| km(blat, blon, lat, lon) <= BAND_HALF_WIDTH_KM) =>
            {
                215.0
            }
            SceneTemplate::Shear if km(lat, lon, self.lat, self.lon - 0.8) <= 55.0 => 205.0,
            _ => BACKGROUND_K,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_template_has_warm_center_and_cold_ring() {
        let painter = SceneTemplate::Eye.painter(20.0, -60.0);
        assert_eq!(painter.kelvin(20.0, -60.0), 285.0);
        assert_eq!(painter.kelvin(20.4, -60.0), 200.0);
        assert_eq!(painter.kelvin(22.0, -60.0), BACKGROUND_K);
    }

    #[test]
    fn shear_template_displaces_cold_cloud() {
        let painter = SceneTemplate::Shear.painter(20.0, -60.0);
        assert_eq!(painter.kelvin(20.0, -60.0), BACKGROUND_K);
        assert_eq!(painter.kelvin(20.0, -60.8), 205.0);
    }

    #[test]
    fn template_names_parse_from_yaml() {
        let template: SceneTemplate = serde_yaml::from_str("band").unwrap();
        assert_eq!(template, SceneTemplate::Band);
    }
}
