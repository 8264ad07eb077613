use adtcore::math::FFT_BINS;
use adtcore::scene::{IrImage, KELVIN_OFFSET};
use adtcore::HistoryRecord;
use anyhow::Context;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::template::{RegionTemperatures, SceneTemplate};

/// Configuration for generating one synthetic IR scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub template: SceneTemplate,
    /// Pixels per side of the square sector.
    pub size: usize,
    /// Pixel spacing in degrees.
    pub spacing_deg: f64,
    pub resolution_km: f64,
    /// Peak amplitude of uniform pixel noise in Kelvin.
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template: SceneTemplate::Eye,
            size: 200,
            spacing_deg: 0.02,
            resolution_km: 4.0,
            noise: 0.5,
            seed: 0,
        }
    }
}

/// A synthetic image plus the region statistics the image collaborator
/// would normally measure from it.
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    pub image: IrImage,
    pub regions: RegionTemperatures,
    pub eye_profile: Vec<f64>,
    pub cloud_profile: Vec<f64>,
}

impl SyntheticScene {
    /// Copies the region temperatures into a fresh record.
    pub fn record(&self, date: i32, time: i32, lat: f64, lon: f64) -> HistoryRecord {
        let mut record = HistoryRecord::new(date, time, lat, lon);
        record.eye_temp = self.regions.eye;
        record.cloud_temp = self.regions.cloud;
        record.cw_cloud_temp = self.regions.cloud_wall;
        record.eye_stdv = self.regions.eye_stdv;
        record
    }
}

pub fn build_scene(
    config: &GeneratorConfig,
    lat: f64,
    lon: f64,
) -> anyhow::Result<SyntheticScene> {
    let size = config.size.max(2);
    let half = size as f64 / 2.0;
    let spacing = config.spacing_deg;
    let latitude = Array2::from_shape_fn((size, size), |(r, _)| {
        (lat + (half - r as f64) * spacing) as f32
    });
    let longitude = Array2::from_shape_fn((size, size), |(_, c)| {
        (lon + (c as f64 - half) * spacing) as f32
    });

    let mut rng = StdRng::seed_from_u64(config.seed);
    let painter = config.template.painter(lat, lon);
    let jitter = |rng: &mut StdRng| {
        if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        }
    };
    let mut temperature = Array2::zeros((size, size));
    for ((r, c), t) in temperature.indexed_iter_mut() {
        let kelvin = painter.kelvin(f64::from(latitude[[r, c]]), f64::from(longitude[[r, c]]));
        *t = (kelvin + jitter(&mut rng)) as f32;
    }

    let regions = config.template.regions();
    let eye_profile = ring_profile(regions.eye, config.noise, &mut rng);
    let cloud_profile = ring_profile(regions.cloud, config.noise, &mut rng);
    let image = IrImage::new(latitude, longitude, temperature, config.resolution_km)
        .context("assembling synthetic IR image")?;

    Ok(SyntheticScene {
        image,
        regions,
        eye_profile,
        cloud_profile,
    })
}

/// 64 samples around a ring: the region temperature in Kelvin with a
/// two-wave azimuthal ripple and noise.
fn ring_profile(temp_c: f64, noise: f64, rng: &mut StdRng) -> Vec<f64> {
    (0..FFT_BINS)
        .map(|i| {
            let azimuth = 2.0 * PI * i as f64 / FFT_BINS as f64;
            let ripple = 2.0 * (2.0 * azimuth).cos();
            let jitter = if noise > 0.0 {
                rng.gen_range(-noise..noise)
            } else {
                0.0
            };
            temp_c + KELVIN_OFFSET + ripple + jitter
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(template: SceneTemplate, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            template,
            size: 60,
            spacing_deg: 0.05,
            seed,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn scene_has_requested_shape() {
        let scene = build_scene(&small(SceneTemplate::Cdo, 1), 20.0, -60.0).unwrap();
        assert_eq!(scene.image.dim(), (60, 60));
        assert_eq!(scene.eye_profile.len(), FFT_BINS);
        assert_eq!(scene.cloud_profile.len(), FFT_BINS);
    }

    #[test]
    fn same_seed_gives_same_scene() {
        let a = build_scene(&small(SceneTemplate::Eye, 7), 20.0, -60.0).unwrap();
        let b = build_scene(&small(SceneTemplate::Eye, 7), 20.0, -60.0).unwrap();
        assert_eq!(a.image.temperature(), b.image.temperature());
        assert_eq!(a.eye_profile, b.eye_profile);
    }

    #[test]
    fn record_carries_region_temperatures() {
        let scene = build_scene(&small(SceneTemplate::Band, 3), 20.0, -60.0).unwrap();
        let record = scene.record(2005250, 120000, 20.0, -60.0);
        assert_eq!(record.cloud_temp, -40.0);
        assert_eq!(record.cw_cloud_temp, -45.0);
        assert_eq!(record.time, 120000);
    }
}
