//! 10-degree log-spiral fit of cold cloud for curved band detection.

use log::debug;

use super::image::{IrImage, PixelIndex};
use crate::geodesy::distance::{destination, distance_bearing, DistanceUnit};

pub(crate) const RING_WIDTH_KM: f64 = 4.0;
const SPIRAL_A_KM: f64 = 25.0;
const DEGREES_PER_RADIAN: f64 = 57.29578;
const SPIRAL_B: f64 = 10.0 / DEGREES_PER_RADIAN;
const MIN_PIXELS_PER_ARC: usize = 4;
const BOX_START_CLEARANCE_KM: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiralSearch {
    /// Evaluate the spiral at the given center only.
    SinglePoint,
    /// Evaluate every 0.2 degree node within +/-1 degree of the center.
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralArc {
    /// Longest run of consecutive 15-degree arc steps over cold cloud,
    /// -99 when no center could be evaluated.
    pub arc_length: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub rotation_deg: i32,
}

impl SpiralArc {
    fn unavailable() -> Self {
        Self {
            arc_length: -99,
            latitude: -999.99,
            longitude: -999.99,
            rotation_deg: 0,
        }
    }

    /// Points of the best spiral, for plotting.
    pub fn track(&self) -> Vec<(f64, f64)> {
        (0..=540)
            .step_by(15)
            .map(|theta| spiral_point(self.latitude, self.longitude, theta, self.rotation_deg))
            .collect()
    }
}

fn spiral_point(lat: f64, lon: f64, theta: i32, rotation: i32) -> (f64, f64) {
    let radius = SPIRAL_A_KM * (SPIRAL_B * (f64::from(theta) / DEGREES_PER_RADIAN)).exp();
    let angle = if lat < 0.0 {
        f64::from(rotation - theta)
    } else {
        f64::from(theta + rotation)
    };
    destination(lat, lon, radius, angle + 180.0)
}

fn search_bounds(value: f64, search: SpiralSearch) -> (i32, i32) {
    match search {
        SpiralSearch::SinglePoint => {
            let node = (value * 100.0) as i32;
            (node, node)
        }
        SpiralSearch::Box => (((value - 1.0) * 100.0) as i32, ((value + 1.0) * 100.0) as i32),
    }
}

/// Fits the spiral against pixels at or below `threshold_k`.
///
/// The winning center is the first node, in latitude-major order, that
/// achieves the longest arc.
pub fn log_spiral(
    image: &IrImage,
    lat: f64,
    lon: f64,
    threshold_k: f64,
    search: SpiralSearch,
) -> SpiralArc {
    let resolution = image.resolution_km;
    let max_offset_km = resolution + resolution / 2.0;
    let stride = if resolution > RING_WIDTH_KM {
        1
    } else {
        (RING_WIDTH_KM - resolution + 1.0) as usize
    };
    let pixels = image.cold_pixels(threshold_k, stride);
    let index = PixelIndex::new(&pixels);

    let (lat_min, lat_max) = search_bounds(lat, search);
    let (lon_min, lon_max) = search_bounds(lon, search);

    let mut best = SpiralArc::unavailable();
    for lat_node in (lat_min..=lat_max).step_by(20) {
        let center_lat = f64::from(lat_node) / 100.0;
        for lon_node in (lon_min..=lon_max).step_by(20) {
            let center_lon = f64::from(lon_node) / 100.0;

            if search == SpiralSearch::Box
                && pixels.iter().any(|p| {
                    distance_bearing(center_lat, center_lon, p.lat, p.lon, DistanceUnit::Kilometers)
                        .distance
                        <= BOX_START_CLEARANCE_KM
                })
            {
                continue;
            }

            let mut node_best = 0;
            let mut node_rotation = 0;
            for rotation in (0..=330).step_by(30) {
                let mut run = 0;
                let mut longest = 0;
                for theta in (0..=540).step_by(15) {
                    let (guess_lat, guess_lon) =
                        spiral_point(center_lat, center_lon, theta, rotation);
                    let hits = index
                        .near(guess_lat, guess_lon)
                        .filter(|p| {
                            distance_bearing(guess_lat, guess_lon, p.lat, p.lon, DistanceUnit::Kilometers)
                                .distance
                                <= max_offset_km
                        })
                        .count();
                    if hits >= MIN_PIXELS_PER_ARC {
                        run += 1;
                        longest = longest.max(run);
                    } else {
                        run = 0;
                    }
                }
                if longest > node_best {
                    node_best = longest;
                    node_rotation = rotation;
                }
            }

            if node_best > best.arc_length {
                best = SpiralArc {
                    arc_length: node_best,
                    latitude: center_lat,
                    longitude: center_lon,
                    rotation_deg: node_rotation,
                };
            }
        }
    }
    debug!(
        "log spiral at {:.2}K: arc {} at {:.2}/{:.2}",
        threshold_k, best.arc_length, best.latitude, best.longitude
    );
    best
}
