//! Central dense overcast sizing and the shear-distance stub.

use log::debug;

use super::image::IrImage;
use crate::geodesy::distance::{distance_bearing, DistanceBearing, DistanceUnit};

/// Value reported for measurements the analysis cannot make.
pub const DISTANCE_UNAVAILABLE: f64 = -99.0;

const MANUAL_EYE_RADIUS_KM: f64 = 24.0;
const MIN_QUADRANT_RADIUS_KM: f64 = MANUAL_EYE_RADIUS_KM + super::logspiral::RING_WIDTH_KM;
const QUADRANT_HALF_WIDTH_DEG: f64 = 15.0;
const QUADRANT_CENTERS: [f64; 4] = [45.0, 135.0, 225.0, 315.0];
const UNSET_RADIUS_KM: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdoMeasurement {
    /// Mean of the four quadrant radii, 0 when fewer than three qualify.
    pub radius_km: f64,
    pub quadrant_radii: [f64; 4],
    /// Ratio of opposing diagonal sums, at least 1; `None` when unsized.
    pub symmetry: Option<f64>,
}

/// Distance from `(lat, lon)` to the nearest pixel warmer than
/// `threshold_k` along each diagonal.
///
/// Pixels inside the eye radius are ignored. A quadrant radius below
/// 28 km disqualifies that quadrant.
pub fn cdo_size(image: &IrImage, lat: f64, lon: f64, threshold_k: f64) -> CdoMeasurement {
    let warm = image.warm_pixels(threshold_k);
    let mut radii = [UNSET_RADIUS_KM; 4];
    let mut max_distance: f64 = 0.0;
    let mut valid = 4;

    if warm.len() < image.pixel_count() {
        for pixel in &warm {
            let DistanceBearing { distance, bearing } =
                distance_bearing(lat, lon, pixel.lat, pixel.lon, DistanceUnit::Kilometers);
            max_distance = max_distance.max(distance);
            if distance > MANUAL_EYE_RADIUS_KM {
                for (radius, center) in radii.iter_mut().zip(QUADRANT_CENTERS) {
                    if (bearing - center).abs() <= QUADRANT_HALF_WIDTH_DEG && distance < *radius {
                        *radius = distance;
                    }
                }
            }
        }
        valid -= radii.iter().filter(|&&r| r < MIN_QUADRANT_RADIUS_KM).count();
    } else {
        radii = [0.0; 4];
    }

    if valid < 3 {
        debug!("cdo at {:.2}K unsized, radii {:?}", threshold_k, radii);
        return CdoMeasurement {
            radius_km: 0.0,
            quadrant_radii: radii,
            symmetry: None,
        };
    }

    for radius in radii.iter_mut() {
        *radius = radius.min(max_distance);
    }
    let radius_km = radii.iter().sum::<f64>() / 4.0;
    let diagonal_a = radii[0] + radii[2];
    let diagonal_b = radii[1] + radii[3];
    let symmetry = if diagonal_a > 0.0 && diagonal_b > 0.0 {
        let ratio = diagonal_a / diagonal_b;
        Some(ratio.max(1.0 / ratio))
    } else {
        None
    };
    CdoMeasurement {
        radius_km,
        quadrant_radii: radii,
        symmetry,
    }
}

/// Shear distance between the low-level center and the convection.
/// There is no remapped black/white shear analysis, so it is always
/// [`DISTANCE_UNAVAILABLE`].
pub const fn shear_distance() -> f64 {
    DISTANCE_UNAVAILABLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Cold disc of `radius_deg` centred at (20, -60), warm elsewhere.
    fn disc_image(radius_deg: f32) -> IrImage {
        let size = 101;
        let lat = Array2::from_shape_fn((size, size), |(r, _)| 21.0 - r as f32 * 0.02);
        let lon = Array2::from_shape_fn((size, size), |(_, c)| -61.0 + c as f32 * 0.02);
        let temp = Array2::from_shape_fn((size, size), |(r, c)| {
            let dlat = 21.0 - r as f32 * 0.02 - 20.0;
            let dlon = -61.0 + c as f32 * 0.02 + 60.0;
            if (dlat * dlat + dlon * dlon).sqrt() <= radius_deg {
                200.0
            } else {
                290.0
            }
        });
        IrImage::new(lat, lon, temp, 4.0).unwrap()
    }

    #[test]
    fn large_cold_disc_is_sized() {
        let image = disc_image(0.6);
        let cdo = cdo_size(&image, 20.0, -60.0, 240.0);
        assert!(cdo.radius_km > 55.0 && cdo.radius_km < 75.0, "{}", cdo.radius_km);
        let symmetry = cdo.symmetry.unwrap();
        assert!(symmetry >= 1.0 && symmetry < 1.2);
    }

    #[test]
    fn small_disc_fails_quadrant_minimum() {
        let image = disc_image(0.15);
        let cdo = cdo_size(&image, 20.0, -60.0, 240.0);
        assert_eq!(cdo.radius_km, 0.0);
        assert!(cdo.symmetry.is_none());
    }

    #[test]
    fn scene_without_warm_pixels_has_zero_radius() {
        let image = disc_image(5.0);
        let cdo = cdo_size(&image, 20.0, -60.0, 240.0);
        assert_eq!(cdo.quadrant_radii, [0.0; 4]);
        assert_eq!(cdo.radius_km, 0.0);
    }

    #[test]
    fn scene_entirely_warm_has_zero_radius() {
        let image = disc_image(0.6);
        let cdo = cdo_size(&image, 20.0, -60.0, 150.0);
        assert_eq!(cdo.quadrant_radii, [0.0; 4]);
        assert!(cdo.symmetry.is_none());
    }

    #[test]
    fn shear_distance_is_unavailable() {
        assert_eq!(shear_distance(), DISTANCE_UNAVAILABLE);
    }
}
