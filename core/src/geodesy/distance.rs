//! Great-circle distance and bearing on a spherical earth.
//!
//! Bearings are measured clockwise from north with longitudes taken as
//! positive west, matching the convention of the image navigation.

pub(crate) const RADIANS_PER_DEGREE: f64 = 0.017453292;
const HALF_PI: f64 = 1.570797;
const LEGACY_PI: f64 = 3.14159265358979;
const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_DEGREE: f64 = 111.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Kilometers,
    StatuteMiles,
    NauticalMiles,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceBearing {
    pub distance: f64,
    /// Degrees in [0, 360).
    pub bearing: f64,
}

/// Distance from `start` to `end` and the bearing of `end` as seen from `start`.
pub fn distance_bearing(
    end_lat: f64,
    end_lon: f64,
    start_lat: f64,
    start_lon: f64,
    unit: DistanceUnit,
) -> DistanceBearing {
    let start_lat_r = start_lat * RADIANS_PER_DEGREE;
    let start_lon_r = start_lon * RADIANS_PER_DEGREE;
    let end_lat_r = end_lat * RADIANS_PER_DEGREE;
    let end_lon_r = end_lon * RADIANS_PER_DEGREE;

    let dx = end_lat_r.cos() * end_lon_r.cos() - start_lat_r.cos() * start_lon_r.cos();
    let dy = end_lat_r.cos() * end_lon_r.sin() - start_lat_r.cos() * start_lon_r.sin();
    let dz = end_lat_r.sin() - start_lat_r.sin();
    let chord = (dx * dx + dy * dy + dz * dz).sqrt();

    let km = 2.0 * (chord / 2.0).asin() * EARTH_RADIUS_KM;
    let distance = match unit {
        DistanceUnit::Kilometers => km,
        DistanceUnit::StatuteMiles => (69.0 * km + 55.0) / 111.0,
        DistanceUnit::NauticalMiles => (60.0 * km + 55.0) / 111.0,
    };

    let mut sine = if distance.abs() > 0.0001 {
        ((start_lon_r - end_lon_r).sin() * (LEGACY_PI / 2.0 - end_lat_r).sin()) / chord.sin()
    } else {
        0.0
    };
    if sine.abs() > 1.0 {
        sine = 1.0_f64.copysign(sine);
    }
    let mut bearing = sine.asin() / RADIANS_PER_DEGREE;
    if end_lat_r < start_lat_r {
        bearing = 180.0 - bearing;
    }
    if bearing < 0.0 {
        bearing += 360.0;
    }

    DistanceBearing { distance, bearing }
}

/// Position reached from `(lat, lon)` after `distance_km`, for an angle
/// expressed as the bearing back toward the start.
///
/// The result therefore sits at bearing `angle + 180` from the start.
/// Southern hemisphere starts mirror the angle so spirals keep their
/// cyclonic sense.
pub fn destination(lat: f64, lon: f64, distance_km: f64, angle: f64) -> (f64, f64) {
    let colat = (90.0 - lat) * RADIANS_PER_DEGREE;
    let mut flipped_colat = colat;
    let mut lon_r = lon * RADIANS_PER_DEGREE;
    let mut angle = angle;
    if lat < 0.0 {
        flipped_colat = -(90.0 + lat) * RADIANS_PER_DEGREE;
        lon_r = (lon - 180.0) * RADIANS_PER_DEGREE;
        angle = 360.0 - angle;
    }

    let whole_degrees = angle as i32;
    let angle_r = -f64::from((540 - whole_degrees) % 360) * RADIANS_PER_DEGREE;
    let distance_r = (distance_km / KM_PER_DEGREE) * RADIANS_PER_DEGREE;

    let end_colat = (colat.cos() * distance_r.cos()
        + colat.sin() * distance_r.sin() * angle_r.cos())
    .acos();

    let mut dlon = 0.0;
    if end_colat.abs() >= 0.0000001 {
        let mut sine = (distance_r.sin() * angle_r.sin()) / end_colat.sin();
        if sine.abs() > 1.0 {
            sine = 1.0_f64.copysign(sine);
        }
        dlon = sine.asin();
        let cross = (HALF_PI - angle_r).sin().atan() / (HALF_PI - distance_r).tan();
        if cross > flipped_colat {
            dlon = 2.0 * HALF_PI - dlon;
        }
    }
    let end_lon_r = lon_r - dlon;

    let end_lat = 90.0 - end_colat / RADIANS_PER_DEGREE;
    let mut end_lon =
        f64::from((10000.0 * (end_lon_r / RADIANS_PER_DEGREE)) as i32 % 3_600_000) / 10000.0;
    if end_lon < -180.0 {
        end_lon += 360.0;
    }
    (end_lat, end_lon)
}

/// Approximate local zenith angle in degrees of a geostationary satellite
/// whose sub-point is at `(sub_lat, sub_lon)`, seen from `(lat, lon)`.
pub fn local_zenith_angle(lat: f64, lon: f64, _sub_lat: f64, sub_lon: f64) -> f64 {
    let radius = 6371.229;
    let orbit = radius + 35790.0;

    let lat = lat.abs();
    let lon = if lon < 0.0 { lon + 360.0 } else { lon };
    let dlon = (sub_lon - lon).abs();

    let cos_arc = (lat * RADIANS_PER_DEGREE).cos() * (dlon * RADIANS_PER_DEGREE).cos();
    let slant = (radius * radius + orbit * orbit - 2.0 * radius * orbit * cos_arc).sqrt();
    let alpha = ((1.0 - cos_arc * cos_arc).sqrt() / cos_arc).atan();
    let ratio = orbit * alpha.sin() / slant;
    (ratio / (1.0 - ratio * ratio).sqrt()).atan() / RADIANS_PER_DEGREE
}
