//! Earth geometry, calendar and lookup helpers shared by the analysis modules.

pub mod basin;
pub mod distance;
pub mod pressure_wind;
pub mod satellite;
pub mod time;

pub use basin::{ocean_basin, BasinDomain, OceanBasin, PressureDomain};
pub use distance::{
    destination, distance_bearing, local_zenith_angle, DistanceBearing, DistanceUnit,
};
pub use pressure_wind::{pressure_hpa, wind_speed_kt};
pub use satellite::satellite_name;
pub use time::{calctime, cmonth_to_julian, idmyyd, julian_to_cmonth, yddmy, CalendarDate};
