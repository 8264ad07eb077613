use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OceanBasin {
    Atlantic,
    WestPacific,
    EastPacific,
    Indian,
}

/// Selects the pressure-wind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureDomain {
    AtlanticEastPacific,
    WestPacificOther,
}

impl PressureDomain {
    /// Maps the configured override; -1 (or anything unknown) means automatic.
    pub fn from_override(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::AtlanticEastPacific),
            1 => Some(Self::WestPacificOther),
            _ => None,
        }
    }

    pub(crate) fn table_row(self) -> usize {
        match self {
            Self::AtlanticEastPacific => 0,
            Self::WestPacificOther => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasinDomain {
    pub basin: OceanBasin,
    pub domain: PressureDomain,
}

/// Ocean basin of a storm at `(lat, lon)` with longitudes positive east.
///
/// Returns `None` outside the valid coordinate range.
pub fn ocean_basin(lat: f64, lon: f64, domain_override: i32) -> Option<BasinDomain> {
    let lon = -lon;
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return None;
    }

    let basin = if lat >= 0.0 {
        if lon <= -100.0 {
            OceanBasin::WestPacific
        } else if lon <= -20.0 {
            OceanBasin::Indian
        } else if lon >= 100.0 {
            OceanBasin::EastPacific
        } else if lat > 20.0 {
            OceanBasin::Atlantic
        } else if lat < 10.0 {
            if lon < 80.0 {
                OceanBasin::Atlantic
            } else {
                OceanBasin::EastPacific
            }
        } else if (100.0 - lon) / (20.0 - lat) > 2.0 {
            // line from (100W, 20N) to (80W, 10N)
            OceanBasin::Atlantic
        } else {
            OceanBasin::EastPacific
        }
    } else if lon <= -135.0 {
        OceanBasin::WestPacific
    } else if lon <= -20.0 {
        OceanBasin::Indian
    } else if lon <= 67.0 {
        OceanBasin::Atlantic
    } else {
        OceanBasin::EastPacific
    };

    let domain = PressureDomain::from_override(domain_override).unwrap_or(match basin {
        OceanBasin::Atlantic | OceanBasin::EastPacific => PressureDomain::AtlanticEastPacific,
        OceanBasin::WestPacific | OceanBasin::Indian => PressureDomain::WestPacificOther,
    });
    Some(BasinDomain { basin, domain })
}
