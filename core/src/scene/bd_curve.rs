/// BD enhancement curve breakpoints in degrees Celsius, warm to cold.
pub const BD_CURVE_POINTS: [f64; 11] = [
    30.0, 9.0, -30.0, -42.0, -54.0, -64.0, -70.0, -76.0, -80.0, -84.0, -100.0,
];

pub const KELVIN_OFFSET: f64 = 273.16;

/// Position of a temperature on the BD curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BdCategory {
    /// Gray-shade band 0 (warmest) through 9 (coldest).
    pub category: usize,
    /// Progress toward the next colder breakpoint, 0 inside band 0.
    pub fraction: f64,
}

impl BdCategory {
    pub fn value(&self) -> f64 {
        self.category as f64 + self.fraction
    }

    pub fn index(&self) -> i32 {
        self.category as i32
    }
}

/// Categorises a temperature in degrees Celsius.
///
/// A value equal to a breakpoint belongs to the colder band with fraction
/// zero. Values warmer than the curve map to band 0, values at or below
/// its coldest point to band 9 with fraction 1.
pub fn categorize(temp_c: f64) -> BdCategory {
    for category in 0..BD_CURVE_POINTS.len() - 1 {
        let warm = BD_CURVE_POINTS[category];
        let cold = BD_CURVE_POINTS[category + 1];
        if temp_c <= warm && temp_c > cold {
            let fraction = if category == 0 {
                0.0
            } else {
                (temp_c - warm) / (cold - warm)
            };
            return BdCategory { category, fraction };
        }
    }
    if temp_c <= BD_CURVE_POINTS[BD_CURVE_POINTS.len() - 1] {
        BdCategory {
            category: BD_CURVE_POINTS.len() - 2,
            fraction: 1.0,
        }
    } else {
        BdCategory {
            category: 0,
            fraction: 0.0,
        }
    }
}

/// Breakpoint `index` as a brightness temperature in Kelvin.
pub fn threshold_kelvin(index: usize) -> f64 {
    BD_CURVE_POINTS[index.min(BD_CURVE_POINTS.len() - 1)] + KELVIN_OFFSET
}
