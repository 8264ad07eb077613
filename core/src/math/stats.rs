pub struct StatsHelper;

/// Least-squares fit of `y` against `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub count: usize,
}

impl StatsHelper {
    /// Half-up rounding to one decimal, as used for every reported T-number.
    pub fn round_tenth(value: f64) -> f64 {
        ((value + 0.05) * 10.0).floor() / 10.0
    }

    /// Linear blend between two (value, time) anchors.
    pub fn interpolate(start: f64, end: f64, fraction: f64) -> f64 {
        start + (end - start) * fraction
    }

    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Correlation-scaled regression slope truncated to one decimal.
    ///
    /// Near-zero variance on either axis yields a flat fit.
    pub fn linear_fit(points: &[(f64, f64)]) -> LinearFit {
        let count = points.len();
        if count == 0 {
            return LinearFit {
                slope: 0.0,
                intercept: 0.0,
                count,
            };
        }
        let n = count as f64;
        let (sum_x, sum_y, sum_xx, sum_yy, sum_xy) = points.iter().fold(
            (0.0, 0.0, 0.0, 0.0, 0.0),
            |(sx, sy, sxx, syy, sxy), &(x, y)| (sx + x, sy + y, sxx + x * x, syy + y * y, sxy + x * y),
        );
        let mean_x = sum_x / n;
        let mean_y = sum_y / n;
        let var_x = sum_xx / n - mean_x * mean_x;
        let var_y = sum_yy / n - mean_y * mean_y;
        let covariance = sum_xy / n - mean_x * mean_y;

        let slope = if var_x.abs() <= 0.0001 || var_y.abs() <= 0.0001 {
            0.0
        } else {
            let correlation = covariance / (var_x * var_y).sqrt();
            correlation * (var_y / var_x).sqrt()
        };
        let slope = (slope * 10.0).trunc() / 10.0;
        LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
            count,
        }
    }
}
