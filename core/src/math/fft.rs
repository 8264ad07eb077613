use num_complex::Complex64;

use crate::prelude::{AnalysisError, AnalysisResult};

/// Number of radial temperature bins fed to the harmonic analysis.
pub const FFT_BINS: usize = 64;
/// Harmonic count reported when the transform or its DC term is unusable.
pub const FFT_FAILURE: i32 = -99;

const LEGACY_PI: f64 = 3.14159265358979;

/// Result of counting spectral peaks in a 64-bin temperature profile.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicAnalysis {
    pub harmonics: i32,
    /// Trapezoidal spectrum area over bins 0..=30, normalised by the DC term.
    pub amplitude: f64,
    pub magnitudes: Vec<f64>,
}

impl HarmonicAnalysis {
    fn failed(magnitudes: Vec<f64>) -> Self {
        Self {
            harmonics: FFT_FAILURE,
            amplitude: 0.0,
            magnitudes,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.harmonics != FFT_FAILURE
    }
}

/// Split-radix transform with reusable 1-indexed work arrays.
pub struct FftAnalyzer {
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl FftAnalyzer {
    pub fn new() -> Self {
        Self {
            real: vec![0.0; FFT_BINS + 1],
            imag: vec![0.0; FFT_BINS + 1],
        }
    }

    /// Forward DFT of `samples`, zero padded to the next power of two.
    pub fn transform(&mut self, samples: &[Complex64]) -> AnalysisResult<Vec<Complex64>> {
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "transform needs at least one sample".into(),
            ));
        }
        let padded = self.load(samples);
        self.split_radix(padded);
        Ok((1..=samples.len())
            .map(|i| Complex64::new(self.real[i], self.imag[i]))
            .collect())
    }

    /// Counts local maxima of the magnitude spectrum between bins 1 and 30.
    pub fn analyze(&mut self, profile: &[f64]) -> AnalysisResult<HarmonicAnalysis> {
        if profile.len() != FFT_BINS {
            return Err(AnalysisError::InvalidInput(format!(
                "harmonic analysis expects {} samples, got {}",
                FFT_BINS,
                profile.len()
            )));
        }
        let samples: Vec<Complex64> = profile.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        let spectrum = self.transform(&samples)?;
        let magnitudes: Vec<f64> = spectrum.iter().map(|c| complex_abs(c.re, c.im)).collect();

        if magnitudes[0] == 0.0 || !magnitudes.iter().all(|m| m.is_finite()) {
            return Ok(HarmonicAnalysis::failed(magnitudes));
        }

        let mut harmonics = 0;
        let mut area = 0.0;
        for i in 2..=31 {
            area += (magnitudes[i - 1] + magnitudes[i - 2]) / 2.0;
            if magnitudes[i - 1] > magnitudes[i - 2] && magnitudes[i - 1] > magnitudes[i] {
                harmonics += 1;
            }
        }
        let amplitude = area / magnitudes[0];
        Ok(HarmonicAnalysis {
            harmonics,
            amplitude,
            magnitudes,
        })
    }

    /// Harmonic count with every failure folded into [`FFT_FAILURE`].
    pub fn harmonic_count(&mut self, profile: &[f64]) -> i32 {
        match self.analyze(profile) {
            Ok(analysis) => analysis.harmonics,
            Err(err) => {
                log::warn!("harmonic analysis skipped: {}", err);
                FFT_FAILURE
            }
        }
    }

    fn load(&mut self, samples: &[Complex64]) -> usize {
        let mut padded = 2;
        while padded < samples.len() {
            padded += padded;
        }
        self.real.clear();
        self.imag.clear();
        self.real.resize(padded + 1, 0.0);
        self.imag.resize(padded + 1, 0.0);
        for (i, sample) in samples.iter().enumerate() {
            self.real[i + 1] = sample.re;
            self.imag[i + 1] = sample.im;
        }
        padded
    }

    // Duhamel-Hollman decimation in frequency over x[1..=n], n a power of two.
    fn split_radix(&mut self, n: usize) {
        let x = &mut self.real;
        let y = &mut self.imag;
        let stages = n.trailing_zeros() as usize;

        let mut n2 = 2 * n;
        for _ in 1..stages {
            n2 /= 2;
            let n4 = n2 / 4;
            let step = 2.0 * LEGACY_PI / n2 as f64;
            let mut angle: f64 = 0.0;
            for j in 1..=n4 {
                let cc1 = angle.cos();
                let ss1 = angle.sin();
                let cc3 = (3.0 * angle).cos();
                let ss3 = (3.0 * angle).sin();
                angle = j as f64 * step;

                let mut start = j;
                let mut stride = 2 * n2;
                while start < n {
                    let mut i0 = start;
                    while i0 < n {
                        let i1 = i0 + n4;
                        let i2 = i1 + n4;
                        let i3 = i2 + n4;

                        let mut r1 = x[i0] - x[i2];
                        x[i0] += x[i2];
                        let mut r2 = x[i1] - x[i3];
                        x[i1] += x[i3];
                        let s1 = y[i0] - y[i2];
                        y[i0] += y[i2];
                        let mut s2 = y[i1] - y[i3];
                        y[i1] += y[i3];

                        let s3 = r1 - s2;
                        r1 += s2;
                        s2 = r2 - s1;
                        r2 += s1;

                        x[i2] = r1 * cc1 - s2 * ss1;
                        y[i2] = -s2 * cc1 - r1 * ss1;
                        x[i3] = s3 * cc3 + r2 * ss3;
                        y[i3] = r2 * cc3 - s3 * ss3;

                        i0 += stride;
                    }
                    start = 2 * stride - n2 + j;
                    stride *= 4;
                }
            }
        }

        let mut start = 1;
        let mut stride = 4;
        while start < n {
            let mut i0 = start;
            while i0 <= n {
                let i1 = i0 + 1;
                let r1 = x[i0];
                x[i0] = r1 + x[i1];
                x[i1] = r1 - x[i1];
                let s1 = y[i0];
                y[i0] = s1 + y[i1];
                y[i1] = s1 - y[i1];
                i0 += stride;
            }
            start = 2 * stride - 1;
            stride *= 4;
        }

        let mut j = 1;
        for i in 1..n {
            if i < j {
                x.swap(i, j);
                y.swap(i, j);
            }
            let mut k = n / 2;
            while k < j {
                j -= k;
                k /= 2;
            }
            j += k;
        }
    }
}

impl Default for FftAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Overflow-safe modulus of a complex value.
pub fn complex_abs(re: f64, im: f64) -> f64 {
    let (mut large, mut small) = (re.abs(), im.abs());
    if small > large {
        std::mem::swap(&mut large, &mut small);
    }
    if large + small == large {
        large
    } else {
        let ratio = small / large;
        large * (1.0 + ratio * ratio).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn wave_profile() -> Vec<f64> {
        (0..FFT_BINS)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / FFT_BINS as f64;
                250.0 + 8.0 * (3.0 * phase).cos() + 3.0 * (7.0 * phase).sin() + (i % 5) as f64
            })
            .collect()
    }

    #[test]
    fn constant_profile_has_no_harmonics() {
        let mut fft = FftAnalyzer::new();
        let analysis = fft.analyze(&[250.0; FFT_BINS]).unwrap();
        assert_eq!(analysis.harmonics, 0);
        // only the DC half-bin contributes to the area
        assert_eq!(analysis.amplitude, 0.5);
        assert!((analysis.magnitudes[0] - 64.0 * 250.0).abs() < 1e-9);
    }

    #[test]
    fn zero_dc_term_reports_failure() {
        let mut fft = FftAnalyzer::new();
        let analysis = fft.analyze(&[0.0; FFT_BINS]).unwrap();
        assert!(!analysis.is_valid());
        assert_eq!(fft.harmonic_count(&[0.0; FFT_BINS]), FFT_FAILURE);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mut fft = FftAnalyzer::new();
        assert!(matches!(
            fft.analyze(&[1.0; 32]),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert_eq!(fft.harmonic_count(&[1.0; 32]), FFT_FAILURE);
    }

    #[test]
    fn magnitudes_match_rustfft() {
        let profile = wave_profile();
        let mut fft = FftAnalyzer::new();
        let analysis = fft.analyze(&profile).unwrap();

        let mut buffer: Vec<Complex64> =
            profile.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        FftPlanner::new()
            .plan_fft_forward(FFT_BINS)
            .process(&mut buffer);

        for (ours, reference) in analysis.magnitudes.iter().zip(buffer.iter()) {
            assert!(
                (ours - reference.norm()).abs() < 1e-6 * (1.0 + reference.norm()),
                "{} vs {}",
                ours,
                reference.norm()
            );
        }
    }

    #[test]
    fn complex_transform_matches_rustfft() {
        let input: Vec<Complex64> = (0..16)
            .map(|i| Complex64::new(i as f64 * 0.5 - 3.0, (i * i % 7) as f64))
            .collect();
        let mut fft = FftAnalyzer::new();
        let ours = fft.transform(&input).unwrap();

        let mut reference = input.clone();
        FftPlanner::new().plan_fft_forward(16).process(&mut reference);
        for (a, b) in ours.iter().zip(reference.iter()) {
            assert!((a.norm() - b.norm()).abs() < 1e-9);
        }
    }

    #[test]
    fn pure_wavenumbers_count_as_harmonics() {
        let profile = wave_profile();
        let mut fft = FftAnalyzer::new();
        let analysis = fft.analyze(&profile).unwrap();
        assert!(analysis.harmonics >= 2);
        assert!(analysis.amplitude > 0.0);
    }

    #[test]
    fn complex_abs_orders_components() {
        assert_eq!(complex_abs(3.0, 4.0), 5.0);
        assert_eq!(complex_abs(-4.0, 3.0), 5.0);
        assert_eq!(complex_abs(0.0, 0.0), 0.0);
        assert_eq!(complex_abs(1e20, 1.0), 1e20);
    }
}
