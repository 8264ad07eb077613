pub mod fft;
pub mod stats;

pub use fft::{complex_abs, FftAnalyzer, HarmonicAnalysis, FFT_BINS, FFT_FAILURE};
pub use stats::{LinearFit, StatsHelper};
