use std::collections::HashMap;

use ndarray::Array2;

use crate::prelude::{AnalysisError, AnalysisResult};

/// Navigated IR sector centred on the storm.
///
/// Temperatures are brightness temperatures in Kelvin.
#[derive(Debug, Clone)]
pub struct IrImage {
    latitude: Array2<f32>,
    longitude: Array2<f32>,
    temperature: Array2<f32>,
    /// Nominal pixel size in km.
    pub resolution_km: f64,
    /// Radius of maximum wind measured from the image, -99 when unavailable.
    pub rmw_estimate_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub lat: f64,
    pub lon: f64,
    pub temperature: f64,
}

impl IrImage {
    pub fn new(
        latitude: Array2<f32>,
        longitude: Array2<f32>,
        temperature: Array2<f32>,
        resolution_km: f64,
    ) -> AnalysisResult<Self> {
        if latitude.dim() != temperature.dim() || longitude.dim() != temperature.dim() {
            return Err(AnalysisError::InvalidInput(format!(
                "grid shapes differ: lat {:?}, lon {:?}, temp {:?}",
                latitude.dim(),
                longitude.dim(),
                temperature.dim()
            )));
        }
        if temperature.is_empty() {
            return Err(AnalysisError::InvalidInput("image has no pixels".into()));
        }
        if !(resolution_km.is_finite() && resolution_km > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "resolution must be positive, got {}",
                resolution_km
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            temperature,
            resolution_km,
            rmw_estimate_km: -99.0,
        })
    }

    /// Builds the grids from row-major buffers.
    pub fn from_row_major(
        rows: usize,
        cols: usize,
        latitude: Vec<f32>,
        longitude: Vec<f32>,
        temperature: Vec<f32>,
        resolution_km: f64,
    ) -> AnalysisResult<Self> {
        let shape = |name: &str, data: Vec<f32>| {
            Array2::from_shape_vec((rows, cols), data).map_err(|err| {
                AnalysisError::InvalidInput(format!("{} grid is not {}x{}: {}", name, rows, cols, err))
            })
        };
        Self::new(
            shape("latitude", latitude)?,
            shape("longitude", longitude)?,
            shape("temperature", temperature)?,
            resolution_km,
        )
    }

    pub fn with_rmw_estimate(mut self, rmw_km: f64) -> Self {
        self.rmw_estimate_km = rmw_km;
        self
    }

    pub fn dim(&self) -> (usize, usize) {
        self.temperature.dim()
    }

    pub fn pixel_count(&self) -> usize {
        self.temperature.len()
    }

    pub fn temperature(&self) -> &Array2<f32> {
        &self.temperature
    }

    fn pixel(&self, row: usize, col: usize) -> Pixel {
        Pixel {
            lat: f64::from(self.latitude[[row, col]]),
            lon: f64::from(self.longitude[[row, col]]),
            temperature: f64::from(self.temperature[[row, col]]),
        }
    }

    /// Pixels at or colder than `threshold_k`, sampling every `stride` rows and columns.
    pub fn cold_pixels(&self, threshold_k: f64, stride: usize) -> Vec<Pixel> {
        let (rows, cols) = self.dim();
        let stride = stride.max(1);
        let mut pixels = Vec::new();
        for row in (0..rows).step_by(stride) {
            for col in (0..cols).step_by(stride) {
                if f64::from(self.temperature[[row, col]]) <= threshold_k {
                    pixels.push(self.pixel(row, col));
                }
            }
        }
        pixels
    }

    /// Pixels strictly warmer than `threshold_k`.
    pub fn warm_pixels(&self, threshold_k: f64) -> Vec<Pixel> {
        self.temperature
            .indexed_iter()
            .filter(|(_, &t)| f64::from(t) > threshold_k)
            .map(|((row, col), _)| self.pixel(row, col))
            .collect()
    }
}

/// Buckets pixels into 0.1 degree cells for neighbourhood queries.
pub struct PixelIndex {
    cells: HashMap<(i64, i64), Vec<Pixel>>,
}

const CELL_DEGREES: f64 = 0.1;

fn cell_of(lat: f64, lon: f64) -> (i64, i64) {
    (
        (lat / CELL_DEGREES).floor() as i64,
        (lon / CELL_DEGREES).floor() as i64,
    )
}

impl PixelIndex {
    pub fn new(pixels: &[Pixel]) -> Self {
        let mut cells: HashMap<(i64, i64), Vec<Pixel>> = HashMap::new();
        for pixel in pixels {
            cells
                .entry(cell_of(pixel.lat, pixel.lon))
                .or_default()
                .push(*pixel);
        }
        Self { cells }
    }

    /// Pixels within 0.1 degrees of `(lat, lon)` on both axes.
    pub fn near(&self, lat: f64, lon: f64) -> impl Iterator<Item = &Pixel> {
        let (row, col) = cell_of(lat, lon);
        (row - 1..=row + 1)
            .flat_map(move |r| (col - 1..=col + 1).map(move |c| (r, c)))
            .filter_map(move |key| self.cells.get(&key))
            .flatten()
            .filter(move |p| (lat - p.lat).abs() <= CELL_DEGREES && (lon - p.lon).abs() <= CELL_DEGREES)
    }
}
