//! Eye and cloud scene typing for one IR image.

pub mod bd_curve;
pub mod cdo;
pub mod classifier;
pub mod image;
pub mod logspiral;
pub mod lookback;

pub use bd_curve::{categorize, threshold_kelvin, BdCategory, BD_CURVE_POINTS, KELVIN_OFFSET};
pub use cdo::{cdo_size, shear_distance, CdoMeasurement, DISTANCE_UNAVAILABLE};
pub use classifier::{SceneClassification, SceneClassifier};
pub use image::{IrImage, Pixel, PixelIndex};
pub use logspiral::{log_spiral, SpiralArc, SpiralSearch};
pub use lookback::HistoryLookback;
