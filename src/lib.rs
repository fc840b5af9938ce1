#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classify;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod image;
pub mod snapshot;
pub mod suppress;
pub mod types;

// Building blocks of the scan, usable on their own.
pub mod config;
pub mod mapping;
pub mod scales;
pub mod scorer;
pub mod windows;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{DetectorParams, WindowDetector};
pub use crate::error::{ClassifierError, DetectError, DetectResult};
pub use crate::types::{BoundingBox, Classification, Detection, FinalDetection};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{DetectionReport, PipelineTrace};
pub use crate::snapshot::ScoreSnapshot;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use window_detector::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (320usize, 240usize);
/// let image = ImageF32::new(w, h);
///
/// let mut params = DetectorParams::default();
/// params.scales.span_px = 160.0;
/// let extractor = OrientedEnergyExtractor::new(OrientedEnergyOptions::default())?;
/// let svm = LinearSvm::new(vec![0.0; extractor.options().feature_len()], -1.0);
///
/// let detector = WindowDetector::new(params, extractor, svm)?;
/// let report = detector.process(&image, "blank")?;
/// println!("accepted={}", report.detections.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::classify::{Classifier, LinearSvm};
    pub use crate::features::{FeatureExtractor, OrientedEnergyExtractor, OrientedEnergyOptions};
    pub use crate::image::{ImageF32, ImageU8};
    pub use crate::{BoundingBox, DetectError, DetectionReport, DetectorParams, WindowDetector};
}
