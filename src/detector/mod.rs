//! Sliding-window detector orchestrating the multi-scale scan.
//!
//! Overview
//! - Plans a ramp of scale ratios for the input width.
//! - Resamples the image to each ratio, builds its feature layer and tiles
//!   the layer with fixed-size windows.
//! - Max-pools every window and scores the batch with the classifier.
//! - Flattens all (scale, window, score) triples into image-space
//!   detections, then runs Gaussian-mask suppression to keep a short,
//!   ordered list of objects.
//!
//! Modules
//! - [`options`] – configuration consumed by the detector and CLI.
//! - `pipeline` – the [`WindowDetector`] and per-scale results.
//! - [`flatten`] – cross-scale merge into image space.

pub mod flatten;
pub mod options;
mod pipeline;

pub use flatten::flatten_detections;
pub use options::DetectorParams;
pub use pipeline::{ScaleResult, ScaleScan, WindowDetector};
