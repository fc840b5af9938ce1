//! Detector pipeline orchestrating the scan of one image.
//!
//! The [`WindowDetector`] exposes a simple API: feed a float grayscale image
//! and get the accepted detections plus a trace of every stage. Internally it
//! coordinates scale planning, resampling, feature extraction, window
//! scoring, flattening and suppression.
//!
//! Typical usage:
//! ```no_run
//! use window_detector::classify::LinearSvm;
//! use window_detector::features::{OrientedEnergyExtractor, OrientedEnergyOptions};
//! use window_detector::image::ImageF32;
//! use window_detector::{DetectorParams, WindowDetector};
//!
//! # fn example(image: ImageF32, svm: LinearSvm) -> Result<(), window_detector::DetectError> {
//! let extractor = OrientedEnergyExtractor::new(OrientedEnergyOptions::default())?;
//! let detector = WindowDetector::new(DetectorParams::default(), extractor, svm)?;
//! let report = detector.process(&image, "frame-0")?;
//! for det in &report.detections {
//!     println!("{:?} score={:.3}", det.bbox.to_xyxy(), det.score);
//! }
//! # Ok(())
//! # }
//! ```

// Stages
// - Plan: ScalePlanner picks the ratios for the input width.
// - Scan: per ratio, resize → feature layer → windows → batch scoring.
// - Flatten: map every scored window into original-image pixels.
// - Suppress: greedy Gaussian-mask suppression on a private score copy.
// - Reporting: per-scale statistics, suppression rounds and timings.

use super::flatten::flatten_detections;
use super::options::DetectorParams;
use crate::classify::Classifier;
use crate::diagnostics::{DetectionReport, InputDescriptor, PipelineTrace, ScaleLevelReport, TimingBreakdown};
use crate::error::DetectResult;
use crate::features::{FeatureExtractor, LayerGeometry};
use crate::image::{AntialiasScaler, ImageF32, ImageScaler};
use crate::scales::{ScalePlanner, WidthRampPlanner};
use crate::scorer::WindowScorer;
use crate::suppress::SuppressionEngine;
use crate::types::{Classification, FinalDetection, ScaleLevel, Window};
use crate::windows::make_windows;
use log::{debug, info};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Windows and classifier outputs of one scale level, index-aligned.
#[derive(Clone, Debug)]
pub struct ScaleResult {
    pub level: ScaleLevel,
    /// Size of the resampled image.
    pub image_width: usize,
    pub image_height: usize,
    /// Spatial size of the feature layer.
    pub layer_width: usize,
    pub layer_height: usize,
    pub windows: Vec<Window>,
    pub scores: Vec<Classification>,
    pub elapsed_ms: f64,
}

/// Per-scale results of one image, in planner order.
#[derive(Clone, Debug)]
pub struct ScaleScan {
    pub width: usize,
    pub height: usize,
    pub levels: Vec<ScaleResult>,
}

impl ScaleScan {
    pub fn window_count(&self) -> usize {
        self.levels.iter().map(|l| l.windows.len()).sum()
    }
}

/// Multi-scale sliding-window detector.
pub struct WindowDetector {
    params: DetectorParams,
    extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn ImageScaler>,
    planner: Box<dyn ScalePlanner>,
    engine: SuppressionEngine,
}

impl WindowDetector {
    /// Create a detector with the default width-ramp planner and Lanczos scaler.
    pub fn new(
        params: DetectorParams,
        extractor: impl FeatureExtractor + 'static,
        classifier: impl Classifier + 'static,
    ) -> DetectResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            extractor: Box::new(extractor),
            classifier: Box::new(classifier),
            scaler: Box::new(AntialiasScaler::default()),
            planner: Box::new(WidthRampPlanner::new(params.scales)),
            engine: SuppressionEngine::new(params.suppression)?,
        })
    }

    /// Replace the image resampler.
    pub fn with_scaler(mut self, scaler: impl ImageScaler + 'static) -> Self {
        self.scaler = Box::new(scaler);
        self
    }

    /// Replace the scale policy.
    pub fn with_planner(mut self, planner: impl ScalePlanner + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn geometry(&self) -> &dyn LayerGeometry {
        self.extractor.geometry()
    }

    /// Scan one already-resampled image.
    pub fn process_one_scale(
        &self,
        scaled: &ImageF32,
        level: ScaleLevel,
    ) -> DetectResult<ScaleResult> {
        let start = Instant::now();
        let layer = self.extractor.build_layer(scaled)?;
        let bboxes = make_windows(
            layer.height,
            layer.width,
            self.params.windows.step_size,
            self.params.windows.box_size,
        )?;
        let scores = WindowScorer::new(self.classifier.as_ref()).score_batch(&layer, &bboxes)?;
        let windows = bboxes
            .into_iter()
            .map(|bbox| Window { bbox, scale: level })
            .collect::<Vec<_>>();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "scale {} ratio={:.4} image={}x{} layer={}x{}x{}x{} windows={} in {:.2} ms",
            level.index,
            level.ratio,
            scaled.w,
            scaled.h,
            layer.replicates,
            layer.prototypes,
            layer.height,
            layer.width,
            windows.len(),
            elapsed_ms
        );
        Ok(ScaleResult {
            level,
            image_width: scaled.w,
            image_height: scaled.h,
            layer_width: layer.width,
            layer_height: layer.height,
            windows,
            scores,
            elapsed_ms,
        })
    }

    /// Plan the scales for `image` and scan each of them.
    pub fn process_scales(&self, image: &ImageF32) -> DetectResult<ScaleScan> {
        let levels = self.planner.plan(image.w, image.h)?;
        debug!(
            "planned {} scales: {:?}",
            levels.len(),
            levels.iter().map(|l| l.ratio).collect::<Vec<_>>()
        );
        let scan_level = |level: &ScaleLevel| -> DetectResult<ScaleResult> {
            let scaled = self.scaler.resize(image, level.ratio)?;
            self.process_one_scale(&scaled, *level)
        };

        #[cfg(feature = "parallel")]
        let results = levels
            .par_iter()
            .map(scan_level)
            .collect::<DetectResult<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let results = levels
            .iter()
            .map(scan_level)
            .collect::<DetectResult<Vec<_>>>()?;

        Ok(ScaleScan {
            width: image.w,
            height: image.h,
            levels: results,
        })
    }

    /// Run the full pipeline and capture detailed diagnostics.
    pub fn process(&self, image: &ImageF32, image_id: &str) -> DetectResult<DetectionReport> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let scan_start = Instant::now();
        let scan = self.process_scales(image)?;
        timings.push("scan", ms_since(scan_start));

        let flatten_start = Instant::now();
        let all_detections = flatten_detections(&scan, self.geometry())?;
        timings.push("flatten", ms_since(flatten_start));

        let suppress_start = Instant::now();
        let outcome = self.engine.suppress(&all_detections)?;
        timings.push("suppress", ms_since(suppress_start));

        let detections: Vec<FinalDetection> = outcome
            .rounds
            .iter()
            .map(|round| {
                let d = &all_detections[round.index];
                FinalDetection {
                    bbox: d.bbox,
                    score: round.score,
                    label: d.label,
                    image_id: image_id.to_string(),
                    source_index: round.index,
                }
            })
            .collect();

        timings.total_ms = ms_since(total_start);
        info!(
            "{}: {} windows over {} scales -> {} detections in {:.1} ms",
            image_id,
            all_detections.len(),
            scan.levels.len(),
            detections.len(),
            timings.total_ms
        );

        let trace = PipelineTrace {
            input: InputDescriptor {
                width: image.w,
                height: image.h,
                num_scales: scan.levels.len(),
            },
            timings,
            scales: scan.levels.iter().map(ScaleLevelReport::from_result).collect(),
            flattened: all_detections.len(),
            suppression: outcome,
        };

        Ok(DetectionReport {
            image_id: image_id.to_string(),
            detections,
            all_detections,
            trace,
        })
    }
}

fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
