//! Diagnostics data model returned by the detector.
//!
//! `DetectionReport` is the main entry point: it bundles the accepted
//! detections, the full flattened list and a `PipelineTrace` describing each
//! stage the pipeline executed.

pub mod pipeline;
pub mod scales;
pub mod timing;

pub use pipeline::{DetectionReport, InputDescriptor, PipelineTrace};
pub use scales::ScaleLevelReport;
pub use timing::{StageTiming, TimingBreakdown};
