//! Greedy Gaussian-mask suppression.
//!
//! Overview
//! - Each round takes the global maximum of the working scores. A
//!   non-positive maximum, or reaching the detection cap, ends the loop
//!   without accepting it.
//! - The accepted detection's own score is zeroed, so it can never be picked
//!   again.
//! - Every detection whose centre lies strictly inside the accepted box has
//!   its score multiplied by the mask weight read at the centre's offset from
//!   the accepted box's top-left corner. The mask is sized from the box
//!   width, so horizontal offsets always land inside it; a centre that still
//!   misses the mask (a box much taller than wide) aborts the run with
//!   [`DetectError::SuppressionIndex`].
//! - Detections whose centres fall outside the accepted box are untouched.
//!
//! The loop only ever mutates [`WorkingScores`], a separate owned vector
//! built from the flattened detections, which themselves stay read-only.

pub mod mask;

pub use mask::SuppressionMask;

use crate::error::{DetectError, DetectResult};
use crate::types::Detection;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuppressionOptions {
    /// Maximum number of accepted detections per image.
    pub detection_cap: usize,
    /// Fractional growth of the accepted box before sizing the mask.
    pub expansion: f32,
    /// Gaussian spread relative to the mask radius.
    pub sigma: f32,
}

impl Default for SuppressionOptions {
    fn default() -> Self {
        Self {
            detection_cap: 20,
            expansion: 0.35,
            sigma: 1.2,
        }
    }
}

impl SuppressionOptions {
    pub fn validate(&self) -> DetectResult<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(DetectError::InvalidConfiguration(format!(
                "suppression sigma must be positive, got {}",
                self.sigma
            )));
        }
        if !self.expansion.is_finite() || self.expansion < 0.0 {
            return Err(DetectError::InvalidConfiguration(format!(
                "suppression expansion must be non-negative, got {}",
                self.expansion
            )));
        }
        Ok(())
    }
}

/// Mutable score state of one suppression run.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkingScores {
    scores: Vec<f32>,
}

impl WorkingScores {
    pub fn from_detections(detections: &[Detection]) -> Self {
        Self {
            scores: detections.iter().map(|d| d.score).collect(),
        }
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Index and value of the maximum; the first index wins ties.
    pub fn argmax(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &s) in self.scores.iter().enumerate() {
            match best {
                Some((_, b)) if s <= b => {}
                _ if s.is_nan() => {}
                _ => best = Some((i, s)),
            }
        }
        best
    }
}

/// One accepted detection and what it did to its neighbourhood.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionRound {
    pub round: usize,
    /// Index into the flattened detection list.
    pub index: usize,
    /// Score at acceptance time.
    pub score: f32,
    pub mask_radius: usize,
    /// Number of other detections whose centres fell inside the box.
    pub attenuated: usize,
}

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    NoDetections,
    NonPositiveScore,
    DetectionCap,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionOutcome {
    pub rounds: Vec<SuppressionRound>,
    pub stop: StopReason,
}

impl SuppressionOutcome {
    /// Flattened indices of accepted detections in selection order.
    pub fn accepted_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rounds.iter().map(|r| r.index)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SuppressionEngine {
    options: SuppressionOptions,
}

impl SuppressionEngine {
    pub fn new(options: SuppressionOptions) -> DetectResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &SuppressionOptions {
        &self.options
    }

    /// Run the full loop on a fresh copy of the detection scores.
    pub fn suppress(&self, detections: &[Detection]) -> DetectResult<SuppressionOutcome> {
        let mut working = WorkingScores::from_detections(detections);
        self.run(detections, &mut working)
    }

    /// Run the loop on caller-owned working scores aligned with `detections`.
    pub fn run(
        &self,
        detections: &[Detection],
        working: &mut WorkingScores,
    ) -> DetectResult<SuppressionOutcome> {
        if working.len() != detections.len() {
            return Err(DetectError::InvalidConfiguration(format!(
                "{} working scores for {} detections",
                working.len(),
                detections.len()
            )));
        }
        let mut rounds = Vec::new();
        let stop = loop {
            match self.step(detections, working, rounds.len())? {
                Ok(round) => rounds.push(round),
                Err(stop) => break stop,
            }
        };
        debug!(
            "suppression accepted {} of {} detections ({:?})",
            rounds.len(),
            detections.len(),
            stop
        );
        Ok(SuppressionOutcome { rounds, stop })
    }

    /// Execute one round. `Ok(Err(reason))` means the loop is finished.
    pub fn step(
        &self,
        detections: &[Detection],
        working: &mut WorkingScores,
        accepted: usize,
    ) -> DetectResult<Result<SuppressionRound, StopReason>> {
        let Some((index, score)) = working.argmax() else {
            return Ok(Err(StopReason::NoDetections));
        };
        if score <= 0.0 {
            return Ok(Err(StopReason::NonPositiveScore));
        }
        if accepted >= self.options.detection_cap {
            return Ok(Err(StopReason::DetectionCap));
        }

        let peak = detections[index].bbox;
        let mask = SuppressionMask::for_box(&peak, self.options.expansion, self.options.sigma);
        working.scores[index] = 0.0;

        let mut attenuated = 0usize;
        for (j, det) in detections.iter().enumerate() {
            if j == index {
                continue;
            }
            let (xc, yc) = det.bbox.center();
            if !peak.contains_strict(xc, yc) {
                continue;
            }
            let ix = (xc - peak.x0) as i64;
            let iy = (yc - peak.y0) as i64;
            let weight = mask.at(ix, iy).ok_or(DetectError::SuppressionIndex {
                index_x: ix,
                index_y: iy,
                side: mask.side(),
            })?;
            working.scores[j] *= weight;
            attenuated += 1;
        }

        let round = SuppressionRound {
            round: accepted,
            index,
            score,
            mask_radius: mask.radius(),
            attenuated,
        };
        debug!(
            "round {}: accepted #{} score={:.4} box={:?} attenuated={}",
            round.round,
            index,
            score,
            peak.to_xyxy(),
            attenuated
        );
        Ok(Ok(round))
    }
}
