use crate::detector::ScaleResult;
use serde::Serialize;

/// Statistics for a single scale of the multi-scale scan.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLevelReport {
    pub index: usize,
    pub ratio: f32,
    pub image_width: usize,
    pub image_height: usize,
    pub layer_width: usize,
    pub layer_height: usize,
    pub windows: usize,
    /// Windows with a positive decision value.
    pub positives: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_decision: Option<f32>,
    pub elapsed_ms: f64,
}

impl ScaleLevelReport {
    pub fn from_result(result: &ScaleResult) -> Self {
        let positives = result.scores.iter().filter(|c| c.decision > 0.0).count();
        let max_decision = result
            .scores
            .iter()
            .map(|c| c.decision)
            .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |m| m.max(d))));
        Self {
            index: result.level.index,
            ratio: result.level.ratio,
            image_width: result.image_width,
            image_height: result.image_height,
            layer_width: result.layer_width,
            layer_height: result.layer_height,
            windows: result.windows.len(),
            positives,
            max_decision,
            elapsed_ms: result.elapsed_ms,
        }
    }
}
