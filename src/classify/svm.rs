//! Linear SVM decision function with optional per-feature standardisation.
//!
//! The model is stored as JSON:
//!
//! ```json
//! {
//!   "weights": [0.4, -0.1, 1.2],
//!   "bias": -0.3,
//!   "scaler": { "mean": [0.1, 0.1, 0.2], "scale": [0.05, 0.04, 0.1] },
//!   "positive_label": 1,
//!   "negative_label": 0
//! }
//! ```
//!
//! `decision = w · ((x - mean) / scale) + bias`; the label is the positive one
//! when the decision is strictly positive.
use super::Classifier;
use crate::error::ClassifierError;
use crate::image::io::read_json_file;
use crate::types::Classification;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-feature standardisation applied before the dot product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearSvm {
    pub weights: Vec<f32>,
    pub bias: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<FeatureScaler>,
    #[serde(default = "default_positive_label")]
    pub positive_label: i32,
    #[serde(default)]
    pub negative_label: i32,
}

fn default_positive_label() -> i32 {
    1
}

impl LinearSvm {
    pub fn new(weights: Vec<f32>, bias: f32) -> Self {
        Self {
            weights,
            bias,
            scaler: None,
            positive_label: default_positive_label(),
            negative_label: 0,
        }
    }

    pub fn with_scaler(mut self, scaler: FeatureScaler) -> Self {
        self.scaler = Some(scaler);
        self
    }

    pub fn load_json(path: &Path) -> Result<Self, String> {
        let model: Self = read_json_file(path)?;
        model
            .check()
            .map_err(|e| format!("Invalid model {}: {e}", path.display()))?;
        Ok(model)
    }

    /// Structural validation of a deserialized model.
    pub fn check(&self) -> Result<(), ClassifierError> {
        if self.weights.is_empty() {
            return Err(ClassifierError::Model("model has no weights".into()));
        }
        if let Some(scaler) = &self.scaler {
            let n = self.weights.len();
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(ClassifierError::Model(format!(
                    "scaler length {}/{} does not match {} weights",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                )));
            }
        }
        Ok(())
    }

    pub fn decision_function(&self, features: &[f32]) -> Result<f32, ClassifierError> {
        if features.len() != self.weights.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.weights.len(),
                got: features.len(),
            });
        }
        let dot: f32 = match &self.scaler {
            Some(s) => features
                .iter()
                .zip(&self.weights)
                .zip(s.mean.iter().zip(&s.scale))
                .map(|((&x, &w), (&m, &sc))| {
                    // Zero-variance features carry no information.
                    if sc == 0.0 {
                        0.0
                    } else {
                        w * (x - m) / sc
                    }
                })
                .sum(),
            None => features.iter().zip(&self.weights).map(|(x, w)| x * w).sum(),
        };
        let decision = dot + self.bias;
        if decision.is_finite() {
            Ok(decision)
        } else {
            Err(ClassifierError::NonFiniteDecision(decision))
        }
    }
}

impl Classifier for LinearSvm {
    fn feature_len(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn classify(&self, features: &[f32]) -> Result<Classification, ClassifierError> {
        let decision = self.decision_function(features)?;
        let label = if decision > 0.0 {
            self.positive_label
        } else {
            self.negative_label
        };
        Ok(Classification { label, decision })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn decision_uses_scaler_and_bias() {
        let svm = LinearSvm::new(vec![2.0, -1.0], 0.5).with_scaler(FeatureScaler {
            mean: vec![1.0, 0.0],
            scale: vec![0.5, 2.0],
        });
        // 2 * (2 - 1) / 0.5 - 1 * 4 / 2 + 0.5
        let c = svm.classify(&[2.0, 4.0]).unwrap();
        assert_relative_eq!(c.decision, 2.5, epsilon = 1e-6);
        assert_eq!(c.label, 1);

        let c = svm.classify(&[1.0, 4.0]).unwrap();
        assert_relative_eq!(c.decision, -1.5, epsilon = 1e-6);
        assert_eq!(c.label, 0);
    }

    #[test]
    fn wrong_length_is_a_classifier_error() {
        let svm = LinearSvm::new(vec![1.0; 3], 0.0);
        assert_eq!(
            svm.classify(&[1.0]),
            Err(ClassifierError::DimensionMismatch {
                expected: 3,
                got: 1
            })
        );
    }

    #[test]
    fn parses_json_with_defaults() {
        let svm: LinearSvm = serde_json::from_str(r#"{ "weights": [1.0], "bias": 0.0 }"#).unwrap();
        assert_eq!(svm.positive_label, 1);
        assert_eq!(svm.negative_label, 0);
        assert!(svm.scaler.is_none());
        assert!(svm.check().is_ok());
    }

    #[test]
    fn non_finite_decision_is_rejected() {
        let svm = LinearSvm::new(vec![1.0], 0.0);
        assert!(matches!(
            svm.classify(&[f32::INFINITY]),
            Err(ClassifierError::NonFiniteDecision(_))
        ));
    }
}
