//! Window scoring: max-pool each window to a C2-style vector, then classify.
//!
//! All windows of one scale are pooled first and handed to the classifier
//! as a single batch, so the number of classifier calls per scale is
//! explicit and the batch can be split across threads.
use crate::classify::Classifier;
use crate::error::{ClassifierError, DetectError, DetectResult};
use crate::features::FeatureMap;
use crate::types::{BoundingBox, Classification};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct WindowScorer<'a> {
    classifier: &'a dyn Classifier,
}

impl<'a> WindowScorer<'a> {
    pub fn new(classifier: &'a dyn Classifier) -> Self {
        Self { classifier }
    }

    /// Pool one window of `layer` into a vector of length `layer.prototypes`.
    pub fn pool(&self, layer: &FeatureMap, window: &BoundingBox) -> DetectResult<Vec<f32>> {
        let pooled = layer.window_max(window).ok_or_else(|| {
            DetectError::ClassifierFailure(ClassifierError::Model(format!(
                "window {:?} outside {}x{} layer",
                window.to_xyxy(),
                layer.width,
                layer.height
            )))
        })?;
        if let Some(expected) = self.classifier.feature_len() {
            if expected != pooled.len() {
                return Err(ClassifierError::DimensionMismatch {
                    expected,
                    got: pooled.len(),
                }
                .into());
            }
        }
        Ok(pooled)
    }

    /// Score a single window.
    pub fn score(&self, layer: &FeatureMap, window: &BoundingBox) -> DetectResult<Classification> {
        let features = self.pool(layer, window)?;
        let c = self.classifier.classify(&features)?;
        check_decision(c)
    }

    /// Score all `windows` of one layer; the output is aligned with `windows`.
    pub fn score_batch(
        &self,
        layer: &FeatureMap,
        windows: &[BoundingBox],
    ) -> DetectResult<Vec<Classification>> {
        if windows.is_empty() {
            return Ok(Vec::new());
        }
        #[cfg(feature = "parallel")]
        let batch: Vec<Vec<f32>> = windows
            .par_iter()
            .map(|w| self.pool(layer, w))
            .collect::<DetectResult<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let batch: Vec<Vec<f32>> = windows
            .iter()
            .map(|w| self.pool(layer, w))
            .collect::<DetectResult<_>>()?;

        let scores = self.classifier.classify_batch(&batch)?;
        if scores.len() != batch.len() {
            return Err(ClassifierError::BatchSizeMismatch {
                expected: batch.len(),
                got: scores.len(),
            }
            .into());
        }
        scores.into_iter().map(check_decision).collect()
    }
}

fn check_decision(c: Classification) -> DetectResult<Classification> {
    if c.decision.is_finite() {
        Ok(c)
    } else {
        Err(ClassifierError::NonFiniteDecision(c.decision).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LinearSvm;

    struct ShortBatch;

    impl Classifier for ShortBatch {
        fn classify(&self, _: &[f32]) -> Result<Classification, ClassifierError> {
            Ok(Classification {
                label: 1,
                decision: 1.0,
            })
        }

        fn classify_batch(&self, _: &[Vec<f32>]) -> Result<Vec<Classification>, ClassifierError> {
            Ok(Vec::new())
        }
    }

    fn layer() -> FeatureMap {
        let mut map = FeatureMap::new(1, 2, 4, 4);
        map.set(0, 0, 0, 0, 1.0);
        map.set(0, 1, 3, 3, 2.0);
        map
    }

    #[test]
    fn batch_is_aligned_with_windows() {
        let svm = LinearSvm::new(vec![1.0, 1.0], -0.5);
        let scorer = WindowScorer::new(&svm);
        let windows = [
            BoundingBox::from_ranges(0..2, 0..2),
            BoundingBox::from_ranges(2..4, 2..4),
            BoundingBox::from_ranges(1..3, 1..3),
        ];
        let scores = scorer.score_batch(&layer(), &windows).unwrap();
        let decisions: Vec<f32> = scores.iter().map(|c| c.decision).collect();
        assert_eq!(decisions, vec![0.5, 1.5, -0.5]);
        assert_eq!(scores[2].label, 0);
        assert_eq!(scorer.score(&layer(), &windows[1]).unwrap(), scores[1]);
    }

    #[test]
    fn feature_length_mismatch_is_a_classifier_failure() {
        let svm = LinearSvm::new(vec![1.0; 3], 0.0);
        let scorer = WindowScorer::new(&svm);
        let err = scorer
            .score(&layer(), &BoundingBox::from_ranges(0..2, 0..2))
            .unwrap_err();
        assert!(matches!(err, DetectError::ClassifierFailure(_)));
    }

    #[test]
    fn short_batch_is_rejected() {
        let scorer = WindowScorer::new(&ShortBatch);
        let err = scorer
            .score_batch(&layer(), &[BoundingBox::from_ranges(0..2, 0..2)])
            .unwrap_err();
        assert_eq!(
            err,
            DetectError::ClassifierFailure(ClassifierError::BatchSizeMismatch {
                expected: 1,
                got: 0
            })
        );
    }
}
