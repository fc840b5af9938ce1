//! Binary classifier seam.
//!
//! The detector treats the classifier as a stateless, reentrant function of
//! one feature vector. Batch scoring is the entry point used per scale; the
//! default batch implementation simply maps [`Classifier::classify`].

pub mod svm;

pub use crate::error::ClassifierError;
pub use crate::types::Classification;
pub use svm::{FeatureScaler, LinearSvm};

pub trait Classifier: Send + Sync {
    /// Expected feature length, when the model knows it.
    fn feature_len(&self) -> Option<usize> {
        None
    }

    fn classify(&self, features: &[f32]) -> Result<Classification, ClassifierError>;

    /// Score a batch of vectors; the output is aligned with `batch`.
    fn classify_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Classification>, ClassifierError> {
        batch.iter().map(|f| self.classify(f)).collect()
    }
}
