use crate::error::Result;
use crate::features::FeatureVector;

/// A fitted classifier: one feature vector in, one label out.
///
/// Implementations must be deterministic and must not keep per-call state,
/// since one instance serves every request for the life of the process.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Predict the label for `features`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelInference`](crate::EngineError::ModelInference)
    /// when the model cannot score the vector.
    fn predict(&self, features: &FeatureVector) -> Result<String>;

    /// Labels the model can produce.
    fn classes(&self) -> Vec<String>;
}
