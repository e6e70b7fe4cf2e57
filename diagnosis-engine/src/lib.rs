//! Diagnosis engine for the triage inference service
//!
//! Turns a [`PatientRecord`] into a [`PredictionResult`]:
//!
//! 1. The four categorical fields are encoded with their own fitted
//!    [`CategoryEncoder`]s and combined with the raw measurements into a
//!    fixed-order [`FeatureVector`].
//! 2. The diagnosis [`Classifier`] labels the vector.
//! 3. Unless the label is [`HEALTHY`], the severity classifier grades the same
//!    vector and [`treatment::resolve`] maps the grade to a treatment plan.
//!
//! Everything is loaded once into an immutable [`InferenceContext`] that is
//! shared by reference across requests. The engine has no HTTP knowledge.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use diagnosis_engine::{InferenceContext, PatientRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = InferenceContext::load(Path::new("artifacts"))?;
//! let record: PatientRecord = serde_json::from_str(r#"{
//!     "Age": 45, "Gender": "Male",
//!     "Symptom_1": "Fever", "Symptom_2": "Cough", "Symptom_3": "Fatigue",
//!     "Heart_Rate_bpm": 80, "Body_Temperature_C": 37.5,
//!     "Oxygen_Saturation_": 98, "Systolic": 120, "Diastolic": 80
//! }"#)?;
//! let result = context.predict(&record)?;
//! println!("{}", result.treatment_plan);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod classifier;
pub mod encoder;
pub mod error;
pub mod features;
pub mod forest;
pub mod pipeline;
pub mod treatment;

pub use artifacts::ArtifactPaths;
pub use classifier::Classifier;
pub use encoder::{CategoryEncoder, LabelEncoder};
pub use error::{EngineError, Result};
pub use features::{EncoderSet, FeatureVector, PatientRecord};
pub use forest::TreeEnsemble;
pub use pipeline::{ArtifactSummary, InferenceContext, PredictionResult, HEALTHY, NO_TREATMENT};
