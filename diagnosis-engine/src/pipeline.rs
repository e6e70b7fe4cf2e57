//! The diagnosis pipeline: encode, diagnose, and for anything other than a
//! healthy diagnosis, grade severity and pick a treatment plan.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifacts::{self, ArtifactPaths};
use crate::classifier::Classifier;
use crate::error::Result;
use crate::features::{EncoderSet, FeatureVector, PatientRecord};
use crate::treatment;

/// Diagnosis label for which no severity is graded.
pub const HEALTHY: &str = "Healthy";

/// Treatment plan returned with a healthy diagnosis.
pub const NO_TREATMENT: &str = "No treatment needed";

/// Outcome of one prediction. Field names on the wire are part of the client
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
    #[serde(rename = "Severity", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "Treatment_Plan")]
    pub treatment_plan: String,
}

/// What is loaded, for health reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub encoders: BTreeMap<String, usize>,
    pub diagnosis_classes: Vec<String>,
    pub severity_classes: Vec<String>,
}

/// Models and encoders, loaded once and shared read-only by every request.
#[derive(Clone)]
pub struct InferenceContext {
    encoders: EncoderSet,
    diagnosis: Arc<dyn Classifier>,
    severity: Arc<dyn Classifier>,
}

impl InferenceContext {
    pub fn new(
        encoders: EncoderSet,
        diagnosis: Arc<dyn Classifier>,
        severity: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            encoders,
            diagnosis,
            severity,
        }
    }

    /// Load every artifact from `dir` using the standard file names.
    ///
    /// # Errors
    ///
    /// Fails on the first artifact that is missing, unreadable or invalid.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_from(&ArtifactPaths::in_dir(dir))
    }

    /// Load every artifact from explicit paths.
    ///
    /// # Errors
    ///
    /// Fails on the first artifact that is missing, unreadable or invalid.
    pub fn load_from(paths: &ArtifactPaths) -> Result<Self> {
        let encoders = EncoderSet {
            gender: Arc::new(artifacts::load_encoder("Gender", &paths.gender)?),
            symptom_1: Arc::new(artifacts::load_encoder("Symptom_1", &paths.symptom_1)?),
            symptom_2: Arc::new(artifacts::load_encoder("Symptom_2", &paths.symptom_2)?),
            symptom_3: Arc::new(artifacts::load_encoder("Symptom_3", &paths.symptom_3)?),
        };
        let diagnosis = artifacts::load_classifier("diagnosis", &paths.diagnosis)?;
        let severity = artifacts::load_classifier("severity", &paths.severity)?;

        Ok(Self::new(encoders, Arc::new(diagnosis), Arc::new(severity)))
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// Run the full pipeline for one patient.
    ///
    /// The severity model only runs when the diagnosis is not [`HEALTHY`], and
    /// it scores the same feature vector the diagnosis model saw.
    ///
    /// # Errors
    ///
    /// Returns the first encoding or inference failure. No partial result is
    /// ever produced.
    pub fn predict(&self, record: &PatientRecord) -> Result<PredictionResult> {
        let features = FeatureVector::assemble(record, &self.encoders)?;

        let diagnosis = self.diagnosis.predict(&features)?;
        if diagnosis == HEALTHY {
            debug!(diagnosis = %diagnosis, "Prediction complete");
            return Ok(PredictionResult {
                diagnosis,
                severity: None,
                treatment_plan: NO_TREATMENT.to_string(),
            });
        }

        let severity = self.severity.predict(&features)?;
        let treatment_plan = treatment::resolve(&severity).to_string();
        debug!(diagnosis = %diagnosis, severity = %severity, "Prediction complete");

        Ok(PredictionResult {
            diagnosis,
            severity: Some(severity),
            treatment_plan,
        })
    }

    pub fn summary(&self) -> ArtifactSummary {
        let encoders = self
            .encoders
            .named()
            .into_iter()
            .map(|(field, encoder)| (field.to_string(), encoder.vocabulary().len()))
            .collect();

        ArtifactSummary {
            encoders,
            diagnosis_classes: self.diagnosis.classes(),
            severity_classes: self.severity.classes(),
        }
    }
}

impl std::fmt::Debug for InferenceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceContext")
            .field("encoders", &self.encoders)
            .finish_non_exhaustive()
    }
}
