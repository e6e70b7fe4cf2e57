//! Loading persisted encoders and classifiers
//!
//! Every artifact is a JSON export read once at start-up. File names keep the
//! stems the models were originally published under.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::classifier::Classifier;
use crate::encoder::{LabelEncoder, LabelEncoderArtifact};
use crate::error::{EngineError, Result};
use crate::features::FeatureVector;
use crate::forest::{TreeEnsemble, TreeEnsembleArtifact};

pub const DIAGNOSIS_MODEL_FILE: &str = "best_diag.json";
pub const SEVERITY_MODEL_FILE: &str = "best_sev.json";
pub const GENDER_ENCODER_FILE: &str = "Gender_encoder.json";
pub const SYMPTOM_1_ENCODER_FILE: &str = "Symptom_1_encoder.json";
pub const SYMPTOM_2_ENCODER_FILE: &str = "Symptom_2_encoder.json";
pub const SYMPTOM_3_ENCODER_FILE: &str = "Symptom_3_encoder.json";

/// Locations of the six artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub diagnosis: PathBuf,
    pub severity: PathBuf,
    pub gender: PathBuf,
    pub symptom_1: PathBuf,
    pub symptom_2: PathBuf,
    pub symptom_3: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            diagnosis: dir.join(DIAGNOSIS_MODEL_FILE),
            severity: dir.join(SEVERITY_MODEL_FILE),
            gender: dir.join(GENDER_ENCODER_FILE),
            symptom_1: dir.join(SYMPTOM_1_ENCODER_FILE),
            symptom_2: dir.join(SYMPTOM_2_ENCODER_FILE),
            symptom_3: dir.join(SYMPTOM_3_ENCODER_FILE),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a label encoder export.
///
/// # Errors
///
/// Fails when the file is unreadable, is not a label encoder export, or has an
/// empty or duplicated vocabulary.
pub fn load_encoder(name: &str, path: &Path) -> Result<LabelEncoder> {
    let artifact: LabelEncoderArtifact = read_json(path)?;
    let encoder = LabelEncoder::from_artifact(name, artifact).map_err(|err| at_path(err, path))?;

    info!(
        encoder = encoder.name(),
        path = %path.display(),
        classes = encoder.len(),
        "Loaded encoder"
    );
    Ok(encoder)
}

/// Load a tree-ensemble classifier export.
///
/// The export must expect exactly [`FeatureVector::LEN`] features.
///
/// # Errors
///
/// Fails when the file is unreadable, is not a classifier export, fails
/// structural validation, or was fitted on a different number of features.
pub fn load_classifier(name: &str, path: &Path) -> Result<TreeEnsemble> {
    let artifact: TreeEnsembleArtifact = read_json(path)?;
    if artifact.n_features != FeatureVector::LEN {
        return Err(EngineError::artifact(
            path.display().to_string(),
            format!(
                "{name} model expects {} features, service provides {}",
                artifact.n_features,
                FeatureVector::LEN
            ),
        ));
    }
    let model = TreeEnsemble::from_artifact(name, artifact).map_err(|err| at_path(err, path))?;

    info!(
        model = model.name(),
        path = %path.display(),
        features = model.n_features(),
        trees = model.n_trees(),
        classes = ?model.classes(),
        "Loaded classifier"
    );
    Ok(model)
}

/// Report validation failures against the file rather than the model name.
fn at_path(err: EngineError, path: &Path) -> EngineError {
    match err {
        EngineError::Artifact { artifact, message } => EngineError::Artifact {
            artifact: path.display().to_string(),
            message: format!("{artifact}: {message}"),
        },
        other => other,
    }
}
