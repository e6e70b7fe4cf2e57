use std::collections::BTreeMap;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use diagnosis_engine::{PatientRecord, PredictionResult};
use tracing::debug;

use crate::error::ApiResult;
use crate::server::TriageServer;
use crate::validation::RequestValidation;

/// Diagnose one patient.
///
/// Payload rejections, validation failures and unknown categories are client
/// errors (400); a classifier rejecting the feature vector is a server error
/// (500). Every error body carries an `error` message.
pub async fn predict(
    State(server): State<TriageServer>,
    payload: Result<Json<PatientRecord>, JsonRejection>,
) -> ApiResult<Json<PredictionResult>> {
    let Json(record) = payload?;
    record.validate()?;

    let result = server.context.predict(&record)?;
    debug!(
        diagnosis = %result.diagnosis,
        severity = result.severity.as_deref().unwrap_or("-"),
        "Prediction served"
    );

    Ok(Json(result))
}

/// Vocabulary of every categorical field, keyed by field name.
pub async fn vocabulary(State(server): State<TriageServer>) -> Json<BTreeMap<String, Vec<String>>> {
    let vocabularies = server
        .context
        .encoders()
        .named()
        .into_iter()
        .map(|(field, encoder)| (field.to_string(), encoder.vocabulary()))
        .collect();

    Json(vocabularies)
}
