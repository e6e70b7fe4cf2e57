use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use diagnosis_engine::{Classifier, EngineError, FeatureVector, InferenceContext};
use tower::ServiceExt;
use triage_server::{create_app, ServerConfig, TriageServer};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures/artifacts")
}

fn app_with_origins(cors_origins: Vec<String>) -> Router {
    let config = ServerConfig {
        artifact_dir: fixture_dir(),
        cors_origins,
        ..ServerConfig::default()
    };
    create_app(TriageServer::new(config).expect("fixture artifacts load"))
}

fn app() -> Router {
    app_with_origins(Vec::new())
}

/// A model whose export is internally broken: it cannot score any vector.
struct CorruptClassifier;

impl Classifier for CorruptClassifier {
    fn predict(&self, _features: &FeatureVector) -> diagnosis_engine::Result<String> {
        Err(EngineError::ModelInference {
            model: "diagnosis".to_string(),
            message: "tree 3 has no root node".to_string(),
        })
    }

    fn classes(&self) -> Vec<String> {
        vec!["Flu".to_string(), "Healthy".to_string()]
    }
}

fn app_with_corrupt_diagnosis() -> Router {
    let loaded = InferenceContext::load(&fixture_dir()).expect("fixture artifacts load");
    let context = InferenceContext::new(
        loaded.encoders().clone(),
        Arc::new(CorruptClassifier),
        Arc::new(CorruptClassifier),
    );
    create_app(TriageServer::with_context(ServerConfig::default(), context))
}

fn patient(overrides: Value) -> Value {
    let mut payload = json!({
        "Age": 45,
        "Gender": "Male",
        "Symptom_1": "Fever",
        "Symptom_2": "Cough",
        "Symptom_3": "Fatigue",
        "Heart_Rate_bpm": 80,
        "Body_Temperature_C": 37.5,
        "Oxygen_Saturation_": 98,
        "Systolic": 120,
        "Diastolic": 80
    });
    if let (Some(base), Some(extra)) = (payload.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    payload
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_healthy_patient_gets_no_treatment() {
    let (status, body) = send(app(), post_json(&patient(json!({})))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"Diagnosis": "Healthy", "Treatment_Plan": "No treatment needed"})
    );
}

#[tokio::test]
async fn test_sick_patient_gets_severity_and_plan() {
    let (status, body) = send(
        app(),
        post_json(&patient(json!({"Body_Temperature_C": 39.0}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Diagnosis": "Flu",
            "Severity": "Moderate",
            "Treatment_Plan": "Medication and rest"
        })
    );
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let body = patient(json!({
        "Age": "45",
        "Heart_Rate_bpm": "80",
        "Body_Temperature_C": "37.5",
        "Oxygen_Saturation_": "98",
        "Systolic": "120",
        "Diastolic": "80"
    }));
    let (status, body) = send(app(), post_json(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Diagnosis"], "Healthy");
}

#[tokio::test]
async fn test_unknown_gender_is_a_client_error() {
    let (status, body) = send(app(), post_json(&patient(json!({"Gender": "Unknown"})))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown"));
    assert_eq!(body["error_type"], "unknown_category");
    assert_eq!(body["error_code"], "ENCODING_2001");
    assert_eq!(body["field"], "Gender");
    assert!(body["error_id"].is_string());
}

#[tokio::test]
async fn test_symptom_from_another_slot_is_rejected() {
    // "Fever" is only in the Symptom_1 vocabulary.
    let (status, _) = send(app(), post_json(&patient(json!({"Symptom_1": "Fever"})))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(), post_json(&patient(json!({"Symptom_2": "Fever"})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Symptom_2 encoder: unrecognised category \"Fever\""
    );
    assert_eq!(body["error_code"], "ENCODING_2001");
    assert_eq!(body["field"], "Symptom_2");
}

#[tokio::test]
async fn test_model_failure_is_a_server_error() {
    let (status, body) = send(app_with_corrupt_diagnosis(), post_json(&patient(json!({})))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "diagnosis model rejected the feature vector: tree 3 has no root node"
    );
    assert_eq!(body["error_type"], "model_inference_error");
    assert_eq!(body["error_code"], "INFERENCE_3001");
    assert!(body.get("field").is_none());
    assert!(body.get("Diagnosis").is_none());
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let mut body = patient(json!({}));
    body.as_object_mut().unwrap().remove("Diastolic");
    let (status, body) = send(app(), post_json(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Diastolic"));
    assert_eq!(body["error_code"], "VALIDATION_1001");
}

#[tokio::test]
async fn test_non_numeric_measurement_is_rejected() {
    let (status, body) = send(
        app(),
        post_json(&patient(json!({"Heart_Rate_bpm": "fast"}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_negative_age_is_rejected() {
    let (status, body) = send(app(), post_json(&patient(json!({"Age": -3})))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "Age");
    assert_eq!(body["error"], "Age must be 0 or more");
}

#[tokio::test]
async fn test_blank_symptom_is_rejected() {
    let (status, body) = send(app(), post_json(&patient(json!({"Symptom_1": ""})))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "Symptom_1");
    assert_eq!(body["error_code"], "VALIDATION_1002");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"Age\": 45,"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1003");
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .body(Body::from(patient(json!({})).to_string()))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_predict_is_not_allowed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/predict")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_preflight_allows_post_from_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .contains("POST"));
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let app = app_with_origins(vec!["https://clinic.example".to_string()]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::ORIGIN, "https://clinic.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(patient(json!({})).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://clinic.example"
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::ORIGIN, "https://elsewhere.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(patient(json!({})).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_health_reports_loaded_artifacts() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["artifacts"]["encoders"]["Gender"], 3);
    assert_eq!(
        body["artifacts"]["severity_classes"],
        json!(["Mild", "Moderate", "Severe"])
    );
}

#[tokio::test]
async fn test_vocabulary_lists_each_field() {
    let request = Request::builder()
        .uri("/vocabulary")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Gender"], json!(["Female", "Male", "Other"]));
    assert!(body["Symptom_1"]
        .as_array()
        .unwrap()
        .contains(&json!("Fever")));
    assert!(!body["Symptom_2"]
        .as_array()
        .unwrap()
        .contains(&json!("Fever")));
}

#[tokio::test]
async fn test_version_endpoint() {
    let request = Request::builder()
        .uri("/version")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
