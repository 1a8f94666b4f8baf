// Integration tests for the prediction server

use regex::Regex;
use serde_json::{json, Value};
use smartcity_ai::{
    config::{Config, ServerConfig},
    models::TextClassifier,
    server::{PredictorServer, SERVICE_VERSION},
    training::{load_dataset, Trainer},
};
use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Fit a classifier on the fixture dataset the same way the trainer does
fn fixture_classifier() -> TextClassifier {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/complaints.csv");
    let records = load_dataset(&path).expect("fixture dataset loads");
    let (classifier, _) = Trainer::new(Config::default())
        .fit_and_evaluate(&records)
        .expect("fixture dataset trains");
    classifier
}

/// Start a server on an ephemeral port and return its base URL
async fn spawn_server(classifier: TextClassifier) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = PredictorServer::with_classifier(classifier, ServerConfig::default());
    tokio::spawn(async move {
        server.serve_on(listener).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn post_predict(base: &str, body: String) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let json = response.json::<Value>().await.unwrap();
    (status, json)
}

#[tokio::test]
async fn test_service_info() {
    let base = spawn_server(fixture_classifier()).await;

    let response = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "🤖 Smart City AI Service Active");
    assert_eq!(body["version"], SERVICE_VERSION);
    let timestamp = body["timestamp"].as_str().unwrap();
    let pattern = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
    assert!(pattern.is_match(timestamp), "unexpected timestamp {}", timestamp);
}

#[tokio::test]
async fn test_predict_water_example() {
    let classifier = fixture_classifier();
    let expected = classifier.classify("water pipe burst on my street").unwrap();
    let base = spawn_server(classifier).await;

    let (status, body) =
        post_predict(&base, json!({ "text": "water pipe burst on my street" }).to_string()).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["category"], "Water Supply");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!(confidence >= 50.0, "confidence was {}", confidence);
    assert_eq!(confidence, expected.confidence);
}

#[tokio::test]
async fn test_predict_strips_whitespace() {
    let classifier = fixture_classifier();
    let expected = classifier.classify("garbage not collected").unwrap();
    let base = spawn_server(classifier).await;

    let (status, body) =
        post_predict(&base, json!({ "text": "   garbage not collected \n" }).to_string()).await;

    assert_eq!(status, 200);
    assert_eq!(body["category"], expected.category.as_str());
    assert_eq!(body["confidence"].as_f64().unwrap(), expected.confidence);
}

#[tokio::test]
async fn test_predict_confidence_in_range_for_any_text() {
    let classifier = fixture_classifier();
    let classes = classifier.classes().to_vec();
    let base = spawn_server(classifier).await;

    for text in ["xyzzy", "the quick brown fox", "streetlight", "12345 67890"] {
        let (status, body) = post_predict(&base, json!({ "text": text }).to_string()).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert!(classes.iter().any(|c| c == body["category"].as_str().unwrap()));
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&confidence));
    }
}

#[tokio::test]
async fn test_predict_rejects_missing_text() {
    let base = spawn_server(fixture_classifier()).await;

    let bodies = [
        json!({}),
        json!({ "text": null }),
        json!({ "text": "" }),
        json!({ "text": "   \t\n" }),
        json!({ "other": "water leak" }),
    ];
    for body in bodies {
        let (status, response) = post_predict(&base, body.to_string()).await;
        assert_eq!(status, 400, "body {}", body);
        assert_eq!(response, json!({ "success": false, "error": "No text provided" }));
    }
}

#[tokio::test]
async fn test_predict_malformed_input_is_500() {
    let base = spawn_server(fixture_classifier()).await;

    let bodies = [
        "{ not json".to_string(),
        String::new(),
        json!(["water leak"]).to_string(),
        json!({ "text": 42 }).to_string(),
    ];
    for body in bodies {
        let (status, response) = post_predict(&base, body.clone()).await;
        assert_eq!(status, 500, "body {:?}", body);
        assert_eq!(response["success"], false);
        assert!(!response["error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_large_bodies_get_json_envelope() {
    let base = spawn_server(fixture_classifier()).await;

    // Well past axum's default 2 MB extractor limit
    let text = "water leak ".repeat(300_000);
    let (status, response) = post_predict(&base, json!({ "text": text }).to_string()).await;
    assert_eq!(status, 200);
    assert_eq!(response["success"], true);
    assert_eq!(response["category"], "Water Supply");

    let malformed = format!("{{\"text\": \"{}", "x".repeat(3_000_000));
    let (status, response) = post_predict(&base, malformed).await;
    assert_eq!(status, 500);
    assert_eq!(response["success"], false);
    assert!(!response["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let base = spawn_server(fixture_classifier()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .header("origin", "http://localhost:5173")
        .json(&json!({ "text": "pothole on main road" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_predictions_are_independent() {
    let classifier = fixture_classifier();
    let texts = [
        "water pipe burst on my street",
        "streetlight not working",
        "garbage not collected",
        "pothole on main road",
        "power outage every night",
        "dirty water from pipe",
    ];
    let expected: Vec<_> = texts
        .iter()
        .map(|text| classifier.classify(text).unwrap())
        .collect();
    let base = spawn_server(classifier).await;

    let mut handles = Vec::new();
    for i in 0..60 {
        let base = base.clone();
        let text = texts[i % texts.len()];
        handles.push(tokio::spawn(async move {
            let (status, body) = post_predict(&base, json!({ "text": text }).to_string()).await;
            (i % texts.len(), status, body)
        }));
    }

    for handle in handles {
        let (index, status, body) = handle.await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(body["category"], expected[index].category.as_str());
        assert_eq!(body["confidence"].as_f64().unwrap(), expected[index].confidence);
    }
}

#[test]
fn test_server_requires_model_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.model_path = temp_dir.path().join("model.json");

    let err = PredictorServer::new(&config).err().expect("startup must fail without a model");
    assert!(err.to_string().contains("Model file not found"));
}

#[test]
fn test_server_rejects_corrupt_model() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.model_path = temp_dir.path().join("model.json");
    std::fs::write(&config.model_path, b"\x00\x01garbage").unwrap();

    assert!(PredictorServer::new(&config).is_err());
}
