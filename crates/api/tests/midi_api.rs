//! Integration tests for MIDI generation and the MIDI catalog endpoints.

mod common;

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, post_json, TestEnv, FAILING_GENERATOR, FAKE_GENERATOR, SILENT_GENERATOR};
use serde_json::json;
use tower::ServiceExt;

fn song() -> serde_json::Value {
    json!({
        "title": "My Song!",
        "theme": "summer nights",
        "genre": "pop",
        "tempo": 120
    })
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

#[tokio::test]
async fn generate_midi_returns_paths() {
    let env = TestEnv::new(FAKE_GENERATOR);

    let response = post_json(env.app(), "/api/generate-midi", song()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let midi_path = json["midiPath"].as_str().unwrap();
    let name = file_name(midi_path);
    assert!(name.starts_with("My_Song__"), "unexpected name {name}");
    assert!(name.ends_with(".mid"));
    assert!(Path::new(midi_path).starts_with(env.storage_root().join("midi/generated")));
    assert!(Path::new(midi_path).is_file());

    let metadata_path = json["metadataPath"].as_str().unwrap();
    assert!(metadata_path.ends_with("_metadata.json"));
}

#[tokio::test]
async fn dash_leading_title_is_generated() {
    let env = TestEnv::new(FAKE_GENERATOR);
    let mut body = song();
    body["title"] = json!("-Intro-");

    let response = post_json(env.app(), "/api/generate-midi", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(file_name(json["midiPath"].as_str().unwrap()).starts_with("_Intro__"));
}

#[tokio::test]
async fn missing_field_returns_400() {
    let env = TestEnv::new(FAKE_GENERATOR);
    let body = json!({ "title": "x", "theme": "y", "genre": "z" });

    let response = post_json(env.app(), "/api/generate-midi", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn tempo_out_of_range_returns_400() {
    let env = TestEnv::new(FAKE_GENERATOR);
    let mut body = song();
    body["tempo"] = json!(1000);

    let response = post_json(env.app(), "/api/generate-midi", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let env = TestEnv::new(FAKE_GENERATOR);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate-midi")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = env.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn failing_generator_returns_500_with_stderr() {
    let env = TestEnv::new(FAILING_GENERATOR);

    let response = post_json(env.app(), "/api/generate-midi", song()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "GENERATION_FAILED");
    let error = json["error"].as_str().unwrap();
    assert!(error.contains('3'), "{error}");
    assert!(error.contains("model weights missing"), "{error}");
}

#[tokio::test]
async fn exit_zero_without_file_is_a_failure() {
    let env = TestEnv::new(SILENT_GENERATOR);

    let response = post_json(env.app(), "/api/generate-midi", song()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not generated"));
}

#[tokio::test]
async fn list_midi_includes_generated_files() {
    let env = TestEnv::new(FAKE_GENERATOR);

    let empty = body_json(get(env.app(), "/api/midi/list").await).await;
    assert_eq!(empty["files"], json!([]));

    let generated = body_json(post_json(env.app(), "/api/generate-midi", song()).await).await;
    let name = file_name(generated["midiPath"].as_str().unwrap());

    let response = get(env.app(), "/api/midi/list").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["files"], json!([name]));
}

#[tokio::test]
async fn metadata_is_served_for_generated_file() {
    let env = TestEnv::new(FAKE_GENERATOR);
    let generated = body_json(post_json(env.app(), "/api/generate-midi", song()).await).await;
    let name = file_name(generated["midiPath"].as_str().unwrap());

    let response = get(env.app(), &format!("/api/midi/{name}/metadata")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["tempo"], 120);
}

#[tokio::test]
async fn metadata_for_unknown_file_returns_404() {
    let env = TestEnv::new(FAKE_GENERATOR);

    let response = get(env.app(), "/api/midi/nothing.mid/metadata").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn metadata_rejects_path_traversal() {
    let env = TestEnv::new(FAKE_GENERATOR);

    let response = get(env.app(), "/api/midi/..%2Fsecret.mid/metadata").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
