//! End-to-end tests for artist endpoints

mod common;

use common::{
    TestClient, TestServer, ALBUM_1_ID, ARTIST_1_ID, ARTIST_1_NAME, ARTIST_2_ID, ARTIST_2_NAME,
    TRACK_1_ID,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn get_artist_returns_correct_data() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_artist(ARTIST_1_ID).await;

    assert_eq!(response.status(), StatusCode::OK);

    // Response is a resolved artist with its albums attached.
    let resolved: serde_json::Value = response.json().await.unwrap();
    assert_eq!(resolved["artist"]["id"], ARTIST_1_ID);
    assert_eq!(resolved["artist"]["name"], ARTIST_1_NAME);
    let albums = resolved["albums"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["id"], ALBUM_1_ID);
}

#[tokio::test]
async fn get_nonexistent_artist_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_artist(999).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_all_artists_returns_seeded_rows() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_artists().await;
    assert_eq!(response.status(), StatusCode::OK);

    let artists: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = artists
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["artist"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec![ARTIST_1_NAME, ARTIST_2_NAME]);
}

#[tokio::test]
async fn get_all_artists_on_empty_catalog_returns_empty_array() {
    let server = TestServer::spawn_empty().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_artists().await;
    assert_eq!(response.status(), StatusCode::OK);

    let artists: serde_json::Value = response.json().await.unwrap();
    assert_eq!(artists, json!([]));
}

#[tokio::test]
async fn create_artist_assigns_id_and_round_trips() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_artist(&json!({
            "name": "Test Artist", "age": 30, "country": "USA", "label": "Sony"
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: serde_json::Value = response.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    let response = client.get_artist(id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: serde_json::Value = response.json().await.unwrap();
    assert_eq!(fetched["artist"]["name"], "Test Artist");
    assert_eq!(fetched["artist"]["age"], 30);
    assert_eq!(fetched["artist"]["country"], "USA");
    assert_eq!(fetched["artist"]["label"], "Sony");
}

#[tokio::test]
async fn create_artist_with_invalid_fields_returns_all_violations() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let long_label = "A very long label name that exceeds the maximum length allowed for labels";
    let response = client
        .create_artist(&json!({
            "name": "", "age": -1, "country": "", "label": long_label
        }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let violations: serde_json::Value = response.json().await.unwrap();
    let fields: Vec<&str> = violations
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "age", "country", "label"]);
}

#[tokio::test]
async fn update_artist_replaces_all_fields() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .update_artist(
            ARTIST_1_ID,
            &json!({
                "name": "Renamed Band", "age": 35, "country": "UK", "label": ""
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.get_artist(ARTIST_1_ID).await;
    let fetched: serde_json::Value = response.json().await.unwrap();
    assert_eq!(fetched["artist"]["name"], "Renamed Band");
    assert_eq!(fetched["artist"]["age"], 35);
    assert_eq!(fetched["artist"]["country"], "UK");
    assert_eq!(fetched["artist"]["label"], "");
}

#[tokio::test]
async fn update_nonexistent_artist_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .update_artist(
            999,
            &json!({"name": "Ghost", "age": 30, "country": "USA", "label": ""}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_artist_then_get_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_artist(ARTIST_2_ID).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.get_artist(ARTIST_2_ID).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_nonexistent_artist_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_artist(999).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_artist_cascades_to_albums_and_tracks() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_artist(ARTIST_1_ID).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.get_album(ALBUM_1_ID).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.get_track(TRACK_1_ID).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
