// Integration tests for the read-only HTTP surface

mod utils;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`
use utils::TestSetupBuilder;

use nestris_stats::{AvatarManifest, ResourceLocation};

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_reports_ready() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_players_listed_by_name_with_avatars() {
    let manifest_path =
        std::env::temp_dir().join(format!("manifest-{}.json", uuid::Uuid::new_v4()));
    tokio::fs::write(&manifest_path, r#"{"2": ".png"}"#)
        .await
        .unwrap();

    let setup = TestSetupBuilder::new()
        .with_avatars(AvatarManifest::new(
            ResourceLocation::File(manifest_path.clone()),
            "/img/avatar",
        ))
        .build()
        .await;

    let (status, body) = get_json(&setup.app, "/players").await;

    assert_eq!(status, StatusCode::OK);
    let players = body.as_array().unwrap();
    let names: Vec<&str> = players
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert_eq!(players[1]["avatar_url"], "/img/avatar/2.png");
    assert!(players[0]["avatar_url"].is_null());

    tokio::fs::remove_file(manifest_path).await.unwrap();
}

#[tokio::test]
async fn test_player_profile_includes_every_statistic() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/players/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"]["username"], "alice");

    let stats = body["stats"].as_array().unwrap();
    assert_eq!(stats.len(), 5);
    let win_rate = stats
        .iter()
        .find(|s| s["stat_id"] == "match_win_rate")
        .unwrap();
    assert_eq!(win_rate["display"], "50.0%");
}

#[tokio::test]
async fn test_player_profile_with_filters() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/players/1?events=ctwc").await;

    assert_eq!(status, StatusCode::OK);
    let stats = body["stats"].as_array().unwrap();
    let total_wins = stats.iter().find(|s| s["stat_id"] == "total_wins").unwrap();
    assert_eq!(total_wins["display"], "1");
    let total_matches = stats
        .iter()
        .find(|s| s["stat_id"] == "total_matches")
        .unwrap();
    assert_eq!(total_matches["value"], 1.0);
}

#[tokio::test]
async fn test_unknown_player_is_not_found() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/players/99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_stat_results_carry_player_names() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/stats/game_wins").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stat"]["id"], "game_wins");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["player_name"], "bob");
    assert_eq!(results[0]["display"], "3");
    assert_eq!(results[1]["player_name"], "alice");
}

#[tokio::test]
async fn test_stat_scoped_to_player_and_dates() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(
        &setup.app,
        "/stats/total_matches?player=2&start=2024-02-20&end=2024-02-20",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["player_id"], 2);
    assert_eq!(results[0]["value"], 1.0);
}

#[tokio::test]
async fn test_head_to_head_compares_and_lists_matches() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/head-to-head?a=1&b=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["a"]["username"], "alice");
    assert_eq!(body["b"]["username"], "bob");

    let game_wins = body["stats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["stat_id"] == "game_wins")
        .unwrap();
    assert_eq!(game_wins["a"]["display"], "2");
    assert_eq!(game_wins["b"]["display"], "3");

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["match_id"], 101);
    assert_eq!(matches[0]["event_name"], "CTM");
}

#[tokio::test]
async fn test_head_to_head_with_player_without_matches() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, body) = get_json(&setup.app, "/head-to-head?a=1&b=3").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["matches"].as_array().unwrap().is_empty());
    assert!(body["stats"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["b"].is_null()));
}

#[tokio::test]
async fn test_head_to_head_unknown_player_is_not_found() {
    let setup = TestSetupBuilder::new().build().await;

    let (status, _) = get_json(&setup.app, "/head-to-head?a=1&b=77").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
