//! API integration tests
//! Tests complete HTTP request/response cycles with real database

mod common;

use axum::http::{Method, StatusCode};
use common::{test_config, TestApp};
use serde_json::json;

fn public_playlist() -> serde_json::Value {
    json!({ "name": "Party" })
}

/// Test GET /api/health without authentication
#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

/// Test protected routes reject anonymous and forged requests
#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/api/playlists/p/tracks", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let request = axum::http::Request::builder()
        .uri("/api/playlists/p/tracks")
        .header(axum::http::header::AUTHORIZATION, "Bearer not-a-token")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_get_playlist() {
    let app = TestApp::new().await;

    let (status, created) = app
        .post(
            "/api/playlists",
            "alice",
            json!({ "name": "  Friday  ", "visibility": "private", "editMode": "invitedOnly" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Friday");
    assert_eq!(created["ownerId"], "alice");
    assert_eq!(created["visibility"], "private");
    assert!(created["currentTrackId"].is_null());

    let id = created["id"].as_str().unwrap();
    app.add_track(id, "alice", "Song").await;

    let (status, details) = app.get(&format!("/api/playlists/{id}"), "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["id"], id);
    assert_eq!(details["tracks"][0]["title"], "Song");
    assert_eq!(details["tracks"][0]["position"], 0);
}

#[tokio::test]
async fn test_create_playlist_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/playlists", "alice", json!({ "name": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/playlists", "alice", json!({ "title": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_playlist_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/playlists/missing", "alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/api/playlists/missing/tracks",
            "alice",
            json!({ "title": "A", "artist": "B" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_track_returns_created_track() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;

    app.add_track(&id, "alice", "First").await;
    let (status, track) = app
        .post(
            &format!("/api/playlists/{id}/tracks"),
            "bob",
            json!({
                "title": "Second",
                "artist": "Artist",
                "provider": "youtube",
                "providerTrackId": "abc123",
                "thumbnailUrl": "https://img.example/abc.jpg",
                "durationMs": 180000
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(track["position"], 1);
    assert_eq!(track["status"], "queued");
    assert_eq!(track["voteCount"], 0);
    assert_eq!(track["providerTrackId"], "abc123");
    assert_eq!(track["durationMs"], 180000);
}

#[tokio::test]
async fn test_add_track_rejects_bad_input() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;
    let uri = format!("/api/playlists/{id}/tracks");

    let (status, _) = app
        .post(&uri, "alice", json!({ "title": "x".repeat(201), "artist": "A" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post(&uri, "alice", json!({ "artist": "A" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.titles(&id, "alice").await.is_empty());
}

#[tokio::test]
async fn test_move_track() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;
    for title in ["A", "B", "C", "D"] {
        app.add_track(&id, "alice", title).await;
    }
    let details = app.get(&format!("/api/playlists/{id}"), "alice").await.1;
    let c = details["tracks"][2]["id"].as_str().unwrap().to_string();

    let (status, moved) = app
        .send(
            Method::PATCH,
            &format!("/api/playlists/{id}/tracks/{c}"),
            Some("alice"),
            Some(json!({ "newPosition": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved, json!({ "trackId": c, "from": 2, "to": 0 }));
    assert_eq!(app.titles(&id, "alice").await, ["C", "A", "B", "D"]);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/playlists/{id}/tracks/{c}"),
            Some("alice"),
            Some(json!({ "newPosition": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_on_empty_playlist_conflicts() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/playlists/{id}/tracks/ghost"),
            Some("alice"),
            Some(json!({ "newPosition": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_track() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;
    app.add_track(&id, "alice", "A").await;
    let b = app.add_track(&id, "alice", "B").await;
    app.add_track(&id, "alice", "C").await;

    let uri = format!("/api/playlists/{id}/tracks/{b}");
    let (status, body) = app.send(Method::DELETE, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(app.titles(&id, "alice").await, ["A", "C"]);

    let (status, _) = app.send(Method::DELETE, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vote_reorders_queue() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;
    app.add_track(&id, "alice", "A").await;
    let b = app.add_track(&id, "alice", "B").await;
    let c = app.add_track(&id, "alice", "C").await;

    let (status, body) = app
        .post(&format!("/api/playlists/{id}/tracks/{c}/vote"), "bob", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "voteCount": 1 }));
    assert_eq!(app.titles(&id, "alice").await, ["C", "A", "B"]);

    for voter in ["bob", "carol"] {
        app.post(&format!("/api/playlists/{id}/tracks/{b}/vote"), voter, json!({}))
            .await;
    }
    assert_eq!(app.titles(&id, "alice").await, ["B", "C", "A"]);
}

#[tokio::test]
async fn test_repeat_votes_can_be_disabled() {
    let mut config = test_config();
    config.votes.allow_repeat_votes = false;
    let app = TestApp::with_config(config).await;
    let id = app.create_playlist("alice", public_playlist()).await;
    let a = app.add_track(&id, "alice", "A").await;
    let uri = format!("/api/playlists/{id}/tracks/{a}/vote");

    let (status, _) = app.post(&uri, "bob", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post(&uri, "bob", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_next_track_and_player_state() {
    let app = TestApp::new().await;
    let id = app.create_playlist("alice", public_playlist()).await;
    let x = app.add_track(&id, "alice", "X").await;
    let y = app.add_track(&id, "alice", "Y").await;
    let next = format!("/api/playlists/{id}/next");

    let (status, state) = app.post(&next, "alice", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["currentTrackId"], x.as_str());
    assert_eq!(state["status"], "playing");
    assert!(state["playingStartedAt"].is_string());

    let (_, state) = app.post(&next, "alice", json!({})).await;
    assert_eq!(state["currentTrackId"], y.as_str());

    let (status, player) = app.get(&format!("/api/playlists/{id}/player"), "bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(player["currentTrackId"], y.as_str());
    assert_eq!(player["playlistId"], id.as_str());

    let (_, state) = app.post(&next, "alice", json!({})).await;
    assert_eq!(state["status"], "stopped");
    assert!(state["currentTrackId"].is_null());
    assert!(state["playingStartedAt"].is_null());
}

#[tokio::test]
async fn test_private_playlist_access() {
    let app = TestApp::new().await;
    let id = app
        .create_playlist("alice", json!({ "name": "Secret", "visibility": "private" }))
        .await;

    let (status, _) = app.get(&format!("/api/playlists/{id}"), "mallory").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the owner may invite
    let invites = format!("/api/playlists/{id}/invites");
    let (status, _) = app.post(&invites, "mallory", json!({ "userId": "mallory" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post(&invites, "alice", json!({ "userId": "bob" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Idempotent
    let (status, _) = app.post(&invites, "alice", json!({ "userId": "bob" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/playlists/{id}"), "bob").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invited_only_edit_mode() {
    let app = TestApp::new().await;
    let id = app
        .create_playlist("alice", json!({ "name": "Club", "editMode": "invitedOnly" }))
        .await;
    let a = app.add_track(&id, "alice", "A").await;
    let tracks = format!("/api/playlists/{id}/tracks");
    let song = json!({ "title": "B", "artist": "Artist" });

    // Viewers may vote but not edit
    let (status, _) = app.post(&tracks, "guest", song.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .post(&format!("/api/playlists/{id}/next"), "guest", json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .post(&format!("/api/playlists/{id}/tracks/{a}/vote"), "guest", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    app.post(&format!("/api/playlists/{id}/invites"), "alice", json!({ "userId": "guest" }))
        .await;

    let (status, _) = app.post(&tracks, "guest", song).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_mutations_publish_events_after_commit() {
    let app = TestApp::new().await;
    let mut rx = app.state.events.subscribe();
    let id = app.create_playlist("alice", public_playlist()).await;

    let a = app.add_track(&id, "alice", "A").await;
    let event = rx.recv().await.unwrap();
    assert_eq!(event.name(), "track.added");
    assert_eq!(event.playlist_id().as_str(), id);

    app.post(&format!("/api/playlists/{id}/tracks/{a}/vote"), "bob", json!({}))
        .await;
    assert_eq!(rx.recv().await.unwrap().name(), "track.updated");
    assert_eq!(rx.recv().await.unwrap().name(), "playlist.reordered");

    app.post(&format!("/api/playlists/{id}/next"), "alice", json!({}))
        .await;
    assert_eq!(rx.recv().await.unwrap().name(), "player.state_changed");

    // Deleting the playing track also reports the stop
    app.send(
        Method::DELETE,
        &format!("/api/playlists/{id}/tracks/{a}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(rx.recv().await.unwrap().name(), "track.deleted");
    let stopped = serde_json::to_value(rx.recv().await.unwrap()).unwrap();
    assert_eq!(stopped["type"], "player.state_changed");
    assert_eq!(stopped["payload"]["status"], "stopped");

    // Rejected requests publish nothing
    app.send(
        Method::PATCH,
        &format!("/api/playlists/{id}/tracks/ghost"),
        Some("alice"),
        Some(json!({ "newPosition": -3 })),
    )
    .await;
    assert!(rx.try_recv().is_err());
}
