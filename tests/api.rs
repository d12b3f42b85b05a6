mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{login, register, server, Bearer, PASSWORD};

#[tokio::test]
async fn room_lifecycle_scenario() {
    let server = server().await;

    let alice = register(&server, "alice").await;
    assert_eq!(alice["username"], "alice");

    let duplicate = server
        .post("/api/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = duplicate.json();
    assert!(body["fields"]["username"].is_array());

    let wrong = server
        .post("/api/login")
        .json(&json!({ "username": "alice", "password": "not it" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let login_body: Value = server
        .post("/api/login")
        .json(&json!({ "username": "alice", "password": PASSWORD }))
        .await
        .json();
    let alice_token = login_body["tokens"]["access"].as_str().unwrap().to_owned();
    let (bob_token, _) = login(&server, "bob").await;

    let created = server
        .post("/api/createroom")
        .bearer(&alice_token)
        .json(&json!({ "name": "Chess Club", "description": "talk chess" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let room: Value = created.json();
    assert_eq!(room["host"]["username"], "alice");
    assert_eq!(room["name"], "Chess Club");
    let room_url = format!("/api/room/{}", room["id"].as_str().unwrap());

    let posted = server
        .post(&room_url)
        .bearer(&bob_token)
        .json(&json!({ "body": "hi" }))
        .await;
    assert_eq!(posted.status_code(), StatusCode::CREATED);
    let message: Value = posted.json();
    assert_eq!(message["body"], "hi");
    assert_eq!(message["user"]["username"], "bob");

    let detail: Value = server.get(&room_url).await.json();
    let participants: Vec<&str> = detail["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(participants, ["bob"]);
    assert_eq!(detail["messages"][0]["body"], "hi");

    let denied = server.delete(&room_url).bearer(&bob_token).await;
    assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);

    let deleted = server.delete(&room_url).bearer(&alice_token).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let gone = server.get(&room_url).await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    let body: Value = gone.json();
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn protected_requires_a_valid_access_token() {
    let server = server().await;
    let (access, refresh) = login(&server, "alice").await;

    let anonymous = server.get("/api/protected").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let garbage = server.get("/api/protected").bearer("not.a.token").await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let with_refresh = server.get("/api/protected").bearer(&refresh).await;
    assert_eq!(with_refresh.status_code(), StatusCode::UNAUTHORIZED);

    let ok = server.get("/api/protected").bearer(&access).await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    let body: Value = ok.json();
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let server = server().await;
    let (_, refresh) = login(&server, "alice").await;

    let refreshed = server
        .post("/api/token/refresh")
        .json(&json!({ "refresh": refresh }))
        .await;
    assert_eq!(refreshed.status_code(), StatusCode::OK);
    let access: Value = refreshed.json();
    let access = access["access"].as_str().unwrap().to_owned();
    assert_eq!(server.get("/api/protected").bearer(&access).await.status_code(), StatusCode::OK);

    let missing = server.post("/api/logout").json(&json!({})).await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

    let out = server.post("/api/logout").json(&json!({ "refresh": refresh })).await;
    assert_eq!(out.status_code(), StatusCode::OK);

    let again = server.post("/api/logout").json(&json!({ "refresh": refresh })).await;
    assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);

    let stale = server
        .post("/api/token/refresh")
        .json(&json!({ "refresh": refresh }))
        .await;
    assert_eq!(stale.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn room_validation_and_ownership() {
    let server = server().await;
    let (alice, _) = login(&server, "alice").await;
    let (bob, _) = login(&server, "bob").await;

    let unnamed = server.post("/api/createroom").bearer(&alice).json(&json!({})).await;
    assert_eq!(unnamed.status_code(), StatusCode::BAD_REQUEST);

    let anonymous = server.post("/api/createroom").json(&json!({ "name": "x" })).await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let room: Value = server
        .post("/api/createroom")
        .bearer(&alice)
        .json(&json!({ "name": "Chess Club", "topic": "Games" }))
        .await
        .json();
    let room_url = format!("/api/room/{}", room["id"].as_str().unwrap());
    assert_eq!(room["topic"], "Games");

    let hijack = server
        .put(&room_url)
        .bearer(&bob)
        .json(&json!({ "name": "" }))
        .await;
    assert_eq!(hijack.status_code(), StatusCode::FORBIDDEN);

    let renamed = server
        .put(&room_url)
        .bearer(&alice)
        .json(&json!({ "name": "Chess Club 2", "description": "openings" }))
        .await;
    assert_eq!(renamed.status_code(), StatusCode::OK);
    let renamed: Value = renamed.json();
    assert_eq!(renamed["name"], "Chess Club 2");
    assert_eq!(renamed["topic"], Value::Null);

    let no_body = server.post(&room_url).bearer(&bob).json(&json!({})).await;
    assert_eq!(no_body.status_code(), StatusCode::BAD_REQUEST);

    let missing_room = server
        .post("/api/room/01890a5d-ac96-774b-bcce-b302099a8057")
        .bearer(&bob)
        .json(&json!({ "body": "hello?" }))
        .await;
    assert_eq!(missing_room.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_deletes_a_message() {
    let server = server().await;
    let (alice, _) = login(&server, "alice").await;
    let (bob, _) = login(&server, "bob").await;

    let room: Value = server
        .post("/api/createroom")
        .bearer(&alice)
        .json(&json!({ "name": "Chess Club" }))
        .await
        .json();
    let message: Value = server
        .post(&format!("/api/room/{}", room["id"].as_str().unwrap()))
        .bearer(&bob)
        .json(&json!({ "body": "e4" }))
        .await
        .json();
    let message_url = format!("/api/message/{}", message["id"].as_str().unwrap());

    assert_eq!(server.delete(&message_url).bearer(&alice).await.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(server.delete(&message_url).bearer(&bob).await.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(server.delete(&message_url).bearer(&bob).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn browsing_endpoints() {
    let server = server().await;
    let (alice, _) = login(&server, "alice").await;

    for (name, topic) in [("Chess Club", "Games"), ("Book Nook", "Literature")] {
        let room: Value = server
            .post("/api/createroom")
            .bearer(&alice)
            .json(&json!({ "name": name, "topic": topic }))
            .await
            .json();
        server
            .post(&format!("/api/room/{}", room["id"].as_str().unwrap()))
            .bearer(&alice)
            .json(&json!({ "body": format!("welcome to {name}") }))
            .await;
    }

    let rooms: Value = server.get("/api/rooms").add_query_param("q", "CHESS").await.json();
    assert_eq!(rooms.as_array().unwrap().len(), 1);
    assert_eq!(rooms[0]["name"], "Chess Club");

    let topics: Value = server.get("/api/topics").add_query_param("q", "lit").await.json();
    assert_eq!(topics[0]["name"], "Literature");
    assert_eq!(topics[0]["room_count"], 1);

    let activity: Value = server.get("/api/activity").await.json();
    assert_eq!(activity[0]["body"], "welcome to Book Nook");
    assert_eq!(activity[1]["body"], "welcome to Chess Club");

    let me: Value = server.get("/api/protected").bearer(&alice).await.json();
    let profile: Value = server
        .get(&format!("/api/user/{}", me["user"]["id"].as_str().unwrap()))
        .await
        .json();
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["rooms"].as_array().unwrap().len(), 2);
    assert_eq!(profile["messages"].as_array().unwrap().len(), 2);
    assert_eq!(profile["topics"].as_array().unwrap().len(), 2);

    let nobody = server.get("/api/user/01890a5d-ac96-774b-bcce-b302099a8057").await;
    assert_eq!(nobody.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fixtures_are_served_per_sport() {
    let server = server().await;

    let football: Value = server.get("/api/fixtures/football").await.json();
    assert_eq!(football.as_array().unwrap().len(), 10);
    assert_eq!(football[0]["home"], "Manchester United");
    assert_eq!(football[0]["draw_odd"], 3.0);

    let unknown = server.get("/api/fixtures/cricket").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_use_the_error_body() {
    let server = server().await;
    let (alice, _) = login(&server, "alice").await;

    let room: Value = server
        .post("/api/createroom")
        .bearer(&alice)
        .json(&json!({ "name": "Chess Club" }))
        .await
        .json();
    let room_url = format!("/api/room/{}", room["id"].as_str().unwrap());

    let wrong_type = server.post(&room_url).bearer(&alice).json(&json!({ "body": 5 })).await;
    assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = wrong_type.json();
    assert_eq!(body["status"], 400);
    assert!(body["fields"]["non_field_errors"].is_array());

    let numeric_name = server.post("/api/register").json(&json!({ "username": 7 })).await;
    assert_eq!(numeric_name.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = numeric_name.json();
    assert_eq!(body["status"], 400);

    let not_json = server.post("/api/createroom").bearer(&alice).text("name=Chess").await;
    assert_eq!(not_json.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = not_json.json();
    assert_eq!(body["error"], "invalid input");

    for url in ["/api/room/not-a-uuid", "/api/user/42"] {
        let response = server.get(url).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["status"], 404);
    }

    let bad_id = server.delete("/api/message/nope").bearer(&alice).await;
    assert_eq!(bad_id.status_code(), StatusCode::NOT_FOUND);
}
