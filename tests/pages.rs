mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use tower_sessions::cookie::Cookie;
use serde_json::{json, Value};

use common::{login, register, server, Bearer, PASSWORD};

/// Logs in through the form and returns the session cookie.
async fn page_login(server: &TestServer, username: &str) -> Cookie<'static> {
    let response = server
        .post("/login")
        .form(&[("username", username), ("password", PASSWORD)])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    response.cookie("id")
}

/// Creates a room over the JSON surface and returns its id.
async fn api_room(server: &TestServer, token: &str, name: &str, topic: &str) -> String {
    let room: Value = server
        .post("/api/createroom")
        .bearer(token)
        .json(&json!({ "name": name, "topic": topic }))
        .await
        .json();
    room["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn anonymous_visitors_are_sent_to_login() {
    let server = server().await;

    let response = server.get("/create_room").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login?return_url=%2Fcreate_room");

    let home = server.get("/").await;
    assert_eq!(home.status_code(), StatusCode::OK);
    assert!(home.text().contains("Login"));
}

#[tokio::test]
async fn login_returns_to_the_requested_page() {
    let server = server().await;
    register(&server, "alice").await;

    let login_page = server.get("/login").add_query_param("return_url", "/create_room").await;
    assert_eq!(login_page.status_code(), StatusCode::OK);
    let session = login_page.cookie("id");

    let response = server
        .post("/login")
        .add_cookie(session)
        .form(&[("username", "Alice"), ("password", PASSWORD)])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/create_room");

    let form = server.get("/create_room").add_cookie(response.cookie("id")).await;
    assert_eq!(form.status_code(), StatusCode::OK);
    assert!(form.text().contains("Create room"));
    assert!(form.text().contains("@alice"));
}

#[tokio::test]
async fn failed_login_is_flashed() {
    let server = server().await;
    register(&server, "alice").await;

    let response = server
        .post("/login")
        .form(&[("username", "alice"), ("password", "nope")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");

    let page = server.get("/login").add_cookie(response.cookie("id")).await;
    assert!(page.text().contains("Username or password does not exist."));
}

#[tokio::test]
async fn sign_up_then_create_and_view_a_room() {
    let server = server().await;

    let signed_up = server
        .post("/sign_up")
        .form(&[
            ("username", "carol"),
            ("email", "carol@example.com"),
            ("password", PASSWORD),
            ("confirm_password", PASSWORD),
        ])
        .await;
    assert_eq!(signed_up.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(signed_up.header("location"), "/login");

    let session = page_login(&server, "carol").await;

    let created = server
        .post("/create_room")
        .add_cookie(session.clone())
        .form(&[("name", "Chess <Club>"), ("description", "talk chess"), ("topic", "Games")])
        .await;
    assert_eq!(created.status_code(), StatusCode::SEE_OTHER);

    let home = server.get("/").add_query_param("q", "chess").await;
    let html = home.text();
    assert!(html.contains("Chess &lt;Club&gt;"));
    assert!(!html.contains("<Club>"));
    assert!(html.contains("1 rooms available"));
    assert!(html.contains("Games"));
}

#[tokio::test]
async fn mismatched_sign_up_shows_errors() {
    let server = server().await;

    let response = server
        .post("/sign_up")
        .form(&[
            ("username", "dave"),
            ("password", PASSWORD),
            ("confirm_password", "different"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Password fields didn&#39;t match."));
}

#[tokio::test]
async fn strangers_get_access_denied() {
    let server = server().await;
    let (alice, _) = login(&server, "alice").await;
    register(&server, "bob").await;

    let room: Value = server
        .post("/api/createroom")
        .bearer(&alice)
        .json(&json!({ "name": "Chess Club" }))
        .await
        .json();
    let room_id = room["id"].as_str().unwrap();

    let bob = page_login(&server, "bob").await;

    let edit = server.get(&format!("/edit_room/{room_id}")).add_cookie(bob.clone()).await;
    assert_eq!(edit.status_code(), StatusCode::FORBIDDEN);
    assert!(edit.text().contains("Access Denied"));

    let delete = server.post(&format!("/delete_room/{room_id}")).add_cookie(bob.clone()).await;
    assert_eq!(delete.status_code(), StatusCode::FORBIDDEN);

    let missing = server
        .get("/room/01890a5d-ac96-774b-bcce-b302099a8057")
        .add_cookie(bob.clone())
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let posted = server
        .post(&format!("/room/{room_id}"))
        .add_cookie(bob.clone())
        .form(&[("body", "**hello** <b>there</b>")])
        .await;
    assert_eq!(posted.status_code(), StatusCode::SEE_OTHER);

    let room_page = server.get(&format!("/room/{room_id}")).add_cookie(bob).await;
    let html = room_page.text();
    assert!(html.contains("<strong>hello</strong>"));
    assert!(html.contains("&lt;b&gt;"));
    assert!(html.contains("Participants (1)"));
}

#[tokio::test]
async fn fixture_pages_list_every_game() {
    let server = server().await;

    let football = server.get("/football").await;
    assert_eq!(football.status_code(), StatusCode::OK);
    let html = football.text();
    assert!(html.contains("Manchester United"));
    assert!(html.contains("Leeds"));

    let nfl = server.get("/nfl").await.text();
    assert!(nfl.contains("NFL fixtures"));
    assert!(nfl.contains("Kansas City Chiefs"));
}

#[tokio::test]
async fn host_edits_then_deletes_a_room() {
    let server = server().await;
    let (token, _) = login(&server, "alice").await;
    let alice = page_login(&server, "alice").await;
    let room_id = api_room(&server, &token, "Chess Club", "Games").await;

    let form = server.get(&format!("/edit_room/{room_id}")).add_cookie(alice.clone()).await;
    assert_eq!(form.status_code(), StatusCode::OK);
    assert!(form.text().contains(r#"value="Chess Club""#));

    let edited = server
        .post(&format!("/edit_room/{room_id}"))
        .add_cookie(alice.clone())
        .form(&[("name", "Chess Club 2"), ("description", "openings only"), ("topic", "Strategy")])
        .await;
    assert_eq!(edited.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(edited.header("location"), format!("/room/{room_id}"));

    let room = server.get(&format!("/room/{room_id}")).add_cookie(alice.clone()).await.text();
    assert!(room.contains("Chess Club 2"));
    assert!(room.contains("openings only"));
    assert!(room.contains("Strategy"));

    let confirm = server.get(&format!("/delete_room/{room_id}")).add_cookie(alice.clone()).await;
    assert_eq!(confirm.status_code(), StatusCode::OK);
    assert!(confirm.text().contains(r#"Are you sure you want to delete "Chess Club 2"?"#));

    let deleted = server.post(&format!("/delete_room/{room_id}")).add_cookie(alice.clone()).await;
    assert_eq!(deleted.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(deleted.header("location"), "/");

    let home = server.get("/").add_cookie(alice.clone()).await.text();
    assert!(home.contains("Room deleted."));
    assert!(home.contains("0 rooms available"));

    let gone = server.get(&format!("/room/{room_id}")).add_cookie(alice).await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_deletes_a_message_from_the_room_page() {
    let server = server().await;
    let (token, _) = login(&server, "alice").await;
    register(&server, "bob").await;
    let alice = page_login(&server, "alice").await;
    let bob = page_login(&server, "bob").await;
    let room_id = api_room(&server, &token, "Chess Club", "Games").await;

    let posted = server
        .post(&format!("/room/{room_id}"))
        .add_cookie(bob.clone())
        .form(&[("body", "good game")])
        .await;
    assert_eq!(posted.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(posted.header("location"), format!("/room/{room_id}"));

    let detail: Value = server.get(&format!("/api/room/{room_id}")).await.json();
    let message_id = detail["messages"][0]["id"].as_str().unwrap().to_owned();

    let room = server.get(&format!("/room/{room_id}")).add_cookie(bob.clone()).await.text();
    assert!(room.contains(&format!("/delete_message/{message_id}")));

    let stranger = server.post(&format!("/delete_message/{message_id}")).add_cookie(alice).await;
    assert_eq!(stranger.status_code(), StatusCode::FORBIDDEN);

    let confirm = server.get(&format!("/delete_message/{message_id}")).add_cookie(bob.clone()).await;
    assert!(confirm.text().contains("good game"));

    let deleted = server.post(&format!("/delete_message/{message_id}")).add_cookie(bob.clone()).await;
    assert_eq!(deleted.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(deleted.header("location"), format!("/room/{room_id}"));

    let room = server.get(&format!("/room/{room_id}")).add_cookie(bob).await.text();
    assert!(!room.contains("good game"));
}

#[tokio::test]
async fn profile_updates_redirect_or_show_errors() {
    let server = server().await;
    register(&server, "alice").await;
    let bob_account = register(&server, "bob").await;
    let bob_id = bob_account["id"].as_str().unwrap();
    let bob = page_login(&server, "bob").await;

    let form = server.get("/update_user").add_cookie(bob.clone()).await;
    assert_eq!(form.status_code(), StatusCode::OK);
    assert!(form.text().contains(r#"value="bob""#));

    let taken = server
        .post("/update_user")
        .add_cookie(bob.clone())
        .form(&[("username", "alice"), ("email", "bob@example.com")])
        .await;
    assert_eq!(taken.status_code(), StatusCode::OK);
    assert!(taken.text().contains("A user with that username already exists."));

    let renamed = server
        .post("/update_user")
        .add_cookie(bob.clone())
        .form(&[("username", "robert"), ("email", "robert@example.com")])
        .await;
    assert_eq!(renamed.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(renamed.header("location"), format!("/user_profile/{bob_id}"));

    let profile = server.get(&format!("/user_profile/{bob_id}")).await.text();
    assert!(profile.contains("@robert"));
}

#[tokio::test]
async fn topics_and_activity_pages_filter_by_query() {
    let server = server().await;
    let (token, _) = login(&server, "alice").await;

    for (name, topic) in [("Chess Club", "Games"), ("Book Nook", "Literature")] {
        let room_id = api_room(&server, &token, name, topic).await;
        server
            .post(&format!("/api/room/{room_id}"))
            .bearer(&token)
            .json(&json!({ "body": format!("welcome to {name}") }))
            .await;
    }

    let topics = server.get("/topics").add_query_param("q", "lit").await;
    assert_eq!(topics.status_code(), StatusCode::OK);
    let html = topics.text();
    assert!(html.contains("Literature"));
    assert!(!html.contains("Games"));

    let activity = server.get("/activity").await.text();
    assert!(activity.contains("welcome to Chess Club"));
    assert!(activity.contains("welcome to Book Nook"));

    let filtered = server.get("/activity").add_query_param("q", "chess").await.text();
    assert!(filtered.contains("welcome to Chess Club"));
    assert!(!filtered.contains("welcome to Book Nook"));
}

#[tokio::test]
async fn unparseable_ids_show_the_missing_page() {
    let server = server().await;
    register(&server, "alice").await;
    let alice = page_login(&server, "alice").await;

    let room = server.get("/room/not-a-uuid").add_cookie(alice).await;
    assert_eq!(room.status_code(), StatusCode::NOT_FOUND);
    assert!(room.text().contains("does not exist"));

    let profile = server.get("/user_profile/42").await;
    assert_eq!(profile.status_code(), StatusCode::NOT_FOUND);
}
