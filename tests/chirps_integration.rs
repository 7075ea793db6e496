mod common;

use common::spawn_app;
use serde_json::{json, Value};

async fn create_chirp(app: &common::TestApp, token: &str, body: &str) -> reqwest::Response {
    app.client
        .post(app.url("/api/chirps"))
        .bearer_auth(token)
        .json(&json!({ "body": body }))
        .send()
        .await
        .expect("Failed to execute request.")
}

#[tokio::test]
async fn create_chirp_requires_authentication() {
    let app = spawn_app();

    let response = app.post_json("/api/chirps", &json!({ "body": "hello" })).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn create_chirp_returns_201_owned_by_caller() {
    let app = spawn_app();
    let user = app.register_and_login("john@example.com").await;

    let response = create_chirp(&app, &user.token, "Hello, world!").await;

    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["body"], "Hello, world!");
    assert_eq!(body["user_id"], user.id.as_str());
}

#[tokio::test]
async fn create_chirp_rejects_invalid_bodies() {
    let app = spawn_app();
    let user = app.register_and_login("john@example.com").await;

    let too_long = create_chirp(&app, &user.token, &"a".repeat(141)).await;
    let blank = create_chirp(&app, &user.token, "   ").await;

    assert_eq!(400, too_long.status().as_u16());
    assert_eq!(400, blank.status().as_u16());
}

#[tokio::test]
async fn list_chirps_filters_by_author_and_sorts() {
    let app = spawn_app();
    let alice = app.register_and_login("alice@example.com").await;
    let bob = app.register_and_login("bob@example.com").await;

    create_chirp(&app, &alice.token, "first").await;
    create_chirp(&app, &bob.token, "second").await;
    create_chirp(&app, &alice.token, "third").await;

    let all: Vec<Value> = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bodies: Vec<&str> = all.iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);

    let alice_desc: Vec<Value> = app
        .client
        .get(app.url(&format!("/api/chirps?author_id={}&sort=desc", alice.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bodies: Vec<&str> = alice_desc.iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(bodies, vec!["third", "first"]);
}

#[tokio::test]
async fn list_chirps_treats_empty_author_id_as_no_filter() {
    let app = spawn_app();
    let alice = app.register_and_login("alice@example.com").await;
    let bob = app.register_and_login("bob@example.com").await;
    create_chirp(&app, &alice.token, "from alice").await;
    create_chirp(&app, &bob.token, "from bob").await;

    let response = app
        .client
        .get(app.url("/api/chirps?author_id="))
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    let chirps: Vec<Value> = response.json().await.unwrap();
    assert_eq!(chirps.len(), 2);
}

#[tokio::test]
async fn list_chirps_rejects_malformed_author_id() {
    let app = spawn_app();

    let response = app
        .client
        .get(app.url("/api/chirps?author_id=not-a-uuid"))
        .send()
        .await
        .unwrap();

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn get_chirp_returns_404_for_unknown_id() {
    let app = spawn_app();

    let response = app
        .client
        .get(app.url(&format!("/api/chirps/{}", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn only_the_author_can_delete_a_chirp() {
    let app = spawn_app();
    let alice = app.register_and_login("alice@example.com").await;
    let bob = app.register_and_login("bob@example.com").await;

    let chirp: Value = create_chirp(&app, &alice.token, "mine").await.json().await.unwrap();
    let chirp_url = app.url(&format!("/api/chirps/{}", chirp["id"].as_str().unwrap()));

    let unauthenticated = app.client.delete(&chirp_url).send().await.unwrap();
    assert_eq!(401, unauthenticated.status().as_u16());

    let by_bob = app.client.delete(&chirp_url).bearer_auth(&bob.token).send().await.unwrap();
    assert_eq!(403, by_bob.status().as_u16());

    let by_alice = app.client.delete(&chirp_url).bearer_auth(&alice.token).send().await.unwrap();
    assert_eq!(204, by_alice.status().as_u16());

    let fetch = app.client.get(&chirp_url).send().await.unwrap();
    assert_eq!(404, fetch.status().as_u16());

    let again = app.client.delete(&chirp_url).bearer_auth(&alice.token).send().await.unwrap();
    assert_eq!(404, again.status().as_u16());
}
