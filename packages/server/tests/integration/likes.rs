use serde_json::json;

use crate::common::{TestApp, routes};

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array()
        .expect("list body should be a bare array")
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn user_can_like_another_user_once() {
    let app = TestApp::spawn().await;
    let alice = app.create_user("alice", "female").await;
    let bob = app.create_user("bob", "male").await;

    let first = app
        .post_with_token(&routes::like(alice.id, bob.id), &json!({}), &alice.token)
        .await;
    assert_eq!(first.status, 200, "{}", first.text);

    let second = app
        .post_with_token(&routes::like(alice.id, bob.id), &json!({}), &alice.token)
        .await;
    assert_eq!(second.status, 409);
    assert_eq!(second.body["code"], "CONFLICT");
}

#[tokio::test]
async fn liking_a_missing_user_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app.create_user("alice", "female").await;

    let res = app
        .post_with_token(&routes::like(alice.id, 9999), &json!({}), &alice.token)
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn cannot_like_on_behalf_of_someone_else() {
    let app = TestApp::spawn().await;
    let alice = app.create_user("alice", "female").await;
    let bob = app.create_user("bob", "male").await;

    let res = app
        .post_with_token(&routes::like(bob.id, alice.id), &json!({}), &alice.token)
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn likes_are_directional() {
    let app = TestApp::spawn().await;
    let alice = app.create_user("alice", "female").await;
    let bob = app.create_user("bob", "male").await;

    let res = app
        .post_with_token(&routes::like(alice.id, bob.id), &json!({}), &alice.token)
        .await;
    assert_eq!(res.status, 200);

    // Bob liking Alice back is a separate edge.
    let res = app
        .post_with_token(&routes::like(bob.id, alice.id), &json!({}), &bob.token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
}

#[tokio::test]
async fn list_filters_by_likers_and_likees() {
    let app = TestApp::spawn().await;
    let me = app.create_user("viewer", "male").await;
    let admirer = app.create_user("admirer", "female").await;
    let crush = app.create_user("crush", "female").await;
    app.create_user("stranger", "female").await;

    let res = app
        .post_with_token(&routes::like(admirer.id, me.id), &json!({}), &admirer.token)
        .await;
    assert_eq!(res.status, 200);
    let res = app
        .post_with_token(&routes::like(me.id, crush.id), &json!({}), &me.token)
        .await;
    assert_eq!(res.status, 200);

    let likers = app
        .get_with_token(&format!("{}?likes=likers", routes::USERS), &me.token)
        .await;
    assert_eq!(likers.status, 200, "{}", likers.text);
    assert_eq!(ids(&likers.body), vec![admirer.id as i64]);
    assert_eq!(likers.pagination()["totalItems"], 1);

    let likees = app
        .get_with_token(&format!("{}?likes=likees", routes::USERS), &me.token)
        .await;
    assert_eq!(ids(&likees.body), vec![crush.id as i64]);

    let everyone = app.get_with_token(routes::USERS, &me.token).await;
    assert_eq!(ids(&everyone.body).len(), 3);
}
