use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn login_issues_token_and_cookie() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let response = app.login("test@prueba.com", "test123").await;

    assert_eq!(response.status().as_u16(), 200);

    let set_cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("login should set the access-token cookie")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("__Host-access_token="));
    assert!(set_cookie.contains("HttpOnly"));

    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn login_wrong_password_reports_fixed_failure() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let response = app.login("test@prueba.com", "wrong").await;

    assert_eq!(response.status().as_u16(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unable to authenticate with provided credentials");
    assert_eq!(body["code"], "authentication");
}

#[tokio::test]
async fn login_unknown_email_reports_fixed_failure() {
    let app = TestApp::new().await;

    let response = app.login("nobody@prueba.com", "test123").await;

    assert_eq!(response.status().as_u16(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unable to authenticate with provided credentials");
    assert_eq!(body["code"], "authentication");
}

#[tokio::test]
async fn login_password_whitespace_is_significant() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", " test123 ").await;

    assert_eq!(app.login("test@prueba.com", "test123").await.status(), 401);
    assert_eq!(app.login("test@prueba.com", " test123 ").await.status(), 200);
}

#[tokio::test]
async fn me_with_bearer_token() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let login_body: Value = app
        .login("test@prueba.com", "test123")
        .await
        .json()
        .await
        .unwrap();
    let token = login_body["token"].as_str().unwrap();

    let response = app.get("/me").bearer_auth(token).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "test@prueba.com");
}

#[tokio::test]
async fn me_with_session_cookie() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let login_body: Value = app
        .login("test@prueba.com", "test123")
        .await
        .json()
        .await
        .unwrap();
    let token = login_body["token"].as_str().unwrap();

    let response = app
        .get("/me")
        .header(
            reqwest::header::COOKIE,
            format!("__Host-access_token={token}"),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn me_without_token() {
    let app = TestApp::new().await;

    let response = app.get("/me").send().await.unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn me_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app
        .get("/me")
        .bearer_auth("invalid.token.here")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn update_me_rotates_password() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let login_body: Value = app
        .login("test@prueba.com", "test123")
        .await
        .json()
        .await
        .unwrap();
    let token = login_body["token"].as_str().unwrap();

    let response = app
        .patch("/me")
        .bearer_auth(token)
        .json(&json!({ "name": "New Name", "password": "newpass456" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "New Name");

    assert_eq!(app.login("test@prueba.com", "test123").await.status(), 401);
    assert_eq!(
        app.login("test@prueba.com", "newpass456").await.status(),
        200
    );
}

#[tokio::test]
async fn update_me_without_password_keeps_credentials() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let login_body: Value = app
        .login("test@prueba.com", "test123")
        .await
        .json()
        .await
        .unwrap();
    let token = login_body["token"].as_str().unwrap();

    let response = app
        .patch("/me")
        .bearer_auth(token)
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.login("test@prueba.com", "test123").await.status(), 200);
}

#[tokio::test]
async fn verify_token_roundtrip() {
    let app = TestApp::new().await;
    app.signup("test@prueba.com", "test123").await;

    let login_body: Value = app
        .login("test@prueba.com", "test123")
        .await
        .json()
        .await
        .unwrap();
    let token = login_body["token"].as_str().unwrap();

    let response = app
        .post("/verify-token")
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn verify_token_rejects_invalid() {
    let app = TestApp::new().await;

    let response = app
        .post("/verify-token")
        .json(&json!({ "token": "invalid.token.here" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid token");
}
