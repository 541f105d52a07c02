use crate::helpers;
use crate::helpers::{TestApp, API_KEY, SERVER_PREFIX};
use serde_json::{json, Value};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn credentials_are_missing_until_saved() {
    // Arrange
    let app = TestApp::spawn_app().await;
    assert_eq!(app.get_check_credentials().await["hasCredentials"], false);

    // Act
    app.save_valid_credentials().await;

    // Assert
    assert_eq!(app.get_check_credentials().await["hasCredentials"], true);
    let saved = std::fs::read_to_string(&app.credentials_path).unwrap();
    assert!(saved.contains(&format!("MAILCHIMP_API_KEY={}", API_KEY)));
    assert!(saved.contains(&format!("MAILCHIMP_SERVER_PREFIX={}", SERVER_PREFIX)));
    assert!(app.get_home_html().await.contains("Mailchimp credentials are configured."));
}

#[tokio::test]
async fn saving_preserves_other_settings_in_the_file() {
    let app = TestApp::spawn_app().await;
    std::fs::write(&app.credentials_path, "OTHER_SETTING=keep-me\n").unwrap();

    app.save_valid_credentials().await;

    let saved = std::fs::read_to_string(&app.credentials_path).unwrap();
    assert!(saved.contains("OTHER_SETTING=keep-me"));
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = TestApp::spawn_app().await;
    let test_cases = vec![
        json!({}),
        json!({ "apiKey": API_KEY }),
        json!({ "apiKey": "", "serverPrefix": SERVER_PREFIX }),
    ];

    for body in test_cases {
        let response = app.post_save_credentials(&body).await;

        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(
            helpers::error_message(response).await,
            "API key and server prefix are required."
        );
    }
    assert_eq!(app.get_check_credentials().await["hasCredentials"], false);
}

#[tokio::test]
async fn malformed_credentials_are_rejected_with_details() {
    let app = TestApp::spawn_app().await;

    let response = app
        .post_save_credentials(&json!({
            "api_key": API_KEY,
            "server_prefix": "us6",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Credential validation failed");
    assert_eq!(
        body["details"],
        json!(["API key server suffix 'us21' does not match server prefix 'us6'"])
    );
}

#[tokio::test]
async fn a_successful_connection_test_returns_the_account() {
    // Arrange
    let app = TestApp::spawn_app().await;
    Mock::given(path("/"))
        .and(method("GET"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": "abc123",
            "account_name": "HRF",
            "email": "team@hrf.org"
        })))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    // Act
    let response = app
        .post_test_connection(&json!({ "apiKey": API_KEY, "serverPrefix": SERVER_PREFIX }))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["account"]["accountName"], "HRF");
}

#[tokio::test]
async fn a_rejected_api_key_is_an_authentication_error() {
    let app = TestApp::spawn_app().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let response = app
        .post_test_connection(&json!({ "apiKey": API_KEY, "serverPrefix": SERVER_PREFIX }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["errorType"], "authentication");
    assert!(!body["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_credentials_are_not_sent_to_mailchimp() {
    let app = TestApp::spawn_app().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailchimp_server)
        .await;

    let response = app
        .post_test_connection(&json!({ "apiKey": "nope", "serverPrefix": SERVER_PREFIX }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
