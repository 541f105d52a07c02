use crate::helpers;
use crate::helpers::TestApp;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, Request, ResponseTemplate};

const HOSTED_URL: &str = "https://mcusercontent.com/hosted.png";

/// Templates must only reference hosted images.
struct NoLocalImages;

impl wiremock::Match for NoLocalImages {
    fn matches(&self, request: &Request) -> bool {
        let result: Result<Value, _> = serde_json::from_slice(&request.body);
        match result {
            Ok(body) => {
                let html = body["html"].as_str().unwrap_or_default();
                body["name"].as_str().is_some()
                    && html.contains(HOSTED_URL)
                    && !html.contains("../../static")
            }
            Err(_) => false,
        }
    }
}

async fn mount_file_upload(app: &TestApp, expected: u64) {
    Mock::given(path("/file-manager/files"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "full_size_url": HOSTED_URL
        })))
        .expect(expected)
        .mount(&app.mailchimp_server)
        .await;
}

async fn generate(app: &TestApp) {
    app.post_select_country("Ivory Coast").await;
    let response = app
        .post_generate_newsletter(&helpers::newsletter_body())
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn uploading_without_credentials_is_rejected() {
    // Arrange
    let app = TestApp::spawn_app().await;
    generate(&app).await;

    // Act
    let response = app.post_upload_images().await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        helpers::error_message(response).await,
        "Mailchimp credentials not found. Please configure API key and server prefix."
    );
}

#[tokio::test]
async fn uploading_requires_a_selected_country() {
    let app = TestApp::spawn_app().await;
    app.save_valid_credentials().await;

    let response = app.post_upload_newsletter().await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn brand_and_session_images_are_uploaded() {
    // Arrange
    let app = TestApp::spawn_app().await;
    generate(&app).await;
    app.save_valid_credentials().await;
    // logo, hero and one story
    mount_file_upload(&app, 3).await;

    // Act
    let response = app.post_upload_images().await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["images"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn the_first_failed_image_halts_the_upload() {
    let app = TestApp::spawn_app().await;
    generate(&app).await;
    app.save_valid_credentials().await;
    Mock::given(path("/file-manager/files"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let response = app.post_upload_images().await;

    assert_eq!(response.status().as_u16(), 502);
    assert!(helpers::error_message(response)
        .await
        .starts_with("Image upload failed for 'logo.png'."));
}

#[tokio::test]
async fn newsletters_are_uploaded_as_templates_with_hosted_images() {
    // Arrange
    let app = TestApp::spawn_app().await;
    generate(&app).await;
    app.save_valid_credentials().await;
    mount_file_upload(&app, 3).await;
    Mock::given(path("/templates"))
        .and(method("POST"))
        .and(NoLocalImages)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 10, "name": "newsletter" })),
        )
        .expect(2)
        .mount(&app.mailchimp_server)
        .await;

    // Act - images are uploaded first because the session has no mapping yet
    let response = app.post_upload_newsletter().await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["imagesUploaded"], 3);
    assert_eq!(body["templates"].as_array().unwrap().len(), 2);

    let versions = app.output_dir.join("ci").join("mailchimp_versions");
    let processed: Vec<_> = std::fs::read_dir(versions).unwrap().collect();
    assert_eq!(processed.len(), 2);
}

#[tokio::test]
async fn an_earlier_image_upload_is_reused() {
    let app = TestApp::spawn_app().await;
    generate(&app).await;
    app.save_valid_credentials().await;
    mount_file_upload(&app, 3).await;
    Mock::given(path("/templates"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 10, "name": "newsletter" })),
        )
        .expect(2)
        .mount(&app.mailchimp_server)
        .await;

    assert_eq!(app.post_upload_images().await.status().as_u16(), 200);
    let response = app.post_upload_newsletter().await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["imagesUploaded"], 0);
}
