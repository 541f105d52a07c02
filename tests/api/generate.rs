use crate::helpers;
use crate::helpers::TestApp;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn generating_without_a_selected_country_is_rejected() {
    // Arrange
    let app = TestApp::spawn_app().await;

    // Act
    let response = app
        .post_generate_newsletter(&helpers::newsletter_body())
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        helpers::error_message(response).await,
        "No country selected. Please select a country first."
    );
}

#[tokio::test]
async fn one_newsletter_is_generated_per_language() {
    // Arrange
    let app = TestApp::spawn_app().await;
    app.post_select_country("Ivory Coast").await;

    // Act
    let response = app
        .post_generate_newsletter(&helpers::newsletter_body())
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["files"].as_array().unwrap().len(), 2);

    let files = app.generated_files("ci");
    assert_eq!(files.len(), 2);
    assert!(files[0].starts_with("newsletter_ci-en_"));
    assert!(files[1].starts_with("newsletter_ci-fr_"));
    for file in &files {
        assert!(file.ends_with(".html"));
        // `newsletter_ci-xx_YYYY-MM-DD_HH-MM-SS.html`
        assert_eq!(file.len(), "newsletter_ci-xx_".len() + 19 + ".html".len());
    }

    let french = std::fs::read_to_string(app.output_dir.join("ci").join(&files[1])).unwrap();
    assert!(french.contains(r#"<html lang="fr" dir="ltr">"#));
    assert!(french.contains("../../static/images/user-images/"));
}

#[tokio::test]
async fn the_language_selection_limits_the_output() {
    let app = TestApp::spawn_app().await;
    app.post_select_country("Bahrain").await;
    let mut body = helpers::newsletter_body();
    body["languages"] = json!(["Arabic"]);

    let response = app.post_generate_newsletter(&body).await;

    assert_eq!(response.status().as_u16(), 200);
    let files = app.generated_files("bh");
    assert_eq!(files.len(), 1);
    let arabic = std::fs::read_to_string(app.output_dir.join("bh").join(&files[0])).unwrap();
    assert!(arabic.contains(r#"<html lang="ar" dir="rtl">"#));
}

#[tokio::test]
async fn an_unknown_language_selection_is_rejected() {
    let app = TestApp::spawn_app().await;
    app.post_select_country("Bahrain").await;
    let mut body = helpers::newsletter_body();
    body["languages"] = json!(["Klingon"]);

    let response = app.post_generate_newsletter(&body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        helpers::error_message(response).await,
        "No valid language selected for Bahrain."
    );
}

#[tokio::test]
async fn images_on_the_server_disk_cannot_be_referenced() {
    // Arrange
    let app = TestApp::spawn_app().await;
    app.save_valid_credentials().await;
    app.post_select_country("Ivory Coast").await;
    let credentials_path = app.credentials_path.display().to_string();

    let test_cases = vec![
        ("hero", "/etc/hostname", "hero.image"),
        ("hero", credentials_path.as_str(), "hero.image"),
        ("story", "../../.env", "stories[1].image"),
    ];

    for (target, image, field) in test_cases {
        let mut body = helpers::newsletter_body();
        match target {
            "hero" => body["hero"]["image"] = json!(image),
            _ => body["stories"][0]["image"] = json!(image),
        }

        // Act
        let response = app.post_generate_newsletter(&body).await;

        // Assert
        assert_eq!(response.status().as_u16(), 400, "for {}", image);
        assert_eq!(
            helpers::error_message(response).await,
            format!("{} must be an http(s) URL or an uploaded image.", field)
        );
    }
    assert!(app.generated_files("ci").is_empty());
    assert!(!app.static_dir.join("images/user-images").exists());
}

#[tokio::test]
async fn a_failed_image_download_aborts_generation() {
    let app = TestApp::spawn_app().await;
    app.post_select_country("Ivory Coast").await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;
    let mut body = helpers::newsletter_body();
    body["hero"]["image"] = json!(format!("{}/missing.jpg", app.mailchimp_server.uri()));

    let response = app.post_generate_newsletter(&body).await;

    assert_eq!(response.status().as_u16(), 502);
    assert!(app.generated_files("ci").is_empty());
}

#[tokio::test]
async fn generate_returns_a_400_when_data_is_invalid() {
    // Arrange
    let app = TestApp::spawn_app().await;
    app.post_select_country("Ivory Coast").await;

    let mut empty_headline = helpers::newsletter_body();
    empty_headline["hero"]["headline"] = json!("");
    let mut bad_link = helpers::newsletter_body();
    bad_link["stories"][0]["url"] = json!("not a link");
    let mut too_many_stories = helpers::newsletter_body();
    let story = too_many_stories["stories"][0].clone();
    too_many_stories["stories"] = json!([story.clone(), story.clone(), story]);
    let mut no_hero_image = helpers::newsletter_body();
    no_hero_image["hero"]["image"] = json!("");

    let test_cases = vec![
        (empty_headline, "hero.headline is empty."),
        (bad_link, "stories[1].url is not a valid http(s) link."),
        (too_many_stories, "At most 2 stories are supported, got 3."),
        (no_hero_image, "hero.image is required."),
    ];

    for (body, message) in test_cases {
        // Act
        let response = app.post_generate_newsletter(&body).await;

        // Assert
        assert_eq!(response.status().as_u16(), 400, "for {}", message);
        assert_eq!(helpers::error_message(response).await, message);
    }
}

#[tokio::test]
async fn malformed_json_gets_a_json_error() {
    let app = TestApp::spawn_app().await;
    app.post_select_country("Ivory Coast").await;

    let response = app
        .api_client
        .post(&format!("{}/api/generate-newsletter", &app.address))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
    assert!(!helpers::error_message(response).await.is_empty());
}
