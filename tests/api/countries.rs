use crate::helpers;
use crate::helpers::TestApp;
use serde_json::Value;

#[tokio::test]
async fn countries_are_listed_with_their_languages() {
    // Arrange
    let app = TestApp::spawn_app().await;

    // Act
    let response = app.get_countries().await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let countries = body["countries"].as_array().unwrap();
    let ivory_coast = countries
        .iter()
        .find(|c| c["name"] == "Ivory Coast")
        .expect("Ivory Coast is missing");
    assert_eq!(ivory_coast["code"], "CI");
    assert_eq!(ivory_coast["languages"].as_array().unwrap().len(), 2);
    let bahrain = countries.iter().find(|c| c["code"] == "BH").unwrap();
    assert!(bahrain["languages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l["direction"] == "rtl"));
}

#[tokio::test]
async fn the_home_page_lists_every_country() {
    let app = TestApp::spawn_app().await;

    let html_page = app.get_home_html().await;

    assert!(html_page.contains(">Ivory Coast</option>"));
    assert!(html_page.contains(">Bahrain</option>"));
    assert!(html_page.contains("Mailchimp credentials are missing."));
}

#[tokio::test]
async fn selecting_an_unknown_country_is_rejected() {
    let app = TestApp::spawn_app().await;

    let response = app.post_select_country("Atlantis").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        helpers::error_message(response).await,
        "Country 'Atlantis' is not supported."
    );
}

#[tokio::test]
async fn selecting_no_country_is_a_bad_request() {
    let app = TestApp::spawn_app().await;

    let response = app.post_select_country("  ").await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn build_page_without_a_country_redirects_home_with_a_flash_message() {
    // Arrange
    let app = TestApp::spawn_app().await;

    // Act - Part 1 - Open the form directly
    let response = app.get_build_newsletter().await;

    // Assert
    helpers::assert_is_redirect_to(&response, "/");

    // Act - Part 2 - Follow the redirect
    let html_page = app.get_home_html().await;
    assert!(html_page.contains("<p><i>No country selected. Please select a country first.</i></p>"));

    // Act - Part 3 - Reload the home page
    let html_page = app.get_home_html().await;
    assert!(!html_page.contains("No country selected"));
}

#[tokio::test]
async fn the_selected_country_is_kept_in_the_session() {
    // Arrange
    let app = TestApp::spawn_app().await;

    // Act
    let response = app.post_select_country("ci").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let page = app.get_build_newsletter().await;

    // Assert
    assert_eq!(body["country"], "Ivory Coast");
    assert_eq!(body["redirect"], "/build-newsletter");
    assert_eq!(page.status().as_u16(), 200);
    let html_page = page.text().await.unwrap();
    assert!(html_page.contains("Build newsletter: Ivory Coast"));
    assert!(html_page.contains(r#"value="fr""#));
}
