use crate::helpers::TestApp;

/// `tokio::test` is the testing equivalent of `tokio::main`.
/// It also spares you from having to specify the `#[test]` attribute.
#[tokio::test]
async fn health_check_works() {
    // Arrange
    let app = TestApp::spawn_app().await;

    // Act
    let response = app.get_health_check().await;

    // Assert
    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
