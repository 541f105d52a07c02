use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;
use newsletter_generator::configuration;
use newsletter_generator::startup::Application;
use newsletter_generator::telemetry;

pub const API_KEY: &str = "0123456789abcdef0123456789abcdef-us21";
pub const SERVER_PREFIX: &str = "us21";

/// A one pixel PNG, small enough to skip compression.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        let _ = telemetry::init_subscriber(subscriber);
    } else {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        let _ = telemetry::init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub mailchimp_server: MockServer,
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
    pub credentials_path: PathBuf,
    // Removed with the app
    _root: TempDir,
}

impl TestApp {
    /// Spin up an instance of our application on a random port, with its own
    /// output and static folders and a mock Mailchimp API.
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mailchimp_server = MockServer::start().await;
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let static_dir = root.path().join("static");
        let output_dir = root.path().join("generated_newsletters");
        let credentials_path = root.path().join(".env");
        let brand_dir = static_dir.join("images/brand");
        std::fs::create_dir_all(&brand_dir).expect("Failed to create brand dir");
        std::fs::copy("static/images/brand/logo.png", brand_dir.join("logo.png"))
            .expect("Failed to copy brand logo");

        // Randomise configuration to ensure test isolation
        let config = {
            let mut c = configuration::get_configuration().expect("Failed to read configuration");
            // Use a random OS port
            c.application.port = 0;
            c.generator.static_dir = static_dir.clone();
            c.generator.output_dir = output_dir.clone();
            c.generator.template_dir = None;
            c.mailchimp.credentials_path = credentials_path.clone();
            c.mailchimp.api_base_url = Some(mailchimp_server.uri());
            c.mailchimp.timeout_milliseconds = 2_000;
            c
        };

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");
        let port = application.port();
        let address = format!("http://127.0.0.1:{}", port);
        // Launch the server as a background task
        let _ = tokio::spawn(application.run_until_stopped());

        let api_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .unwrap();

        TestApp {
            address,
            port,
            api_client,
            mailchimp_server,
            static_dir,
            output_dir,
            credentials_path,
            _root: root,
        }
    }

    pub async fn get_health_check(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_home_html(&self) -> String {
        self.api_client
            .get(&format!("{}/", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
            .text()
            .await
            .unwrap()
    }

    pub async fn get_countries(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/countries", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_build_newsletter(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/build-newsletter", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_check_credentials(&self) -> Value {
        self.api_client
            .get(&format!("{}/api/check-credentials", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
            .json()
            .await
            .unwrap()
    }

    pub async fn post_json<Body>(&self, path: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_select_country(&self, country: &str) -> reqwest::Response {
        self.post_json("/api/select-country", &json!({ "country": country }))
            .await
    }

    pub async fn post_generate_newsletter(&self, body: &Value) -> reqwest::Response {
        self.post_json("/api/generate-newsletter", body).await
    }

    pub async fn post_save_credentials(&self, body: &Value) -> reqwest::Response {
        self.post_json("/api/save-credentials", body).await
    }

    pub async fn post_test_connection(&self, body: &Value) -> reqwest::Response {
        self.post_json("/api/test-mailchimp-connection", body).await
    }

    pub async fn post_upload_images(&self) -> reqwest::Response {
        self.post_json("/api/upload-images", &json!({})).await
    }

    pub async fn post_upload_newsletter(&self) -> reqwest::Response {
        self.post_json("/api/upload-newsletter", &json!({})).await
    }

    pub async fn save_valid_credentials(&self) {
        let response = self
            .post_save_credentials(&json!({
                "apiKey": API_KEY,
                "serverPrefix": SERVER_PREFIX,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
    }

    /// File names directly in the country folder; `mailchimp_versions/` is skipped.
    pub fn generated_files(&self, geo: &str) -> Vec<String> {
        let dir = self.output_dir.join(geo);
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        files.sort();
        files
    }
}

/// A complete form with inline images.
pub fn newsletter_body() -> Value {
    json!({
        "languages": [],
        "hero": {
            "image": PNG_DATA_URI,
            "imageAlt": "Hero image",
            "headline": "Freedom matters",
            "description": "Activists share their stories.",
            "url": "https://hrf.org/hero",
            "cta": { "text": "Read more", "url": "https://hrf.org/more" }
        },
        "stories": [
            {
                "image": PNG_DATA_URI,
                "imageAlt": "Story image",
                "headline": "A story",
                "description": "Story body",
                "url": "https://hrf.org/story"
            }
        ],
        "ctas": [
            { "text": "Donate Now", "url": "https://hrf.org/donate" }
        ]
    })
}

pub async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Response is not JSON");
    assert_eq!(body["success"], false);
    body["error"].as_str().unwrap_or_default().to_string()
}

pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
