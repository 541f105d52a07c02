use crate::constant::{LOCAL_ENVIRONMENT, PRODUCTION_ENVIRONMENT};
use crate::error::BizErrorEnum;
use config::{Config, File};
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub generator: GeneratorSettings,
    pub mailchimp: MailchimpSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Signs the session and flash-message cookies, at least 64 bytes.
    pub hmac_secret: Secret<String>,
    #[serde(default)]
    pub secure_cookies: bool,
}

/// Where the generator reads its inputs and writes its outputs.
#[derive(Deserialize, Clone, Debug)]
pub struct GeneratorSettings {
    /// Country/language JSON file.
    pub data_path: PathBuf,
    /// Per-geo content used by the command line generator.
    pub content_path: PathBuf,
    /// Optional directory holding a `newsletter_template.html` override.
    pub template_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
    /// How a generated file refers to the static root, e.g. `../../static`.
    pub html_static_prefix: String,
    /// Brand logo, relative to the static root.
    pub brand_logo: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MailchimpSettings {
    /// Dotenv file holding `MAILCHIMP_API_KEY` and `MAILCHIMP_SERVER_PREFIX`.
    pub credentials_path: PathBuf,
    /// Overrides `https://<prefix>.api.mailchimp.com/3.0`.
    pub api_base_url: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_image_bytes: u64,
}

impl MailchimpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn api_base_url(&self, server_prefix: &str) -> String {
        match &self.api_base_url {
            Some(base_url) => base_url.trim_end_matches('/').to_string(),
            None => format!("https://{}.api.mailchimp.com/3.0", server_prefix),
        }
    }
}

pub fn get_configuration() -> Result<Settings, BizErrorEnum> {
    let base_path = std::env::current_dir().map_err(|e| {
        tracing::error!("Failed to get current dir.");
        BizErrorEnum::GetCurrentDirError(e)
    })?;
    let config_dir = base_path.join("configuration");
    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| LOCAL_ENVIRONMENT.into())
        .try_into()
        .map_err(|e| {
            tracing::error!("Failed to parse APP_ENVIRONMENT: {:?}", e);
            BizErrorEnum::ParseEnvironmentVariableError(e)
        })?;
    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = Config::builder()
        .add_source(File::from(config_dir.join("base.yaml")))
        .add_source(File::from(config_dir.join(environment_filename)))
        // E.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| {
            tracing::error!("Failed to build config sources.");
            BizErrorEnum::BuildConfigSourcesError(e)
        })?;
    settings.try_deserialize().map_err(|e| {
        tracing::error!("Failed to deserialize config file.");
        BizErrorEnum::DeserializeConfigurationFileError(e)
    })
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => LOCAL_ENVIRONMENT,
            Environment::Production => PRODUCTION_ENVIRONMENT,
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            LOCAL_ENVIRONMENT => Ok(Self::Local),
            PRODUCTION_ENVIRONMENT => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}
