use crate::constant::{MAILCHIMP_API_KEY, MAILCHIMP_SERVER_PREFIX};
use crate::error::{BizErrorEnum, CredentialError};
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use std::path::{Path, PathBuf};

static API_KEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]{32}-[a-z]{2}\d{1,2}$").unwrap());
static SERVER_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2}\d{1,2}$").unwrap());

/// A validated API key and the data center it belongs to.
#[derive(Debug, Clone)]
pub struct MailchimpCredentials {
    api_key: Secret<String>,
    server_prefix: String,
}

impl MailchimpCredentials {
    /// Collects every problem instead of stopping at the first one.
    pub fn parse(api_key: String, server_prefix: String) -> Result<Self, CredentialError> {
        let api_key = api_key.trim().to_string();
        let server_prefix = server_prefix.trim().to_lowercase();
        if api_key.is_empty() || server_prefix.is_empty() {
            return Err(CredentialError::MissingFields);
        }

        let mut details = Vec::new();
        if !API_KEY_REGEX.is_match(&api_key) {
            details.push("Invalid API key format".to_string());
        }
        if !SERVER_PREFIX_REGEX.is_match(&server_prefix) {
            details.push("Invalid server prefix format".to_string());
        }
        if let Some((_, suffix)) = api_key.rsplit_once('-') {
            if !suffix.is_empty() && suffix != server_prefix {
                details.push(format!(
                    "API key server suffix '{}' does not match server prefix '{}'",
                    suffix, server_prefix
                ));
            }
        }
        if !details.is_empty() {
            return Err(CredentialError::ValidationError(details));
        }

        Ok(Self {
            api_key: Secret::new(api_key),
            server_prefix,
        })
    }

    pub fn api_key(&self) -> &Secret<String> {
        &self.api_key
    }

    pub fn server_prefix(&self) -> &str {
        &self.server_prefix
    }
}

/// Reads and writes credentials in a dotenv file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file or either key is missing.
    pub fn load(&self) -> Result<Option<MailchimpCredentials>, BizErrorEnum> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut api_key = None;
        let mut server_prefix = None;
        let entries = dotenvy::from_path_iter(&self.path).map_err(|e| {
            tracing::error!("Failed to open credentials file: {:?}", e);
            BizErrorEnum::ReadCredentialsError(e)
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| {
                tracing::error!("Failed to parse credentials file: {:?}", e);
                BizErrorEnum::ReadCredentialsError(e)
            })?;
            match key.as_str() {
                MAILCHIMP_API_KEY => api_key = Some(value),
                MAILCHIMP_SERVER_PREFIX => server_prefix = Some(value),
                _ => {}
            }
        }

        match (api_key, server_prefix) {
            (Some(api_key), Some(server_prefix)) => {
                match MailchimpCredentials::parse(api_key, server_prefix) {
                    Ok(credentials) => Ok(Some(credentials)),
                    Err(e) => {
                        tracing::warn!("Ignoring stored credentials: {:?}", e);
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    pub fn present(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }

    /// Replace both keys, leaving every other line of the file alone.
    #[tracing::instrument(name = "Save Mailchimp credentials", skip(self, credentials), fields(path = %self.path.display()))]
    pub fn save(&self, credentials: &MailchimpCredentials) -> Result<(), BizErrorEnum> {
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                tracing::error!("Failed to read credentials file: {:?}", e);
                return Err(BizErrorEnum::WriteCredentialsError(e));
            }
        };

        let mut lines: Vec<String> = existing
            .lines()
            .filter(|line| {
                let key = line.split('=').next().unwrap_or_default().trim();
                let key = key.strip_prefix("export ").unwrap_or(key).trim();
                key != MAILCHIMP_API_KEY && key != MAILCHIMP_SERVER_PREFIX
            })
            .map(str::to_string)
            .collect();
        lines.push(format!(
            "{}={}",
            MAILCHIMP_API_KEY,
            credentials.api_key.expose_secret()
        ));
        lines.push(format!(
            "{}={}",
            MAILCHIMP_SERVER_PREFIX, credentials.server_prefix
        ));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create credentials directory: {:?}", e);
                BizErrorEnum::WriteCredentialsError(e)
            })?;
        }
        std::fs::write(&self.path, lines.join("\n") + "\n").map_err(|e| {
            tracing::error!("Failed to write credentials file: {:?}", e);
            BizErrorEnum::WriteCredentialsError(e)
        })
    }
}
