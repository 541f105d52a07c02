use crate::domain::InvalidReason;
use crate::utils;
use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt::{Debug, Formatter};

#[derive(thiserror::Error)]
pub enum BizErrorEnum {
    // VALIDATE NEWSLETTER REQUEST
    #[error("{0}")]
    InvalidNewsletterRequest(#[from] InvalidReason),

    #[error("No country selected. Please select a country first.")]
    CountryNotSelected,

    #[error("Country '{0}' is not supported.")]
    UnknownCountry(String),

    #[error("No valid language selected for {0}.")]
    NoLanguageSelected(String),

    // RESOLVE GEO
    #[error("Geo '{0}' could not be resolved.")]
    GeoNotResolved(String),

    #[error("Geo '{0}' exists in the data, but contains no content or translations.")]
    GeoHasNoContent(String),

    #[error("Content for geo '{geo}' is malformed.")]
    InvalidGeoContent {
        geo: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not find the following image files for geo '{geo}': {}", .paths.join(", "))]
    MissingImageFiles { geo: String, paths: Vec<String> },

    // DATA FILES
    #[error("Failed to read country data file.")]
    ReadCountryDataError(#[source] std::io::Error),

    #[error("Failed to parse country data file.")]
    ParseCountryDataError(#[source] serde_json::Error),

    #[error("Failed to read newsletter content file.")]
    ReadContentFileError(#[source] std::io::Error),

    #[error("Failed to parse newsletter content file.")]
    ParseContentFileError(#[source] serde_json::Error),

    // FILE SYSTEM
    #[error("Failed to create directory.")]
    CreateDirectoryError(#[source] std::io::Error),

    #[error("Failed to read directory.")]
    ReadDirectoryError(#[source] std::io::Error),

    #[error("Failed to write newsletter file.")]
    WriteNewsletterError(#[source] std::io::Error),

    #[error("Failed to read newsletter file.")]
    ReadNewsletterError(#[source] std::io::Error),

    #[error("Failed to read image file.")]
    ReadImageError(#[source] std::io::Error),

    #[error("Failed to write image file.")]
    WriteImageError(#[source] std::io::Error),

    // IMAGES
    #[error("Failed to download image.")]
    DownloadImageError(#[source] reqwest::Error),

    #[error("Failed to decode image.")]
    DecodeImageError(#[source] image::ImageError),

    #[error("Failed to encode image.")]
    EncodeImageError(#[source] image::ImageError),

    #[error("Could not compress '{name}' below {limit} bytes.")]
    ImageTooLarge { name: String, limit: u64 },

    // TEMPLATE
    #[error("Failed to build newsletter template.")]
    BuildTemplateError(#[source] tera::Error),

    #[error("Failed to render newsletter template.")]
    RenderTemplateError(#[source] tera::Error),

    // MAILCHIMP
    #[error("Mailchimp credentials not found. Please configure API key and server prefix.")]
    MailchimpCredentialsMissing,

    #[error("Mailchimp rejected the API key.")]
    MailchimpUnauthorized,

    #[error("Failed to reach Mailchimp.")]
    MailchimpRequestError(#[source] reqwest::Error),

    #[error("Mailchimp returned HTTP {status}: {body}")]
    MailchimpStatusError { status: u16, body: String },

    #[error("Image upload failed for '{name}'.")]
    ImageUploadFailed {
        name: String,
        #[source]
        source: Box<BizErrorEnum>,
    },

    #[error("Template upload failed for '{name}'.")]
    TemplateUploadFailed {
        name: String,
        #[source]
        source: Box<BizErrorEnum>,
    },

    #[error("Newsletter '{file}' still references local images: {}", .paths.join(", "))]
    UnresolvedImageReferences { file: String, paths: Vec<String> },

    #[error("No newsletter files found for country: {0}")]
    NoNewslettersFound(String),

    #[error("Failed to read credentials file.")]
    ReadCredentialsError(#[source] dotenvy::Error),

    #[error("Failed to write credentials file.")]
    WriteCredentialsError(#[source] std::io::Error),

    // SESSION
    #[error("Failed to insert key to session")]
    ActixSessionInsertError(#[source] actix_session::SessionInsertError),

    #[error("Failed to get key from session")]
    ActixSessionGetError(#[source] actix_session::SessionGetError),

    // OTHER
    #[error("Failed to build http client.")]
    BuildHttpClientError(#[source] reqwest::Error),

    #[error("Failed to bind TcpListener.")]
    BindTcpListenerError(#[source] std::io::Error),

    #[error("Failed to listen TcpListener.")]
    ListenTcpListenerError(#[source] std::io::Error),

    #[error("Failed to run server.")]
    RunServerError(#[source] std::io::Error),

    #[error("Failed to determine the current directory.")]
    GetCurrentDirError(#[source] std::io::Error),

    #[error("Failed to parse environment variable.")]
    ParseEnvironmentVariableError(String),

    #[error("Failed to build config sources.")]
    BuildConfigSourcesError(#[source] config::ConfigError),

    #[error("Failed to deserialize config file.")]
    DeserializeConfigurationFileError(#[source] config::ConfigError),

    #[error("Failed to set logger.")]
    SetLoggerError(#[source] tracing_log::log::SetLoggerError),

    #[error("Failed to set subscriber.")]
    SetSubscriberError(#[source] tracing::dispatcher::SetGlobalDefaultError),

    #[error("Failed to spawn blocking task.")]
    SpawnBlockingTaskError(#[source] tokio::task::JoinError),
}

impl BizErrorEnum {
    /// The innermost error of an upload failure, which decides the status code.
    fn root(&self) -> &BizErrorEnum {
        match self {
            BizErrorEnum::ImageUploadFailed { source, .. }
            | BizErrorEnum::TemplateUploadFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// A message that names the failed item and its cause.
    pub fn describe(&self) -> String {
        match self {
            BizErrorEnum::ImageUploadFailed { source, .. }
            | BizErrorEnum::TemplateUploadFailed { source, .. } => {
                format!("{} {}", self, source.describe())
            }
            BizErrorEnum::DownloadImageError(e)
            | BizErrorEnum::MailchimpRequestError(e) => format!("{} {}", self, e),
            BizErrorEnum::DecodeImageError(e) | BizErrorEnum::EncodeImageError(e) => {
                format!("{} {}", self, e)
            }
            BizErrorEnum::RenderTemplateError(e) | BizErrorEnum::BuildTemplateError(e) => {
                format!("{} {:?}", self, e)
            }
            other => other.to_string(),
        }
    }
}

impl Debug for BizErrorEnum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::error::error_chain_fmt(self, f)
    }
}

impl ResponseError for BizErrorEnum {
    fn status_code(&self) -> StatusCode {
        match self.root() {
            BizErrorEnum::InvalidNewsletterRequest(_)
            | BizErrorEnum::CountryNotSelected
            | BizErrorEnum::NoLanguageSelected(_)
            | BizErrorEnum::GeoHasNoContent(_)
            | BizErrorEnum::InvalidGeoContent { .. }
            | BizErrorEnum::MissingImageFiles { .. }
            | BizErrorEnum::DecodeImageError(_)
            | BizErrorEnum::ImageTooLarge { .. }
            | BizErrorEnum::UnresolvedImageReferences { .. }
            | BizErrorEnum::MailchimpCredentialsMissing => StatusCode::BAD_REQUEST,

            BizErrorEnum::UnknownCountry(_)
            | BizErrorEnum::GeoNotResolved(_)
            | BizErrorEnum::NoNewslettersFound(_) => StatusCode::NOT_FOUND,

            BizErrorEnum::MailchimpUnauthorized => StatusCode::UNAUTHORIZED,

            BizErrorEnum::DownloadImageError(_)
            | BizErrorEnum::MailchimpRequestError(_)
            | BizErrorEnum::MailchimpStatusError { .. } => StatusCode::BAD_GATEWAY,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        utils::json_error(self.status_code(), &self.describe())
    }
}
