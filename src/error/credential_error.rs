use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt::{Debug, Formatter};

#[derive(thiserror::Error)]
pub enum CredentialError {
    #[error("API key and server prefix are required.")]
    MissingFields,

    #[error("Credential validation failed")]
    ValidationError(Vec<String>),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

// We are still using a bespoke implementation of `Debug`
// to get a nice report using the error source chain
impl Debug for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::error::error_chain_fmt(self, f)
    }
}

impl ResponseError for CredentialError {
    fn status_code(&self) -> StatusCode {
        match self {
            CredentialError::MissingFields | CredentialError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            CredentialError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let body = match self {
            CredentialError::ValidationError(details) => json!({
                "success": false,
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
