use crate::configuration::MailchimpSettings;
use crate::error::{BizErrorEnum, CredentialError};
use crate::mailchimp::{CredentialStore, MailchimpClient, MailchimpCredentials};
use crate::request::CredentialsData;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::ExposeSecret;
use serde_json::json;

fn parse_credentials(body: CredentialsData) -> Result<MailchimpCredentials, CredentialError> {
    let CredentialsData {
        api_key,
        server_prefix,
    } = body;
    match (api_key, server_prefix) {
        (Some(api_key), Some(server_prefix)) => {
            MailchimpCredentials::parse(api_key.expose_secret().clone(), server_prefix)
        }
        _ => Err(CredentialError::MissingFields),
    }
}

#[tracing::instrument(name = "/api/check-credentials: Check credentials", skip_all)]
pub async fn check_credentials(credential_store: web::Data<CredentialStore>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "hasCredentials": credential_store.present(),
    }))
}

#[tracing::instrument(name = "/api/save-credentials: Save credentials", skip_all)]
pub async fn save_credentials(
    body: web::Json<CredentialsData>,
    credential_store: web::Data<CredentialStore>,
) -> Result<HttpResponse, CredentialError> {
    let credentials = parse_credentials(body.into_inner())?;
    credential_store
        .save(&credentials)
        .context("Failed to save Mailchimp credentials")?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Credentials saved successfully.",
    })))
}

#[tracing::instrument(name = "/api/test-mailchimp-connection: Test connection", skip_all)]
pub async fn test_mailchimp_connection(
    body: web::Json<CredentialsData>,
    settings: web::Data<MailchimpSettings>,
) -> Result<HttpResponse, CredentialError> {
    let credentials = parse_credentials(body.into_inner())?;
    let base_url = settings.api_base_url(credentials.server_prefix());
    let client = MailchimpClient::new(base_url, credentials, settings.timeout())
        .context("Failed to build Mailchimp client")?;

    let response = match client.ping().await {
        Ok(account) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Connection successful.",
            "account": account,
        })),
        Err(e @ BizErrorEnum::MailchimpUnauthorized) => {
            HttpResponse::build(StatusCode::UNAUTHORIZED).json(json!({
                "success": false,
                "error": e.to_string(),
                "errorType": "authentication",
                "suggestions": [
                    "Check that the API key was copied completely.",
                    "Make sure the key has not been revoked in your Mailchimp account.",
                    "Confirm the server prefix matches the suffix of the API key.",
                ],
            }))
        }
        Err(e @ BizErrorEnum::MailchimpRequestError(_)) => {
            HttpResponse::build(StatusCode::BAD_GATEWAY).json(json!({
                "success": false,
                "error": e.describe(),
                "errorType": "network",
                "suggestions": [
                    "Check your internet connection.",
                    "Verify the server prefix is correct.",
                ],
            }))
        }
        Err(e) => HttpResponse::build(StatusCode::BAD_GATEWAY).json(json!({
            "success": false,
            "error": e.describe(),
            "errorType": "api",
        })),
    };
    Ok(response)
}
