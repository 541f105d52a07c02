use crate::constant::MAILCHIMP_AUTH_USER;
use crate::error::BizErrorEnum;
use crate::mailchimp::MailchimpCredentials;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A thin client over the three Mailchimp endpoints the publish workflow needs.
#[derive(Debug)]
pub struct MailchimpClient {
    http_client: Client,
    base_url: String,
    credentials: MailchimpCredentials,
}

#[derive(Debug, Serialize)]
struct UploadFileRequest<'a> {
    name: &'a str,
    file_data: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub id: Option<u64>,
    pub full_size_url: String,
}

#[derive(Debug, Serialize)]
struct CreateTemplateRequest<'a> {
    name: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedTemplate {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AccountInfo {
    pub account_id: String,
    pub account_name: String,
    pub email: Option<String>,
}

impl MailchimpClient {
    pub fn new(
        base_url: String,
        credentials: MailchimpCredentials,
        timeout: Duration,
    ) -> Result<Self, BizErrorEnum> {
        let http_client = Client::builder()
            // timeout is a MUST option for client
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build http client: {:?}", e);
                BizErrorEnum::BuildHttpClientError(e)
            })?;
        Ok(MailchimpClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// `GET /`, the account root, used to check the credentials.
    #[tracing::instrument(name = "Ping Mailchimp", skip(self))]
    pub async fn ping(&self) -> Result<AccountInfo, BizErrorEnum> {
        let request = self.http_client.get(self.url("/"));
        let response = self.send(request).await?;
        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Mailchimp account info: {:?}", e);
            BizErrorEnum::MailchimpRequestError(e)
        })
    }

    /// `POST /file-manager/files` with a base64 payload.
    #[tracing::instrument(name = "Upload file to Mailchimp", skip(self, file_data))]
    pub async fn upload_file(
        &self,
        name: &str,
        file_data: &str,
    ) -> Result<UploadedFile, BizErrorEnum> {
        let body = UploadFileRequest { name, file_data };
        let request = self
            .http_client
            .post(self.url("/file-manager/files"))
            .json(&body);
        let response = self.send(request).await?;
        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Mailchimp file upload response: {:?}", e);
            BizErrorEnum::MailchimpRequestError(e)
        })
    }

    /// `POST /templates`.
    #[tracing::instrument(name = "Create Mailchimp template", skip(self, html))]
    pub async fn create_template(
        &self,
        name: &str,
        html: &str,
    ) -> Result<CreatedTemplate, BizErrorEnum> {
        let body = CreateTemplateRequest { name, html };
        let request = self.http_client.post(self.url("/templates")).json(&body);
        let response = self.send(request).await?;
        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Mailchimp template response: {:?}", e);
            BizErrorEnum::MailchimpRequestError(e)
        })
    }

    // `Url::join` would drop the `/3.0` segment of the base url.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BizErrorEnum> {
        let response = request
            .basic_auth(
                MAILCHIMP_AUTH_USER,
                Some(self.credentials.api_key().expose_secret()),
            )
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Mailchimp: {:?}", e);
                BizErrorEnum::MailchimpRequestError(e)
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::error!("Mailchimp rejected the API key");
            return Err(BizErrorEnum::MailchimpUnauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Mailchimp returned {}: {}", status, body);
            return Err(BizErrorEnum::MailchimpStatusError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
