use crate::error::BizErrorEnum;
use crate::mailchimp::{url_substituter, MailchimpClient, UrlMapping};
use crate::newsletter_store::NewsletterStore;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedTemplate {
    pub file_name: String,
    pub template_id: u64,
    pub template_name: String,
}

/// Rewrites image URLs in the newest newsletter of each language and creates
/// one Mailchimp template per file.
pub struct TemplateUploader<'a> {
    client: &'a MailchimpClient,
    store: &'a NewsletterStore,
    html_static_prefix: &'a str,
}

impl<'a> TemplateUploader<'a> {
    pub fn new(
        client: &'a MailchimpClient,
        store: &'a NewsletterStore,
        html_static_prefix: &'a str,
    ) -> Self {
        Self {
            client,
            store,
            html_static_prefix,
        }
    }

    #[tracing::instrument(name = "Upload templates to Mailchimp", skip(self, mapping))]
    pub async fn upload(
        &self,
        country_name: &str,
        geo: &str,
        mapping: &UrlMapping,
    ) -> Result<Vec<UploadedTemplate>, BizErrorEnum> {
        let files = self.store.latest_per_geo_language(geo)?;
        if files.is_empty() {
            tracing::error!("No newsletters found for {}", country_name);
            return Err(BizErrorEnum::NoNewslettersFound(country_name.to_string()));
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for path in files {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let template = self
                .upload_one(geo, &path, &file_name, mapping)
                .await
                .map_err(|e| BizErrorEnum::TemplateUploadFailed {
                    name: file_name.clone(),
                    source: Box::new(e),
                })?;
            uploaded.push(template);
        }
        Ok(uploaded)
    }

    async fn upload_one(
        &self,
        geo: &str,
        path: &Path,
        file_name: &str,
        mapping: &UrlMapping,
    ) -> Result<UploadedTemplate, BizErrorEnum> {
        let html = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!("Failed to read {}: {:?}", path.display(), e);
            BizErrorEnum::ReadNewsletterError(e)
        })?;
        let processed = url_substituter::substitute(&html, mapping);
        self.store.write_processed(geo, file_name, &processed)?;

        let remaining = url_substituter::remaining_local_refs(&processed, self.html_static_prefix);
        if !remaining.is_empty() {
            tracing::error!("{} still references {:?}", file_name, remaining);
            return Err(BizErrorEnum::UnresolvedImageReferences {
                file: file_name.to_string(),
                paths: remaining,
            });
        }

        let name = file_name.trim_end_matches(".html");
        let template = self.client.create_template(name, &processed).await?;
        tracing::info!("Created template {} ({})", template.name, template.id);
        Ok(UploadedTemplate {
            file_name: file_name.to_string(),
            template_id: template.id,
            template_name: template.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateUploader;
    use crate::error::BizErrorEnum;
    use crate::mailchimp::{MailchimpClient, MailchimpCredentials, UrlMapping};
    use crate::newsletter_store::NewsletterStore;
    use chrono::{Local, TimeZone};
    use claims::assert_ok;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const LOCAL_SRC: &str = "../../static/images/user-images/ab12cd34/img-hero.jpg";
    const HOSTED_URL: &str = "https://mcusercontent.com/img-hero.jpg";

    struct HostedImagesOnly;

    impl wiremock::Match for HostedImagesOnly {
        fn matches(&self, request: &Request) -> bool {
            let result: Result<serde_json::Value, _> = serde_json::from_slice(&request.body);
            match result {
                Ok(body) => body["html"]
                    .as_str()
                    .map(|html| html.contains(HOSTED_URL) && !html.contains("../../static"))
                    .unwrap_or(false),
                Err(_) => false,
            }
        }
    }

    fn client(base_url: String) -> MailchimpClient {
        let credentials = MailchimpCredentials::parse(
            "0123456789abcdef0123456789abcdef-us21".into(),
            "us21".into(),
        )
        .unwrap();
        MailchimpClient::new(base_url, credentials, Duration::from_secs(2)).unwrap()
    }

    fn seed(store: &NewsletterStore) {
        let timestamp = Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let html = format!(r#"<img src="{}">"#, LOCAL_SRC);
        store.write("ci", "ci-fr", &timestamp, &html).unwrap();
        store.write("ci", "ci-en", &timestamp, &html).unwrap();
    }

    fn mapping() -> UrlMapping {
        [(LOCAL_SRC.to_string(), HOSTED_URL.to_string())]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn each_language_becomes_a_template_with_hosted_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = NewsletterStore::new(dir.path());
        seed(&store);
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/templates"))
            .and(HostedImagesOnly)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "t"})))
            .expect(2)
            .mount(&mock_server)
            .await;
        let client = client(mock_server.uri());

        let templates = assert_ok!(
            TemplateUploader::new(&client, &store, "../../static")
                .upload("Ivory Coast", "ci", &mapping())
                .await
        );

        assert_eq!(templates.len(), 2);
        let processed = dir
            .path()
            .join("ci/mailchimp_versions/newsletter_ci-fr_2024-05-01_09-00-00.html");
        assert!(std::fs::read_to_string(processed).unwrap().contains(HOSTED_URL));
    }

    #[tokio::test]
    async fn local_paths_left_after_substitution_block_the_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = NewsletterStore::new(dir.path());
        seed(&store);
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
        let client = client(mock_server.uri());

        let error = TemplateUploader::new(&client, &store, "../../static")
            .upload("Ivory Coast", "ci", &UrlMapping::new())
            .await
            .unwrap_err();

        assert!(matches!(error, BizErrorEnum::TemplateUploadFailed { .. }));
        assert!(error.describe().contains(LOCAL_SRC));
    }

    #[tokio::test]
    async fn a_country_without_newsletters_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = NewsletterStore::new(dir.path());
        let client = client("http://127.0.0.1:9".into());

        let error = TemplateUploader::new(&client, &store, "../../static")
            .upload("Ivory Coast", "ci", &mapping())
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "No newsletter files found for country: Ivory Coast"
        );
    }
}
