use secrecy::Secret;
use serde::Deserialize;

/// Missing fields are reported by validation, not by the JSON extractor.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsData {
    #[serde(default, alias = "api_key")]
    pub api_key: Option<Secret<String>>,
    #[serde(default, alias = "server_prefix")]
    pub server_prefix: Option<String>,
}
