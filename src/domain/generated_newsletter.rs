use serde::Serialize;
use std::path::PathBuf;

/// One rendered language variant, written to disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNewsletter {
    /// `<geo>-<language code>`, e.g. `ci-fr`.
    pub geo: String,
    pub language: String,
    pub path: PathBuf,
    #[serde(skip)]
    pub html: String,
}

impl GeneratedNewsletter {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
