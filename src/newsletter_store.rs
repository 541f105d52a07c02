use crate::constant::{MAILCHIMP_VERSIONS_DIR, NEWSLETTER_FILE_PREFIX, TIMESTAMP_FORMAT};
use crate::error::BizErrorEnum;
use crate::utils::slugify;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Generated newsletters, one folder per country:
/// `<output>/<geo>/newsletter_<geo>-<lang>_<timestamp>.html`.
#[derive(Debug, Clone)]
pub struct NewsletterStore {
    output_dir: PathBuf,
}

impl NewsletterStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn country_dir(&self, geo: &str) -> PathBuf {
        self.output_dir.join(slugify(&geo.to_lowercase()))
    }

    pub fn versions_dir(&self, geo: &str) -> PathBuf {
        self.country_dir(geo).join(MAILCHIMP_VERSIONS_DIR)
    }

    pub fn file_name(geo_language: &str, timestamp: &DateTime<Local>) -> String {
        format!(
            "{}_{}_{}.html",
            NEWSLETTER_FILE_PREFIX,
            geo_language,
            timestamp.format(TIMESTAMP_FORMAT)
        )
    }

    #[tracing::instrument(name = "Write newsletter", skip(self, html))]
    pub fn write(
        &self,
        geo: &str,
        geo_language: &str,
        timestamp: &DateTime<Local>,
        html: &str,
    ) -> Result<PathBuf, BizErrorEnum> {
        let path = self
            .country_dir(geo)
            .join(Self::file_name(geo_language, timestamp));
        write_file(&path, html)?;
        Ok(path)
    }

    /// The copy with hosted image URLs, under `mailchimp_versions/`.
    pub fn write_processed(
        &self,
        geo: &str,
        file_name: &str,
        html: &str,
    ) -> Result<PathBuf, BizErrorEnum> {
        let path = self.versions_dir(geo).join(file_name);
        write_file(&path, html)?;
        Ok(path)
    }

    /// The newest file of each geo-language in the country folder.
    pub fn latest_per_geo_language(&self, geo: &str) -> Result<Vec<PathBuf>, BizErrorEnum> {
        let dir = self.country_dir(geo);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            tracing::error!("Failed to read {}: {:?}", dir.display(), e);
            BizErrorEnum::ReadDirectoryError(e)
        })?;

        // The timestamp format sorts lexically.
        let mut latest: BTreeMap<String, (String, PathBuf)> = BTreeMap::new();
        for entry in entries {
            let path = entry.map_err(BizErrorEnum::ReadDirectoryError)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            let Some((geo_language, timestamp)) = parse_file_name(&file_name) else {
                continue;
            };
            let newer = latest
                .get(&geo_language)
                .map(|(current, _)| timestamp > *current)
                .unwrap_or(true);
            if newer {
                latest.insert(geo_language, (timestamp, path));
            }
        }
        Ok(latest.into_values().map(|(_, path)| path).collect())
    }
}

/// `newsletter_ci-fr_2024-05-01_10-00-00.html` -> (`ci-fr`, `2024-05-01_10-00-00`)
fn parse_file_name(file_name: &str) -> Option<(String, String)> {
    let stem = file_name
        .strip_prefix(NEWSLETTER_FILE_PREFIX)?
        .strip_prefix('_')?
        .strip_suffix(".html")?;
    // `YYYY-MM-DD_HH-MM-SS`
    let timestamp_len = 19;
    if stem.len() <= timestamp_len + 1 || !stem.is_char_boundary(stem.len() - timestamp_len) {
        return None;
    }
    let (geo_language, timestamp) = stem.split_at(stem.len() - timestamp_len);
    let geo_language = geo_language.strip_suffix('_')?;
    chrono::NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    Some((geo_language.to_string(), timestamp.to_string()))
}

fn write_file(path: &Path, content: &str) -> Result<(), BizErrorEnum> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            tracing::error!("Failed to create {}: {:?}", parent.display(), e);
            BizErrorEnum::CreateDirectoryError(e)
        })?;
    }
    std::fs::write(path, content).map_err(|e| {
        tracing::error!("Failed to write {}: {:?}", path.display(), e);
        BizErrorEnum::WriteNewsletterError(e)
    })
}
