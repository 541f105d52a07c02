use crate::constant::{BRAND_IMAGES_DIR, USER_IMAGES_DIR};
use crate::domain::{ImageSlot, ImageSource, NewsletterRequest};
use crate::error::BizErrorEnum;
use reqwest::Client;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Where images live on disk and how generated HTML refers to them.
#[derive(Debug, Clone)]
pub struct StaticLayout {
    static_dir: PathBuf,
    html_static_prefix: String,
}

impl StaticLayout {
    pub fn new(static_dir: impl Into<PathBuf>, html_static_prefix: &str) -> Self {
        Self {
            static_dir: static_dir.into(),
            html_static_prefix: html_static_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn html_static_prefix(&self) -> &str {
        &self.html_static_prefix
    }

    pub fn brand_dir(&self) -> PathBuf {
        self.static_dir.join(BRAND_IMAGES_DIR)
    }

    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.static_dir.join(USER_IMAGES_DIR).join(session_id)
    }

    /// `images/brand/logo.png` -> `../../static/images/brand/logo.png`
    pub fn html_src(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.html_static_prefix,
            relative.trim_start_matches('/')
        )
    }

    /// The `src` a file under the static root is referenced by.
    pub fn html_src_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.static_dir).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(self.html_src(&parts.join("/")))
    }
}

/// The `src` of every image a newsletter shows.
#[derive(Debug, Clone)]
pub struct ResolvedImages {
    pub logo_src: String,
    pub slots: BTreeMap<ImageSlot, String>,
}

impl ResolvedImages {
    pub fn src(&self, slot: ImageSlot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or_default()
    }
}

/// Copies every form image into the session's image folder.
#[derive(Debug)]
pub struct ImageStore {
    layout: StaticLayout,
    brand_logo: String,
    http_client: Client,
}

impl ImageStore {
    pub fn new(layout: StaticLayout, brand_logo: String, timeout: Duration) -> Result<Self, BizErrorEnum> {
        let http_client = Client::builder()
            // timeout is a MUST option for client
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build http client: {:?}", e);
                BizErrorEnum::BuildHttpClientError(e)
            })?;
        Ok(Self {
            layout,
            brand_logo,
            http_client,
        })
    }

    pub fn layout(&self) -> &StaticLayout {
        &self.layout
    }

    /// Every image is checked and fetched before the session folder is
    /// touched, so a missing file or failed download leaves the previous
    /// run's images in place.
    #[tracing::instrument(name = "Resolve newsletter images", skip(self, request))]
    pub async fn resolve(
        &self,
        session_id: &str,
        geo: &str,
        request: &NewsletterRequest,
    ) -> Result<ResolvedImages, BizErrorEnum> {
        let logo_path = self.layout.static_dir().join(&self.brand_logo);
        let mut missing: Vec<String> = Vec::new();
        if !logo_path.is_file() {
            missing.push(logo_path.display().to_string());
        }
        for (_, source) in request.images() {
            if let ImageSource::Local(path) = source {
                if !path.is_file() {
                    missing.push(path.display().to_string());
                }
            }
        }
        if !missing.is_empty() {
            tracing::error!("Missing image files for {}: {:?}", geo, missing);
            return Err(BizErrorEnum::MissingImageFiles {
                geo: geo.to_string(),
                paths: missing,
            });
        }

        let mut fetched = Vec::new();
        for (slot, source) in request.images() {
            let bytes = self.fetch(source).await?;
            let file_name = format!("{}.{}", slot.file_stem(), source.extension());
            fetched.push((slot, file_name, bytes));
        }

        let session_dir = self.layout.session_dir(session_id);
        clear_session_dir(&session_dir).await?;

        let mut slots = BTreeMap::new();
        for (slot, file_name, bytes) in fetched {
            let path = session_dir.join(file_name);
            tokio::fs::write(&path, bytes).await.map_err(|e| {
                tracing::error!("Failed to write {}: {:?}", path.display(), e);
                BizErrorEnum::WriteImageError(e)
            })?;
            let src = self.layout.html_src_for(&path).unwrap_or_default();
            slots.insert(slot, src);
        }

        Ok(ResolvedImages {
            logo_src: self.layout.html_src(&self.brand_logo),
            slots,
        })
    }

    async fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>, BizErrorEnum> {
        match source {
            ImageSource::Inline { bytes, .. } => Ok(bytes.clone()),
            ImageSource::Local(path) => tokio::fs::read(path).await.map_err(|e| {
                tracing::error!("Failed to read {}: {:?}", path.display(), e);
                BizErrorEnum::ReadImageError(e)
            }),
            ImageSource::Remote(url) => {
                let response = self
                    .http_client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|response| response.error_for_status())
                    .map_err(|e| {
                        tracing::error!("Failed to download {}: {:?}", url, e);
                        BizErrorEnum::DownloadImageError(e)
                    })?;
                let bytes = response.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read body of {}: {:?}", url, e);
                    BizErrorEnum::DownloadImageError(e)
                })?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Old `img-*` files would otherwise be uploaded alongside the new ones.
async fn clear_session_dir(dir: &Path) -> Result<(), BizErrorEnum> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        tracing::error!("Failed to create {}: {:?}", dir.display(), e);
        BizErrorEnum::CreateDirectoryError(e)
    })?;
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        tracing::error!("Failed to read {}: {:?}", dir.display(), e);
        BizErrorEnum::ReadDirectoryError(e)
    })?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(BizErrorEnum::ReadDirectoryError)?
    {
        let path = entry.path();
        let is_slot_image = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with("img-"))
            .unwrap_or(false);
        if is_slot_image && path.is_file() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(BizErrorEnum::WriteImageError)?;
        }
    }
    Ok(())
}
