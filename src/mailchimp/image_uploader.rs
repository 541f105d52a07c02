use crate::constant::IMAGE_EXTENSIONS;
use crate::error::BizErrorEnum;
use crate::image_store::StaticLayout;
use crate::mailchimp::{compressor, MailchimpClient, UrlMapping};
use crate::telemetry::spawn_blocking_with_tracing;
use base64::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub name: String,
    /// The `src` generated newsletters use for this file.
    pub local_src: String,
    pub url: String,
    pub compressed: bool,
}

pub fn url_mapping(images: &[UploadedImage]) -> UrlMapping {
    images
        .iter()
        .map(|image| (image.local_src.clone(), image.url.clone()))
        .collect()
}

/// Uploads the brand images and one session's images, stopping at the first failure.
pub struct ImageUploader<'a> {
    client: &'a MailchimpClient,
    layout: &'a StaticLayout,
    max_image_bytes: u64,
}

impl<'a> ImageUploader<'a> {
    pub fn new(client: &'a MailchimpClient, layout: &'a StaticLayout, max_image_bytes: u64) -> Self {
        Self {
            client,
            layout,
            max_image_bytes,
        }
    }

    #[tracing::instrument(name = "Upload images to Mailchimp", skip(self))]
    pub async fn upload(&self, session_id: &str) -> Result<Vec<UploadedImage>, BizErrorEnum> {
        let mut files = discover_images(&self.layout.brand_dir())?;
        files.extend(discover_images(&self.layout.session_dir(session_id))?);
        tracing::info!("Uploading {} images", files.len());

        let mut uploaded = Vec::with_capacity(files.len());
        for path in files {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let image = self
                .upload_one(&path, &name)
                .await
                .map_err(|e| BizErrorEnum::ImageUploadFailed {
                    name: name.clone(),
                    source: Box::new(e),
                })?;
            uploaded.push(image);
        }
        Ok(uploaded)
    }

    async fn upload_one(&self, path: &Path, name: &str) -> Result<UploadedImage, BizErrorEnum> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Failed to read {}: {:?}", path.display(), e);
            BizErrorEnum::ReadImageError(e)
        })?;

        let max_image_bytes = self.max_image_bytes;
        let owned_name = name.to_string();
        let image = spawn_blocking_with_tracing(move || {
            compressor::compress(&owned_name, bytes, max_image_bytes)
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to spawn blocking task: {:?}", e);
            BizErrorEnum::SpawnBlockingTaskError(e)
        })??;

        let file_data = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let hosted = self.client.upload_file(&image.name, &file_data).await?;
        tracing::info!("Uploaded {} as {}", name, hosted.full_size_url);

        Ok(UploadedImage {
            name: image.name,
            local_src: self.layout.html_src_for(path).unwrap_or_default(),
            url: hosted.full_size_url,
            compressed: image.compressed,
        })
    }
}

/// Image files directly inside `dir`, sorted by name. A missing folder has none.
fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, BizErrorEnum> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| {
        tracing::error!("Failed to read {}: {:?}", dir.display(), e);
        BizErrorEnum::ReadDirectoryError(e)
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(BizErrorEnum::ReadDirectoryError)?.path();
        let is_image = path
            .extension()
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && is_image {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
