use crate::domain::InvalidReason;
use base64::Engine;
use reqwest::Url;
use std::path::PathBuf;

/// Where a form image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `http(s)` URL, downloaded at generation time.
    Remote(Url),
    /// `data:image/...;base64,...` payload, already decoded.
    Inline { extension: &'static str, bytes: Vec<u8> },
    /// A file on disk, relative to the working directory.
    Local(PathBuf),
}

impl ImageSource {
    pub fn parse(image: String, field: &str) -> Result<Self, InvalidReason> {
        let image = image.trim();
        if image.is_empty() {
            return Err(InvalidReason::ImageIsMissing(field.to_string()));
        }

        if let Some(data_uri) = image.strip_prefix("data:") {
            return parse_data_uri(data_uri, field);
        }

        if image.starts_with("http://") || image.starts_with("https://") {
            let url =
                Url::parse(image).map_err(|_| InvalidReason::ImageIsMalformed(field.to_string()))?;
            return Ok(Self::Remote(url));
        }

        Ok(Self::Local(PathBuf::from(image)))
    }

    /// File extension the stored copy should carry.
    pub fn extension(&self) -> String {
        match self {
            ImageSource::Inline { extension, .. } => extension.to_string(),
            ImageSource::Remote(url) => extension_of(url.path()),
            ImageSource::Local(path) => extension_of(&path.to_string_lossy()),
        }
    }
}

fn parse_data_uri(data_uri: &str, field: &str) -> Result<ImageSource, InvalidReason> {
    let (meta, payload) = data_uri
        .split_once(',')
        .ok_or_else(|| InvalidReason::ImageIsMalformed(field.to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| InvalidReason::ImageIsMalformed(field.to_string()))?;
    let extension = match mime.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => return Err(InvalidReason::ImageIsMalformed(field.to_string())),
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| {
            tracing::error!("Failed to decode base64 image for {}: {:?}", field, e);
            InvalidReason::ImageIsMalformed(field.to_string())
        })?;
    if bytes.is_empty() {
        return Err(InvalidReason::ImageIsMissing(field.to_string()));
    }

    Ok(ImageSource::Inline { extension, bytes })
}

/// Known raster extensions are kept, anything else is stored as jpg.
fn extension_of(path: &str) -> String {
    let lower = path.to_lowercase();
    let extension = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension {
        "jpg" | "jpeg" => "jpg".into(),
        "png" | "gif" | "webp" | "bmp" | "svg" => extension.into(),
        _ => "jpg".into(),
    }
}
