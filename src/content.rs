use crate::error::BizErrorEnum;
use crate::request::NewsletterData;
use serde_json::{Map, Value};
use std::path::Path;

const TRANSLATIONS_KEY: &str = "translations";

/// Per-geo newsletter content for the command line generator.
///
/// Each geo block holds the default content plus a `translations` object
/// keyed by language code, merged over the defaults.
#[derive(Debug)]
pub struct NewsletterContent {
    geos: Map<String, Value>,
}

impl NewsletterContent {
    #[tracing::instrument(name = "Load newsletter content")]
    pub fn load(path: &Path) -> Result<Self, BizErrorEnum> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("Failed to read {}: {:?}", path.display(), e);
            BizErrorEnum::ReadContentFileError(e)
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, BizErrorEnum> {
        let geos = serde_json::from_str(content).map_err(|e| {
            tracing::error!("Failed to parse newsletter content: {:?}", e);
            BizErrorEnum::ParseContentFileError(e)
        })?;
        Ok(Self { geos })
    }

    /// The geo block with the translation for `language_code` merged in.
    pub fn for_language(&self, geo: &str, language_code: &str) -> Result<NewsletterData, BizErrorEnum> {
        let geo = geo.to_lowercase();
        let block = self
            .geos
            .iter()
            .find(|(key, _)| key.to_lowercase() == geo)
            .map(|(_, block)| block)
            .ok_or_else(|| BizErrorEnum::GeoNotResolved(geo.clone()))?;
        let block = match block {
            Value::Object(block) if !block.is_empty() => block,
            _ => return Err(BizErrorEnum::GeoHasNoContent(geo)),
        };

        let mut merged = Value::Object(block.clone());
        if let Value::Object(map) = &mut merged {
            map.remove(TRANSLATIONS_KEY);
        }
        if let Some(translation) = block
            .get(TRANSLATIONS_KEY)
            .and_then(|translations| translations.get(language_code))
        {
            deep_merge(&mut merged, translation);
        }

        serde_json::from_value(merged).map_err(|e| {
            tracing::error!("Content for {} is malformed: {:?}", geo, e);
            BizErrorEnum::InvalidGeoContent { geo, source: e }
        })
    }
}

/// Objects merge key by key, equal-length arrays element-wise, anything
/// else is replaced.
fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(overlay)) if base.len() == overlay.len() => {
            for (existing, value) in base.iter_mut().zip(overlay) {
                deep_merge(existing, value);
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
