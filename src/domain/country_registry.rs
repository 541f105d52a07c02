use crate::domain::{Country, GeoCode, Language, TextDirection};
use crate::error::BizErrorEnum;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountryEntry {
    country_code: String,
    #[serde(default)]
    languages: BTreeMap<String, LanguageEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LanguageEntry {
    language_code: String,
    locale: String,
    #[serde(default)]
    script_direction: TextDirection,
    preferred_name: Option<String>,
}

/// Country and language reference data, loaded once at startup.
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    countries: Vec<Country>,
}

impl CountryRegistry {
    #[tracing::instrument(name = "Load country registry")]
    pub fn load(path: &Path) -> Result<Self, BizErrorEnum> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("Failed to read {}: {:?}", path.display(), e);
            BizErrorEnum::ReadCountryDataError(e)
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, BizErrorEnum> {
        let entries: BTreeMap<String, CountryEntry> = serde_json::from_str(raw).map_err(|e| {
            tracing::error!("Failed to parse country data: {:?}", e);
            BizErrorEnum::ParseCountryDataError(e)
        })?;

        let countries = entries
            .into_iter()
            .map(|(name, entry)| Country {
                name,
                code: entry.country_code,
                languages: entry
                    .languages
                    .into_iter()
                    .map(|(name, language)| Language {
                        name,
                        code: language.language_code,
                        locale: language.locale,
                        direction: language.script_direction,
                        preferred_name: language.preferred_name,
                    })
                    .collect(),
            })
            .collect();

        Ok(Self { countries })
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Look a country up by display name or by code, ignoring case.
    pub fn country(&self, name_or_code: &str) -> Result<&Country, BizErrorEnum> {
        let needle = name_or_code.trim();
        self.countries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(needle) || c.code.eq_ignore_ascii_case(needle))
            .ok_or_else(|| BizErrorEnum::UnknownCountry(needle.to_string()))
    }

    /// A base geo yields every language of the country, `geo-lang` exactly one.
    pub fn resolve_geo(&self, geo: &GeoCode) -> Result<(&Country, Vec<Language>), BizErrorEnum> {
        let country = self
            .countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(geo.base()))
            .ok_or_else(|| BizErrorEnum::GeoNotResolved(geo.to_string()))?;

        if country.languages.is_empty() {
            return Err(BizErrorEnum::GeoHasNoContent(geo.to_string()));
        }

        let languages = match geo.language() {
            None => country.languages.clone(),
            Some(code) => country
                .languages
                .iter()
                .filter(|l| l.code.eq_ignore_ascii_case(code))
                .cloned()
                .collect(),
        };
        if languages.is_empty() {
            return Err(BizErrorEnum::GeoNotResolved(geo.to_string()));
        }

        Ok((country, languages))
    }
}
