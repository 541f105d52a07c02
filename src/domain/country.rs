use crate::error::BizErrorEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub name: String,
    pub code: String,
    pub locale: String,
    pub direction: TextDirection,
    pub preferred_name: Option<String>,
}

impl Language {
    /// Matches either the display name or the language code, ignoring case.
    pub fn matches(&self, name_or_code: &str) -> bool {
        let needle = name_or_code.trim();
        self.name.eq_ignore_ascii_case(needle) || self.code.eq_ignore_ascii_case(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub code: String,
    pub languages: Vec<Language>,
}

impl Country {
    /// Lowercase country code, used as the base geo and as the output folder name.
    pub fn geo(&self) -> String {
        self.code.to_lowercase()
    }

    /// `<geo>-<language code>`, e.g. `ci-fr`.
    pub fn geo_language(&self, language: &Language) -> String {
        format!("{}-{}", self.geo(), language.code.to_lowercase())
    }

    /// The country name as it should read in the given language.
    pub fn display_name<'a>(&'a self, language: &'a Language) -> &'a str {
        language.preferred_name.as_deref().unwrap_or(&self.name)
    }

    /// Resolve the languages a request asked for.
    ///
    /// An empty selection means every language of the country.
    /// Unknown entries are skipped; an empty result is an error.
    pub fn select_languages(&self, selected: &[String]) -> Result<Vec<Language>, BizErrorEnum> {
        let languages: Vec<Language> = if selected.iter().all(|s| s.trim().is_empty()) {
            self.languages.clone()
        } else {
            self.languages
                .iter()
                .filter(|language| selected.iter().any(|s| language.matches(s)))
                .cloned()
                .collect()
        };

        if languages.is_empty() {
            tracing::error!("No language of {} matches {:?}", self.name, selected);
            return Err(BizErrorEnum::NoLanguageSelected(self.name.clone()));
        }
        Ok(languages)
    }
}
