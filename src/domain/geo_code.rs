use crate::error::BizErrorEnum;
use std::fmt::{Display, Formatter};

/// A geo as typed on the command line: `ci` or `ci-fr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoCode {
    base: String,
    language: Option<String>,
}

impl GeoCode {
    pub fn parse(geo: &str) -> Result<Self, BizErrorEnum> {
        let geo = geo.trim().to_lowercase();
        let mut parts = geo.splitn(2, '-');
        let base = parts
            .next()
            .filter(|base| !base.is_empty())
            .ok_or_else(|| BizErrorEnum::GeoNotResolved(geo.clone()))?;
        let language = match parts.next() {
            None => None,
            Some(language) if !language.is_empty() => Some(language.to_string()),
            Some(_) => return Err(BizErrorEnum::GeoNotResolved(geo.clone())),
        };

        Ok(Self {
            base: base.to_string(),
            language,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl Display for GeoCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.language {
            Some(language) => write!(f, "{}-{}", self.base, language),
            None => write!(f, "{}", self.base),
        }
    }
}
