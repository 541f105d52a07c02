use crate::domain::InvalidReason;
use reqwest::Url;

/// An absolute `http(s)` link, stored in its normalized serialization so it
/// can be placed in an attribute without escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterLink(String);

impl NewsletterLink {
    pub fn parse(link: String, field: &str) -> Result<Self, InvalidReason> {
        let link = link.trim();
        if link.is_empty() {
            return Err(InvalidReason::FieldIsEmpty(field.to_string()));
        }

        if !validator::validate_url(link) {
            return Err(InvalidReason::LinkIsMalformed(field.to_string()));
        }

        let url =
            Url::parse(link).map_err(|_| InvalidReason::LinkIsMalformed(field.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(InvalidReason::LinkIsMalformed(field.to_string()));
        }

        Ok(Self(url.to_string()))
    }

    /// Optional links treat a blank value as absent.
    pub fn parse_optional(link: Option<String>, field: &str) -> Result<Option<Self>, InvalidReason> {
        match link {
            Some(link) if !link.trim().is_empty() => Self::parse(link, field).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for NewsletterLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
