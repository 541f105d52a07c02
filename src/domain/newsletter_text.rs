use crate::domain::InvalidReason;
use crate::utils;
use unicode_segmentation::UnicodeSegmentation;

/// A required, non-blank piece of newsletter copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterText(String);

impl NewsletterText {
    /// `field` names the form field in the error, `max_graphemes` bounds the
    /// user-perceived length.
    pub fn parse(text: String, field: &str, max_graphemes: usize) -> Result<Self, InvalidReason> {
        if utils::is_blank(&text) {
            return Err(InvalidReason::FieldIsEmpty(field.to_string()));
        }

        // `å` is one grapheme made of two chars; count what the reader sees.
        if text.graphemes(true).count() > max_graphemes {
            return Err(InvalidReason::FieldIsTooLong(field.to_string()));
        }

        Ok(Self(text.trim().to_string()))
    }
}

impl AsRef<str> for NewsletterText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
