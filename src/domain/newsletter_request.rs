use crate::domain::{ImageSource, NewsletterLink, NewsletterText};

#[derive(Debug, thiserror::Error)]
pub enum InvalidReason {
    #[error("{0} is empty.")]
    FieldIsEmpty(String),

    #[error("{0} is too long.")]
    FieldIsTooLong(String),

    #[error("{0} is not a valid http(s) link.")]
    LinkIsMalformed(String),

    #[error("{0} is required.")]
    ImageIsMissing(String),

    #[error("{0} is not a valid image.")]
    ImageIsMalformed(String),

    #[error("{0} must be an http(s) URL or an uploaded image.")]
    ImageIsLocalPath(String),

    #[error("At most {max} stories are supported, got {actual}.")]
    TooManyStories { max: usize, actual: usize },
}

/// A call-to-action button.
#[derive(Debug, Clone)]
pub struct Cta {
    pub label: NewsletterText,
    pub link: NewsletterLink,
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub image: ImageSource,
    pub image_alt: NewsletterText,
    pub headline: NewsletterText,
    pub description: NewsletterText,
    pub link: Option<NewsletterLink>,
    pub cta: Option<Cta>,
}

#[derive(Debug, Clone)]
pub struct Story {
    pub image: ImageSource,
    pub image_alt: NewsletterText,
    pub headline: NewsletterText,
    pub description: NewsletterText,
    pub link: NewsletterLink,
    pub cta: Option<Cta>,
}

/// A validated form submission; the country comes from the session.
#[derive(Debug, Clone)]
pub struct NewsletterRequest {
    pub languages: Vec<String>,
    pub hero: Hero,
    pub stories: Vec<Story>,
    pub ctas: Vec<Cta>,
}

/// The fixed file name each form image is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImageSlot {
    Hero,
    Story(usize),
}

impl ImageSlot {
    /// `img-hero`, `img-story1`, `img-story2`.
    pub fn file_stem(&self) -> String {
        match self {
            ImageSlot::Hero => "img-hero".to_string(),
            ImageSlot::Story(index) => format!("img-story{}", index + 1),
        }
    }

    /// The form field the image was submitted in.
    pub fn field(&self) -> String {
        match self {
            ImageSlot::Hero => "hero.image".to_string(),
            ImageSlot::Story(index) => format!("stories[{}].image", index + 1),
        }
    }
}

impl NewsletterRequest {
    /// Every image the request references, with the slot it is stored under.
    pub fn images(&self) -> Vec<(ImageSlot, &ImageSource)> {
        std::iter::once((ImageSlot::Hero, &self.hero.image))
            .chain(
                self.stories
                    .iter()
                    .enumerate()
                    .map(|(index, story)| (ImageSlot::Story(index), &story.image)),
            )
            .collect()
    }

    /// Browsers submit URLs or inline payloads; paths on the server's disk
    /// are only accepted from the content file.
    pub fn reject_local_images(&self) -> Result<(), InvalidReason> {
        match self
            .images()
            .into_iter()
            .find(|(_, source)| matches!(source, ImageSource::Local(_)))
        {
            Some((slot, _)) => Err(InvalidReason::ImageIsLocalPath(slot.field())),
            None => Ok(()),
        }
    }
}
