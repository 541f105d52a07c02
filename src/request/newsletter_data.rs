use crate::constant::{
    MAX_ALT_TEXT_GRAPHEMES, MAX_CTA_LABEL_GRAPHEMES, MAX_DESCRIPTION_GRAPHEMES,
    MAX_HEADLINE_GRAPHEMES, MAX_STORIES,
};
use crate::domain::{
    Cta, Hero, ImageSource, InvalidReason, NewsletterLink, NewsletterRequest, NewsletterText,
    Story,
};
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterData {
    #[serde(default)]
    pub languages: Vec<String>,
    pub hero: HeroData,
    #[serde(default)]
    pub stories: Vec<StoryData>,
    #[serde(default)]
    pub ctas: Vec<CtaData>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_alt: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    pub url: Option<String>,
    pub cta: Option<CtaData>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryData {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_alt: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    pub cta: Option<CtaData>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CtaData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: String,
}

impl CtaData {
    fn parse(self, field: &str) -> Result<Cta, InvalidReason> {
        Ok(Cta {
            label: NewsletterText::parse(
                self.text,
                &format!("{}.text", field),
                MAX_CTA_LABEL_GRAPHEMES,
            )?,
            link: NewsletterLink::parse(self.url, &format!("{}.url", field))?,
        })
    }

    /// A CTA with neither label nor link is treated as not filled in.
    fn parse_optional(cta: Option<CtaData>, field: &str) -> Result<Option<Cta>, InvalidReason> {
        match cta {
            Some(cta) if !(cta.text.trim().is_empty() && cta.url.trim().is_empty()) => {
                cta.parse(field).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl TryFrom<HeroData> for Hero {
    type Error = InvalidReason;

    fn try_from(hero: HeroData) -> Result<Self, Self::Error> {
        Ok(Hero {
            image: ImageSource::parse(hero.image, "hero.image")?,
            image_alt: NewsletterText::parse(hero.image_alt, "hero.imageAlt", MAX_ALT_TEXT_GRAPHEMES)?,
            headline: NewsletterText::parse(hero.headline, "hero.headline", MAX_HEADLINE_GRAPHEMES)?,
            description: NewsletterText::parse(
                hero.description,
                "hero.description",
                MAX_DESCRIPTION_GRAPHEMES,
            )?,
            link: NewsletterLink::parse_optional(hero.url, "hero.url")?,
            cta: CtaData::parse_optional(hero.cta, "hero.cta")?,
        })
    }
}

impl StoryData {
    fn parse(self, index: usize) -> Result<Story, InvalidReason> {
        let field = format!("stories[{}]", index + 1);
        Ok(Story {
            image: ImageSource::parse(self.image, &format!("{}.image", field))?,
            image_alt: NewsletterText::parse(
                self.image_alt,
                &format!("{}.imageAlt", field),
                MAX_ALT_TEXT_GRAPHEMES,
            )?,
            headline: NewsletterText::parse(
                self.headline,
                &format!("{}.headline", field),
                MAX_HEADLINE_GRAPHEMES,
            )?,
            description: NewsletterText::parse(
                self.description,
                &format!("{}.description", field),
                MAX_DESCRIPTION_GRAPHEMES,
            )?,
            link: NewsletterLink::parse(self.url, &format!("{}.url", field))?,
            cta: CtaData::parse_optional(self.cta, &format!("{}.cta", field))?,
        })
    }
}

impl TryFrom<NewsletterData> for NewsletterRequest {
    type Error = InvalidReason;

    fn try_from(data: NewsletterData) -> Result<Self, Self::Error> {
        if data.stories.len() > MAX_STORIES {
            return Err(InvalidReason::TooManyStories {
                max: MAX_STORIES,
                actual: data.stories.len(),
            });
        }

        let hero = data.hero.try_into()?;
        let stories = data
            .stories
            .into_iter()
            .enumerate()
            .map(|(index, story)| story.parse(index))
            .collect::<Result<Vec<_>, _>>()?;
        let ctas = data
            .ctas
            .into_iter()
            .enumerate()
            .map(|(index, cta)| cta.parse(&format!("ctas[{}]", index + 1)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewsletterRequest {
            languages: data.languages,
            hero,
            stories,
            ctas,
        })
    }
}
