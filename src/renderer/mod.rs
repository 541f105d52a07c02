use crate::constant::NEWSLETTER_TEMPLATE;
use crate::domain::{Country, Cta, ImageSlot, Language, NewsletterRequest};
use crate::error::BizErrorEnum;
use crate::image_store::ResolvedImages;
use chrono::Datelike;
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

const EMBEDDED_TEMPLATE: &str = include_str!("newsletter_template.html");

#[derive(Debug, Serialize)]
struct CtaContext<'a> {
    label: &'a str,
    link: &'a str,
}

#[derive(Debug, Serialize)]
struct HeroContext<'a> {
    image_src: &'a str,
    image_alt: &'a str,
    headline: &'a str,
    description: &'a str,
    link: Option<&'a str>,
    cta: Option<CtaContext<'a>>,
}

#[derive(Debug, Serialize)]
struct StoryContext<'a> {
    image_src: &'a str,
    image_alt: &'a str,
    headline: &'a str,
    description: &'a str,
    link: &'a str,
    cta: Option<CtaContext<'a>>,
}

impl<'a> From<&'a Cta> for CtaContext<'a> {
    fn from(cta: &'a Cta) -> Self {
        CtaContext {
            label: cta.label.as_ref(),
            link: cta.link.as_ref(),
        }
    }
}

/// Renders one HTML newsletter per language.
///
/// Text is escaped by Tera; links and image sources are already normalized
/// and are emitted with `| safe`.
#[derive(Debug)]
pub struct NewsletterRenderer {
    tera: Tera,
}

impl NewsletterRenderer {
    /// Uses `<template_dir>/newsletter_template.html` when present, the
    /// built-in template otherwise.
    pub fn new(template_dir: Option<&Path>) -> Result<Self, BizErrorEnum> {
        let override_path = template_dir
            .map(|dir| dir.join(NEWSLETTER_TEMPLATE))
            .filter(|path| path.is_file());
        let source = match override_path {
            Some(path) => {
                tracing::info!("Using newsletter template {}", path.display());
                std::fs::read_to_string(&path).map_err(|e| {
                    tracing::error!("Failed to read {}: {:?}", path.display(), e);
                    BizErrorEnum::ReadNewsletterError(e)
                })?
            }
            None => EMBEDDED_TEMPLATE.to_string(),
        };

        let mut tera = Tera::default();
        tera.add_raw_template(NEWSLETTER_TEMPLATE, &source)
            .map_err(|e| {
                tracing::error!("Failed to parse newsletter template: {:?}", e);
                BizErrorEnum::BuildTemplateError(e)
            })?;
        Ok(Self { tera })
    }

    #[tracing::instrument(
        name = "Render newsletter",
        skip(self, country, request, images),
        fields(geo = %country.geo_language(language))
    )]
    pub fn render(
        &self,
        country: &Country,
        language: &Language,
        request: &NewsletterRequest,
        images: &ResolvedImages,
    ) -> Result<String, BizErrorEnum> {
        let hero = &request.hero;
        let hero = HeroContext {
            image_src: images.src(ImageSlot::Hero),
            image_alt: hero.image_alt.as_ref(),
            headline: hero.headline.as_ref(),
            description: hero.description.as_ref(),
            link: hero.link.as_ref().map(AsRef::as_ref),
            cta: hero.cta.as_ref().map(CtaContext::from),
        };
        let stories: Vec<StoryContext> = request
            .stories
            .iter()
            .enumerate()
            .map(|(index, story)| StoryContext {
                image_src: images.src(ImageSlot::Story(index)),
                image_alt: story.image_alt.as_ref(),
                headline: story.headline.as_ref(),
                description: story.description.as_ref(),
                link: story.link.as_ref(),
                cta: story.cta.as_ref().map(CtaContext::from),
            })
            .collect();
        let ctas: Vec<CtaContext> = request.ctas.iter().map(CtaContext::from).collect();

        let mut context = Context::new();
        context.insert("lang", &language.code);
        context.insert("locale", &language.locale);
        context.insert("dir", language.direction.as_str());
        context.insert("language_name", &language.name);
        context.insert("country_name", &country.display_name(language));
        context.insert("logo_src", &images.logo_src);
        context.insert("hero", &hero);
        context.insert("stories", &stories);
        context.insert("ctas", &ctas);
        context.insert("year", &chrono::Local::now().year());

        self.tera.render(NEWSLETTER_TEMPLATE, &context).map_err(|e| {
            tracing::error!("Failed to render newsletter: {:?}", e);
            BizErrorEnum::RenderTemplateError(e)
        })
    }
}
