use crate::domain::{Country, GeneratedNewsletter, Language, NewsletterRequest};
use crate::error::BizErrorEnum;
use crate::image_store::ImageStore;
use crate::newsletter_store::NewsletterStore;
use crate::renderer::NewsletterRenderer;
use chrono::{DateTime, Local};

/// Images -> one rendered file per language.
#[derive(Debug)]
pub struct NewsletterGenerator {
    renderer: NewsletterRenderer,
    image_store: ImageStore,
    newsletter_store: NewsletterStore,
}

impl NewsletterGenerator {
    pub fn new(
        renderer: NewsletterRenderer,
        image_store: ImageStore,
        newsletter_store: NewsletterStore,
    ) -> Self {
        Self {
            renderer,
            image_store,
            newsletter_store,
        }
    }

    pub fn image_store(&self) -> &ImageStore {
        &self.image_store
    }

    pub fn newsletter_store(&self) -> &NewsletterStore {
        &self.newsletter_store
    }

    pub async fn generate(
        &self,
        session_id: &str,
        country: &Country,
        languages: &[Language],
        request: &NewsletterRequest,
    ) -> Result<Vec<GeneratedNewsletter>, BizErrorEnum> {
        self.generate_at(session_id, country, languages, request, &Local::now())
            .await
    }

    /// Every file written by one call carries `timestamp` in its name.
    #[tracing::instrument(
        name = "Generate newsletters",
        skip(self, country, languages, request, timestamp),
        fields(country = %country.name, languages = languages.len())
    )]
    pub async fn generate_at(
        &self,
        session_id: &str,
        country: &Country,
        languages: &[Language],
        request: &NewsletterRequest,
        timestamp: &DateTime<Local>,
    ) -> Result<Vec<GeneratedNewsletter>, BizErrorEnum> {
        let label = match languages {
            [] => return Err(BizErrorEnum::NoLanguageSelected(country.name.clone())),
            [language] => country.geo_language(language),
            _ => country.geo(),
        };
        let geo = country.geo();
        let images = self.image_store.resolve(session_id, &label, request).await?;

        let mut generated = Vec::with_capacity(languages.len());
        for language in languages {
            let geo_language = country.geo_language(language);
            let html = self.renderer.render(country, language, request, &images)?;
            let path = self
                .newsletter_store
                .write(&geo, &geo_language, timestamp, &html)?;
            tracing::info!("Generated {}", path.display());
            generated.push(GeneratedNewsletter {
                geo: geo_language,
                language: language.name.clone(),
                path,
                html,
            });
        }
        Ok(generated)
    }
}
