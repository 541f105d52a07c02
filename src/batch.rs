use crate::content::NewsletterContent;
use crate::domain::{CountryRegistry, GeneratedNewsletter, GeoCode, NewsletterRequest};
use crate::error::BizErrorEnum;
use crate::generator::NewsletterGenerator;
use chrono::Local;

/// Image folders of command line runs are named `cli-<geo-language>`.
const CLI_SESSION_PREFIX: &str = "cli";

/// Generate every language of `geo` (or the one language of `ci-fr`) from
/// the content file. All files of a run share one timestamp.
#[tracing::instrument(name = "Generate geo from content file", skip(registry, content, generator))]
pub async fn generate_geo(
    registry: &CountryRegistry,
    content: &NewsletterContent,
    generator: &NewsletterGenerator,
    geo: &str,
) -> Result<Vec<GeneratedNewsletter>, BizErrorEnum> {
    let geo = GeoCode::parse(geo)?;
    let (country, languages) = registry.resolve_geo(&geo)?;
    let timestamp = Local::now();

    let mut generated = Vec::with_capacity(languages.len());
    for language in &languages {
        let data = content.for_language(&country.geo(), &language.code)?;
        let request = NewsletterRequest::try_from(data)?;
        let session_id = format!("{}-{}", CLI_SESSION_PREFIX, country.geo_language(language));
        let newsletters = generator
            .generate_at(
                &session_id,
                country,
                std::slice::from_ref(language),
                &request,
                &timestamp,
            )
            .await?;
        generated.extend(newsletters);
    }
    Ok(generated)
}
