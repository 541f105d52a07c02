use crate::domain::{CountryRegistry, NewsletterRequest};
use crate::error::BizErrorEnum;
use crate::generator::NewsletterGenerator;
use crate::middleware::SelectedCountry;
use crate::request::NewsletterData;
use crate::session_state::TypedSession;
use crate::{telemetry, utils};
use actix_web::{web, HttpResponse};
use serde_json::json;

#[tracing::instrument(
    name = "/api/generate-newsletter: Generate newsletters",
    skip_all,
    fields(country = tracing::field::Empty, upload_id = tracing::field::Empty)
)]
pub async fn generate_newsletter(
    body: web::Json<NewsletterData>,
    session: TypedSession,
    country: web::ReqData<SelectedCountry>,
    registry: web::Data<CountryRegistry>,
    generator: web::Data<NewsletterGenerator>,
) -> Result<HttpResponse, BizErrorEnum> {
    telemetry::record_field("country", &country);
    let request: NewsletterRequest = body.into_inner().try_into()?;
    request.reject_local_images()?;
    let country = registry.country(&country)?;
    let languages = country.select_languages(&request.languages)?;

    let upload_id = utils::upload_session_id(&session)?;
    telemetry::record_field("upload_id", &upload_id);

    let generated = generator
        .generate(&upload_id, country, &languages, &request)
        .await?;
    // The images behind any earlier mapping were just replaced.
    session.clear_image_urls();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "country": country.name,
        "message": format!("Generated {} newsletter(s) for {}.", generated.len(), country.name),
        "files": generated,
    })))
}
