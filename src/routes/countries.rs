use crate::domain::CountryRegistry;
use crate::error::BizErrorEnum;
use crate::request::SelectCountryData;
use crate::session_state::TypedSession;
use crate::telemetry;
use actix_web::{web, HttpResponse};
use serde_json::json;

#[tracing::instrument(name = "/api/countries: List countries", skip_all)]
pub async fn list_countries(registry: web::Data<CountryRegistry>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "countries": registry.countries(),
    }))
}

#[tracing::instrument(
    name = "/api/select-country: Select a country",
    skip_all,
    fields(country = tracing::field::Empty)
)]
pub async fn select_country(
    body: web::Json<SelectCountryData>,
    session: TypedSession,
    registry: web::Data<CountryRegistry>,
) -> Result<HttpResponse, BizErrorEnum> {
    let SelectCountryData { country } = body.into_inner();
    if country.trim().is_empty() {
        return Err(BizErrorEnum::CountryNotSelected);
    }
    let country = registry.country(&country)?;
    telemetry::record_field("country", &country.name);

    session.insert_selected_country(&country.name)?;
    // Hosted URLs belong to the previous country's images.
    session.clear_image_urls();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "country": country.name,
        "redirect": "/build-newsletter",
    })))
}
