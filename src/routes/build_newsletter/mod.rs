use crate::domain::CountryRegistry;
use crate::error::BizErrorEnum;
use crate::middleware::SelectedCountry;
use crate::{telemetry, utils};
use actix_web::{web, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

#[tracing::instrument(name = "/build-newsletter: Get newsletter form", skip_all, fields(country = tracing::field::Empty))]
pub async fn build_newsletter_form(
    flash_msgs: IncomingFlashMessages,
    country: web::ReqData<SelectedCountry>,
    registry: web::Data<CountryRegistry>,
) -> Result<HttpResponse, BizErrorEnum> {
    telemetry::record_field("country", &country);
    let country = registry.country(&country)?;

    let mut msg_html = String::new();
    for msg in flash_msgs.iter() {
        let _ = writeln!(
            msg_html,
            "<p><i>{}</i></p>",
            htmlescape::encode_minimal(msg.content())
        );
    }

    let mut languages = String::new();
    for language in &country.languages {
        let _ = writeln!(
            languages,
            r#"<label><input type="checkbox" name="language" value="{}"> {}</label>"#,
            htmlescape::encode_attribute(&language.code),
            htmlescape::encode_minimal(&language.name)
        );
    }

    let body = include_str!("build_newsletter.html")
        .replace("{country}", &htmlescape::encode_minimal(&country.name))
        .replace("{messages}", &msg_html)
        .replace("{languages}", &languages);
    Ok(utils::ok_to(body))
}
