use crate::domain::CountryRegistry;
use crate::mailchimp::CredentialStore;
use crate::utils;
use actix_web::{web, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

#[tracing::instrument(name = "/: Homepage", skip_all)]
pub async fn home(
    flash_msgs: IncomingFlashMessages,
    registry: web::Data<CountryRegistry>,
    credential_store: web::Data<CredentialStore>,
) -> HttpResponse {
    let mut msg_html = String::new();
    for msg in flash_msgs.iter() {
        let _ = writeln!(
            msg_html,
            "<p><i>{}</i></p>",
            htmlescape::encode_minimal(msg.content())
        );
    }

    let mut options = String::new();
    for country in registry.countries() {
        let _ = writeln!(
            options,
            r#"<option value="{}">{}</option>"#,
            htmlescape::encode_attribute(&country.name),
            htmlescape::encode_minimal(&country.name)
        );
    }

    let credentials = if credential_store.present() {
        "Mailchimp credentials are configured."
    } else {
        "Mailchimp credentials are missing."
    };

    let body = include_str!("home.html")
        .replace("{messages}", &msg_html)
        .replace("{countries}", &options)
        .replace("{credentials}", credentials);
    utils::ok_to(body)
}
