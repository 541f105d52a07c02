use crate::configuration::MailchimpSettings;
use crate::domain::CountryRegistry;
use crate::error::BizErrorEnum;
use crate::generator::NewsletterGenerator;
use crate::mailchimp::{
    url_mapping, CredentialStore, ImageUploader, MailchimpClient, TemplateUploader, UploadedImage,
};
use crate::middleware::SelectedCountry;
use crate::session_state::TypedSession;
use crate::{telemetry, utils};
use actix_web::{web, HttpResponse};
use serde_json::json;

fn mailchimp_client(
    credential_store: &CredentialStore,
    settings: &MailchimpSettings,
) -> Result<MailchimpClient, BizErrorEnum> {
    let credentials = credential_store
        .load()?
        .ok_or(BizErrorEnum::MailchimpCredentialsMissing)?;
    let base_url = settings.api_base_url(credentials.server_prefix());
    MailchimpClient::new(base_url, credentials, settings.timeout())
}

async fn upload_images_for_session(
    client: &MailchimpClient,
    session: &TypedSession,
    settings: &MailchimpSettings,
    generator: &NewsletterGenerator,
) -> Result<Vec<UploadedImage>, BizErrorEnum> {
    let upload_id = utils::upload_session_id(session)?;
    telemetry::record_field("upload_id", &upload_id);
    let images = ImageUploader::new(
        client,
        generator.image_store().layout(),
        settings.max_image_bytes,
    )
    .upload(&upload_id)
    .await?;
    session.insert_image_urls(&url_mapping(&images))?;
    Ok(images)
}

#[tracing::instrument(
    name = "/api/upload-images: Upload images to Mailchimp",
    skip_all,
    fields(country = tracing::field::Empty, upload_id = tracing::field::Empty)
)]
pub async fn upload_images(
    session: TypedSession,
    country: web::ReqData<SelectedCountry>,
    credential_store: web::Data<CredentialStore>,
    settings: web::Data<MailchimpSettings>,
    generator: web::Data<NewsletterGenerator>,
) -> Result<HttpResponse, BizErrorEnum> {
    telemetry::record_field("country", &country);
    let client = mailchimp_client(&credential_store, &settings)?;
    let images = upload_images_for_session(&client, &session, &settings, &generator).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Uploaded {} image(s).", images.len()),
        "images": images,
    })))
}

#[tracing::instrument(
    name = "/api/upload-newsletter: Upload newsletters to Mailchimp",
    skip_all,
    fields(country = tracing::field::Empty, upload_id = tracing::field::Empty)
)]
pub async fn upload_newsletter(
    session: TypedSession,
    country: web::ReqData<SelectedCountry>,
    registry: web::Data<CountryRegistry>,
    credential_store: web::Data<CredentialStore>,
    settings: web::Data<MailchimpSettings>,
    generator: web::Data<NewsletterGenerator>,
) -> Result<HttpResponse, BizErrorEnum> {
    telemetry::record_field("country", &country);
    let country = registry.country(&country)?;
    let client = mailchimp_client(&credential_store, &settings)?;

    let (mapping, images_uploaded) = match session.get_image_urls()? {
        Some(mapping) if !mapping.is_empty() => (mapping, 0),
        _ => {
            let images =
                upload_images_for_session(&client, &session, &settings, &generator).await?;
            (url_mapping(&images), images.len())
        }
    };

    let templates = TemplateUploader::new(
        &client,
        generator.newsletter_store(),
        generator.image_store().layout().html_static_prefix(),
    )
    .upload(&country.name, &country.geo(), &mapping)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Uploaded {} template(s) for {}.", templates.len(), country.name),
        "imagesUploaded": images_uploaded,
        "templates": templates,
    })))
}
