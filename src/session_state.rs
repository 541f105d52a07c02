use crate::constant::{SESSION_IMAGE_URLS, SESSION_SELECTED_COUNTRY, SESSION_UPLOAD_ID};
use crate::error::BizErrorEnum;
use crate::mailchimp::UrlMapping;
use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::Ready;

/// Customize actix-web Extractor
pub struct TypedSession(Session);

impl TypedSession {
    pub fn insert_selected_country(&self, country: &str) -> Result<(), BizErrorEnum> {
        self.0
            .insert(SESSION_SELECTED_COUNTRY, country)
            .map_err(BizErrorEnum::ActixSessionInsertError)
    }

    pub fn get_selected_country(&self) -> Result<Option<String>, BizErrorEnum> {
        self.0
            .get(SESSION_SELECTED_COUNTRY)
            .map_err(BizErrorEnum::ActixSessionGetError)
    }

    pub fn insert_upload_id(&self, upload_id: &str) -> Result<(), BizErrorEnum> {
        self.0
            .insert(SESSION_UPLOAD_ID, upload_id)
            .map_err(BizErrorEnum::ActixSessionInsertError)
    }

    pub fn get_upload_id(&self) -> Result<Option<String>, BizErrorEnum> {
        self.0
            .get(SESSION_UPLOAD_ID)
            .map_err(BizErrorEnum::ActixSessionGetError)
    }

    pub fn insert_image_urls(&self, mapping: &UrlMapping) -> Result<(), BizErrorEnum> {
        self.0
            .insert(SESSION_IMAGE_URLS, mapping)
            .map_err(BizErrorEnum::ActixSessionInsertError)
    }

    pub fn get_image_urls(&self) -> Result<Option<UrlMapping>, BizErrorEnum> {
        self.0
            .get(SESSION_IMAGE_URLS)
            .map_err(BizErrorEnum::ActixSessionGetError)
    }

    /// Hosted URLs go stale as soon as the session images are replaced.
    pub fn clear_image_urls(&self) {
        self.0.remove(SESSION_IMAGE_URLS);
    }
}

/// Make TypedSession as an actix-web extractor
impl FromRequest for TypedSession {
    // This is a complicated way of saying
    // "We return the same error returned by the
    // implementation of `FromRequest` for `Session`".
    type Error = <Session as FromRequest>::Error;
    // We do not perform any I/O, so we wrap `TypedSession` into `Ready`
    // to convert it into a `Future` that resolves the first time it's polled.
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(Ok(TypedSession(req.get_session())))
    }
}
