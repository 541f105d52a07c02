use crate::error::BizErrorEnum;
use crate::session_state::TypedSession;
use crate::utils;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{FromRequest, HttpMessage};
use actix_web_flash_messages::FlashMessage;
use actix_web_lab::middleware::Next;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// The country stored in the session, available to handlers as `web::ReqData<SelectedCountry>`.
#[derive(Clone, Debug)]
pub struct SelectedCountry(String);

impl Display for SelectedCountry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl Deref for SelectedCountry {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

async fn selected_country(req: &mut ServiceRequest) -> Result<Option<String>, actix_web::Error> {
    let session = {
        let (http_request, payload) = req.parts_mut();
        TypedSession::from_request(http_request, payload).await
    }?;
    Ok(utils::selected_country(&session).ok())
}

/// API routes answer `400` with a JSON error when no country was selected.
pub async fn require_selected_country(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    match selected_country(&mut req).await? {
        Some(country) => {
            req.extensions_mut().insert(SelectedCountry(country));
            next.call(req).await
        }
        None => Err(BizErrorEnum::CountryNotSelected.into()),
    }
}

/// Pages send the user back to the country picker instead.
///
/// The redirect is a regular response so the flash message cookie gets set.
pub async fn redirect_without_country(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    match selected_country(&mut req).await? {
        Some(country) => {
            req.extensions_mut().insert(SelectedCountry(country));
            next.call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        }
        None => {
            tracing::warn!("No country selected, redirecting to the country picker");
            FlashMessage::error(BizErrorEnum::CountryNotSelected.to_string()).send();
            let response = utils::redirect_to("/");
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}
