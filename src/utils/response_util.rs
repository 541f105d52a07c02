use actix_web::http::header::{ContentType, LOCATION};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;

pub fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

pub fn ok_to(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// `{"success": false, "error": "..."}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "error": message,
    }))
}
