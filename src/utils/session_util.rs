use crate::constant::UPLOAD_SESSION_ID_LENGTH;
use crate::error::BizErrorEnum;
use crate::session_state::TypedSession;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub fn selected_country(session: &TypedSession) -> Result<String, BizErrorEnum> {
    match session.get_selected_country() {
        Err(_) => Err(BizErrorEnum::CountryNotSelected),
        Ok(country) => country.ok_or(BizErrorEnum::CountryNotSelected),
    }
}

/// The id naming this browser session's image folder, created on first use.
pub fn upload_session_id(session: &TypedSession) -> Result<String, BizErrorEnum> {
    if let Some(upload_id) = session.get_upload_id()? {
        return Ok(upload_id);
    }
    let upload_id = generate_upload_session_id();
    session.insert_upload_id(&upload_id)?;
    Ok(upload_id)
}

/// Generate a random 8-characters-long lowercase alphanumeric id.
pub fn generate_upload_session_id() -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(|c| char::from(c).to_ascii_lowercase())
        .take(UPLOAD_SESSION_ID_LENGTH)
        .collect()
}
