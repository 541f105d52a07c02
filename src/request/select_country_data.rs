use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct SelectCountryData {
    #[serde(default)]
    pub country: String,
}
