mod credentials_data;
mod newsletter_data;
mod select_country_data;

pub use credentials_data::CredentialsData;
pub use newsletter_data::*;
pub use select_country_data::SelectCountryData;
