mod country;
mod country_registry;
mod generated_newsletter;
mod geo_code;
mod image_source;
mod newsletter_link;
mod newsletter_request;
mod newsletter_text;

pub use country::*;
pub use country_registry::CountryRegistry;
pub use generated_newsletter::GeneratedNewsletter;
pub use geo_code::GeoCode;
pub use image_source::ImageSource;
pub use newsletter_link::NewsletterLink;
pub use newsletter_request::*;
pub use newsletter_text::NewsletterText;
