mod build_newsletter;
mod countries;
mod credentials;
mod generate;
mod health_check;
mod home;
mod mailchimp;

// re-export
pub use build_newsletter::*;
pub use countries::*;
pub use credentials::*;
pub use generate::*;
pub use health_check::*;
pub use home::*;
pub use mailchimp::*;
