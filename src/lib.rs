pub mod batch;
pub mod configuration;
pub mod constant;
pub mod content;
pub mod domain;
pub mod error;
pub mod generator;
pub mod image_store;
pub mod mailchimp;
pub mod middleware;
pub mod newsletter_store;
pub mod renderer;
pub mod request;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod telemetry;
pub mod utils;
