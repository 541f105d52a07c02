mod countries;
mod credentials;
mod generate;
mod health_check;
mod helpers;
mod upload;
