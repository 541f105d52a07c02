mod client;
pub mod compressor;
mod credentials;
mod image_uploader;
mod template_uploader;
pub mod url_substituter;

pub use client::{AccountInfo, CreatedTemplate, MailchimpClient, UploadedFile};
pub use credentials::{CredentialStore, MailchimpCredentials};
pub use image_uploader::{url_mapping, ImageUploader, UploadedImage};
pub use template_uploader::{TemplateUploader, UploadedTemplate};
pub use url_substituter::UrlMapping;
