/// environment variable
pub const LOCAL_ENVIRONMENT: &str = "local";
pub const PRODUCTION_ENVIRONMENT: &str = "production";

/// session keys
pub const SESSION_SELECTED_COUNTRY: &str = "selected_country";
pub const SESSION_UPLOAD_ID: &str = "upload_session_id";
pub const SESSION_IMAGE_URLS: &str = "mailchimp_image_urls";

/// length of the per-session image folder name
pub const UPLOAD_SESSION_ID_LENGTH: usize = 8;

/// mailchimp credentials file keys
pub const MAILCHIMP_API_KEY: &str = "MAILCHIMP_API_KEY";
pub const MAILCHIMP_SERVER_PREFIX: &str = "MAILCHIMP_SERVER_PREFIX";

/// mailchimp basic auth ignores the username
pub const MAILCHIMP_AUTH_USER: &str = "anystring";

/// newsletter template registered in tera
pub const NEWSLETTER_TEMPLATE: &str = "newsletter_template.html";

/// generated files
pub const NEWSLETTER_FILE_PREFIX: &str = "newsletter";
pub const MAILCHIMP_VERSIONS_DIR: &str = "mailchimp_versions";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// image folders, relative to the static root
pub const BRAND_IMAGES_DIR: &str = "images/brand";
pub const USER_IMAGES_DIR: &str = "images/user-images";

/// files the uploader will pick up
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];

/// at most two stories fit the layout
pub const MAX_STORIES: usize = 2;

/// validate newsletter text
pub const MAX_HEADLINE_GRAPHEMES: usize = 256;
pub const MAX_ALT_TEXT_GRAPHEMES: usize = 256;
pub const MAX_DESCRIPTION_GRAPHEMES: usize = 4096;
pub const MAX_CTA_LABEL_GRAPHEMES: usize = 64;
