use crate::configuration::{GeneratorSettings, MailchimpSettings, Settings};
use crate::domain::CountryRegistry;
use crate::error::BizErrorEnum;
use crate::generator::NewsletterGenerator;
use crate::image_store::{ImageStore, StaticLayout};
use crate::mailchimp::CredentialStore;
use crate::newsletter_store::NewsletterStore;
use crate::renderer::NewsletterRenderer;
use crate::{middleware, routes, utils};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::http::StatusCode;
use actix_web::{error, web, App, HttpServer};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_lab::middleware::from_fn;
use secrecy::{ExposeSecret, Secret};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

// A new type to hold the newly built server and its port
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, BizErrorEnum> {
        let registry = CountryRegistry::load(&config.generator.data_path)?;
        let generator = build_generator(&config.generator, &config.mailchimp)?;
        let credential_store = CredentialStore::new(&config.mailchimp.credentials_path);

        // 0.0.0.0 as host to instruct our application to accept connections from any network interface,
        // not just the local one.
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address).map_err(|e| {
            tracing::error!("Failed to bind to TcpListener");
            BizErrorEnum::BindTcpListenerError(e)
        })?;
        let port = listener
            .local_addr()
            .map_err(BizErrorEnum::BindTcpListenerError)?
            .port();

        let server = run(
            listener,
            registry,
            generator,
            credential_store,
            config.mailchimp,
            config.application.hmac_secret,
            config.application.secure_cookies,
        )?;

        // We "save" the bound port in one of `Application`'s fields
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // A more expressive name that makes it clear that
    // this function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), BizErrorEnum> {
        self.server.await.map_err(|e| {
            tracing::error!("Failed to run server.");
            BizErrorEnum::RunServerError(e)
        })
    }
}

/// Wire renderer, image store and file store from configuration.
pub fn build_generator(
    generator: &GeneratorSettings,
    mailchimp: &MailchimpSettings,
) -> Result<NewsletterGenerator, BizErrorEnum> {
    let renderer = NewsletterRenderer::new(generator.template_dir.as_deref())?;
    let layout = StaticLayout::new(&generator.static_dir, &generator.html_static_prefix);
    let image_store = ImageStore::new(layout, generator.brand_logo.clone(), mailchimp.timeout())?;
    let newsletter_store = NewsletterStore::new(&generator.output_dir);
    Ok(NewsletterGenerator::new(
        renderer,
        image_store,
        newsletter_store,
    ))
}

fn run(
    listener: TcpListener,
    registry: CountryRegistry,
    generator: NewsletterGenerator,
    credential_store: CredentialStore,
    mailchimp_settings: MailchimpSettings,
    hmac_secret: Secret<String>,
    secure_cookies: bool,
) -> Result<Server, BizErrorEnum> {
    // Shared, read-only application state
    let registry = web::Data::new(registry);
    let generator = web::Data::new(generator);
    let credential_store = web::Data::new(credential_store);
    let mailchimp_settings = web::Data::new(mailchimp_settings);

    // Flash message, CookieMessageStore enforces that the cookie used as storage is signed
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    // Malformed JSON bodies get the same `{success, error}` shape as every other error
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = utils::json_error(StatusCode::BAD_REQUEST, &err.to_string());
        error::InternalError::from_response(err, response).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            // Middlewares are added using the `wrap` method on `App`
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .wrap(TracingLogger::default())
            .app_data(json_config.clone())
            .app_data(registry.clone())
            .app_data(generator.clone())
            .app_data(credential_store.clone())
            .app_data(mailchimp_settings.clone())
            .route("/", web::get().to(routes::home))
            .route("/health_check", web::get().to(routes::health_check))
            .service(
                web::resource("/build-newsletter")
                    .wrap(from_fn(middleware::redirect_without_country))
                    .route(web::get().to(routes::build_newsletter_form)),
            )
            .service(
                web::scope("/api")
                    .route("/countries", web::get().to(routes::list_countries))
                    .route("/select-country", web::post().to(routes::select_country))
                    .route("/check-credentials", web::get().to(routes::check_credentials))
                    .route("/save-credentials", web::post().to(routes::save_credentials))
                    .route(
                        "/test-mailchimp-connection",
                        web::post().to(routes::test_mailchimp_connection),
                    )
                    .service(
                        web::resource("/generate-newsletter")
                            .wrap(from_fn(middleware::require_selected_country))
                            .route(web::post().to(routes::generate_newsletter)),
                    )
                    .service(
                        web::resource("/upload-images")
                            .wrap(from_fn(middleware::require_selected_country))
                            .route(web::post().to(routes::upload_images)),
                    )
                    .service(
                        web::resource("/upload-newsletter")
                            .wrap(from_fn(middleware::require_selected_country))
                            .route(web::post().to(routes::upload_newsletter)),
                    ),
            )
    })
    .listen(listener)
    .map_err(|e| {
        tracing::error!("Failed to listen to TcpListener");
        BizErrorEnum::ListenTcpListenerError(e)
    })?
    .run();

    // No .await here!
    Ok(server)
}
