use newsletter_generator::configuration;
use newsletter_generator::error::BizErrorEnum;
use newsletter_generator::startup::Application;
use newsletter_generator::telemetry;

#[tokio::main]
async fn main() -> Result<(), BizErrorEnum> {
    let subscriber = telemetry::get_subscriber(
        "newsletter-generator".into(),
        "info".into(),
        std::io::stdout,
    );
    telemetry::init_subscriber(subscriber)?;

    let config = configuration::get_configuration()?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
