use clap::Parser;
use newsletter_generator::batch::generate_geo;
use newsletter_generator::configuration;
use newsletter_generator::content::NewsletterContent;
use newsletter_generator::domain::CountryRegistry;
use newsletter_generator::error::BizErrorEnum;
use newsletter_generator::startup::build_generator;
use newsletter_generator::telemetry;
use std::path::PathBuf;

/// Generate every language variant of a geo from the content file
#[derive(Parser, Debug)]
#[command(name = "generate_newsletter", version, about)]
struct Cli {
    /// Geo code, e.g. `ci`, or `ci-fr` for a single language
    geo: String,

    /// Content file, defaults to `generator.content_path` from configuration
    #[arg(short, long)]
    content: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), BizErrorEnum> {
    let cli = Cli::parse();

    let subscriber =
        telemetry::get_subscriber("generate_newsletter".into(), "warn".into(), std::io::stderr);
    telemetry::init_subscriber(subscriber)?;

    let config = configuration::get_configuration()?;
    let registry = CountryRegistry::load(&config.generator.data_path)?;
    let content_path = cli
        .content
        .unwrap_or_else(|| config.generator.content_path.clone());
    let content = NewsletterContent::load(&content_path)?;
    let generator = build_generator(&config.generator, &config.mailchimp)?;

    for newsletter in generate_geo(&registry, &content, &generator, &cli.geo).await? {
        println!("{} -> {}", newsletter.geo, newsletter.path.display());
    }

    Ok(())
}
