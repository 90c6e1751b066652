use anyhow::Context;
use ragdesk::cli::{commands, output::Output, Cli};
use ragdesk::utils::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let no_color = cli.no_color;

    let default_level = if cli.verbose { "ragdesk=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    if let Err(e) = commands::run(cli, config).await {
        let out = if no_color {
            Output::no_color()
        } else {
            Output::new()
        };
        out.error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
