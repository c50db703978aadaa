use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "Local Library catalog server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate the database and serve the web application
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Insert the sample catalog when the database has no authors
    Seed,
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load libris settings")?;

    if let Command::Config = cli.command {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    libris_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => libris_app::bootstrap::serve(settings).await?,
        Command::Migrate => {
            let applied = libris_app::bootstrap::migrate(&settings).await?;
            tracing::info!(applied, "migrations applied");
        }
        Command::Seed => {
            let report = libris_app::bootstrap::seed(&settings).await?;
            tracing::info!(?report, "seed finished");
        }
        Command::Config => {}
    }

    Ok(())
}
