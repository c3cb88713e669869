use anyhow::Context;
use bookshelf::Application;
use bookshelf_kernel::settings::{Settings, StoreKind};
use clap::{Parser, Subcommand};

/// Operator commands for the Bookshelf service
#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database sequence and tables, then exit
    InitSchema,
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            bookshelf::serve(&settings).await
        }
        Command::InitSchema => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            if settings.database.store != StoreKind::Postgres {
                anyhow::bail!("init-schema requires database.store = \"postgres\"");
            }
            let app = Application::build(&settings).await?;
            app.apply_schema().await?;
            app.registry.stop_all().await?;
            tracing::info!("schema initialized");
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["bookshelf-cli"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["bookshelf-cli", "init-schema"]);
        assert!(matches!(cli.command, Some(Command::InitSchema)));
    }
}
