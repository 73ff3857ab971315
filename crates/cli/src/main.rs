use anyhow::Context;
use booklib_app::url_processor::UrlProcessor;
use booklib_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// booklib command-line interface
#[derive(Debug, Parser)]
#[command(name = "booklib", version, about = "Book catalog service and URL tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Normalize a URL offline and print the result
    CleanUrl {
        /// canonical, redirection or all (case-insensitive)
        #[arg(short, long)]
        operation: String,
        url: String,
    },
    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load booklib settings")?;

    match cli.command {
        Command::Serve => {
            booklib_telemetry::init(&settings.telemetry);
            booklib_app::bootstrap::serve(&settings).await
        }
        Command::Migrate => {
            booklib_telemetry::init(&settings.telemetry);
            let applied = booklib_app::bootstrap::migrate_only(&settings).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::CleanUrl { operation, url } => {
            let processor = UrlProcessor::new(&settings.url_processor);
            let cleaned = processor.clean_url(&operation, &url)?;
            println!("{cleaned}");
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
