use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use muse::{Commands, Container, ContainerConfig, DomainError, Router};

#[derive(Parser)]
#[command(name = "muse")]
#[command(author, version, about = "Turn a quote into matching artwork", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.muse-cli")]
    data_dir: String,

    /// Replace the model, image host and galleries with canned fakes
    #[arg(long, global = true, hide = true)]
    mock_services: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Error: {e}");
            if let Some(hint) = hint_for(&e) {
                eprintln!("  {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    // The state files create the directory on first write.
    let home = std::env::var("HOME").ok();
    let data_dir = expand_tilde(&cli.data_dir, home.as_deref());

    let container = Container::new(ContainerConfig {
        data_dir,
        mock_services: cli.mock_services,
    })?;
    let router = Router::new(&container);

    router.route(cli.command).await
}

fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<DomainError>()? {
        DomainError::Configuration(_) => {
            Some("Set the missing environment variable or pick another --source.")
        }
        DomainError::Timeout(_) => Some("Try again with a larger --timeout."),
        DomainError::NotFound(_) => Some("Run 'muse search \"<quote>\"' to create new results."),
        DomainError::ImageFetch(_) => Some("The image host may be down; try another result."),
        _ => None,
    }
}

fn expand_tilde(path: &str, home: Option<&str>) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = home {
            if path == "~" {
                return home.to_string();
            }
            return path.replacen("~", home, 1);
        }
    }
    path.to_string()
}
