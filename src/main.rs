// folio command line.
// Runs the store proxy or prints collections read through the document store.

use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use folio::config::{ClientConfig, ProxyConfig};
use folio::{Result, WorkCategory, proxy, store};

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Portfolio content store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the store proxy in front of the configured gist.
    Serve,
    /// Print works in display order.
    Works {
        /// Only works in this category (design, websites, apps, presentations).
        #[arg(long)]
        category: Option<WorkCategory>,
    },
    /// Print gallery images.
    Gallery,
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve => proxy::serve(ProxyConfig::from_env()?).await,
        Command::Works { category } => {
            let store = store::connect(&ClientConfig::from_env()?)?;
            let works = match category {
                Some(category) => store.get_works_by_category(category).await?,
                None => store.get_works_sorted().await?,
            };
            print_json(&works)
        }
        Command::Gallery => {
            let store = store::connect(&ClientConfig::from_env()?)?;
            print_json(&store.get_gallery_images().await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
