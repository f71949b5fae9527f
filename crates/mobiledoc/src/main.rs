//! Mobiledoc CLI - renders mobiledoc documents to HTML.
//!
//! Provides commands for:
//! - `render`: Render a mobiledoc JSON file to HTML
//! - `cards`: List the cards and atoms available for rendering

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CardsArgs, RenderArgs};
use output::Output;

/// Mobiledoc to HTML renderer.
#[derive(Parser)]
#[command(name = "mobiledoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a mobiledoc document to HTML.
    Render(RenderArgs),
    /// List available cards and atoms.
    Cards(CardsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        default_filter(std::env::var("RUST_LOG").ok().as_deref())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Cards(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Filter from the `RUST_LOG` value when set and valid, otherwise WARN.
fn default_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
