//! `mobiledoc cards` command implementation.

use std::path::PathBuf;

use clap::Args;
use mobiledoc_config::Config;

use super::configured_registries;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the cards command.
#[derive(Args)]
pub(crate) struct CardsArgs {
    /// Path to configuration file (default: auto-discover mobiledoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CardsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let (cards, atoms) = configured_registries(&config, &output);

        output.info("Cards:");
        for name in cards.names() {
            output.info(&format!("  {name}"));
        }
        output.info("Atoms:");
        for name in atoms.names() {
            output.info(&format!("  {name}"));
        }
        Ok(())
    }
}
