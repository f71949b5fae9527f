//! `mobiledoc render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Args;
use mobiledoc_config::{CliSettings, Config};
use mobiledoc_renderer::{
    Mobiledoc, MobiledocConverter, RendererOptions, TocEntry, log_unknown_atom, log_unknown_card,
};

use super::configured_registries;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Mobiledoc JSON file to render (`-` reads stdin).
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Card render profile (overrides config).
    #[arg(short = 'r', long = "render-version", env = "MOBILEDOC_RENDER_VERSION")]
    render_version: Option<u32>,

    /// Print the heading outline to stderr.
    #[arg(long)]
    toc: bool,

    /// Path to configuration file (default: auto-discover mobiledoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            version: self.render_version,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let (cards, atoms) = configured_registries(&config, &output);
        let unknown = Arc::new(AtomicUsize::new(0));
        let options = RendererOptions::new(cards, atoms)
            .with_unknown_card_handler({
                let unknown = Arc::clone(&unknown);
                move |args| {
                    unknown.fetch_add(1, Ordering::Relaxed);
                    log_unknown_card(args);
                }
            })
            .with_unknown_atom_handler({
                let unknown = Arc::clone(&unknown);
                move |args| {
                    unknown.fetch_add(1, Ordering::Relaxed);
                    log_unknown_atom(args);
                }
            });
        let converter = MobiledocConverter::new(options);

        let source = read_input(&self.input)?;
        let mobiledoc = Mobiledoc::from_json(&source)?;
        let rendered = converter.render_output(&mobiledoc, Some(config.render.version))?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered.html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.html.as_bytes())?;
                stdout.flush()?;
            }
        }

        if self.toc {
            for line in format_toc(&rendered.toc) {
                output.info(&line);
            }
        }

        let skipped = unknown.load(Ordering::Relaxed);
        if skipped > 0 {
            output.warning(&format!(
                "Warning: skipped {skipped} unknown card or atom reference(s)"
            ));
        }
        output.detail(&format!(
            "{} sections, {} headings, version {}",
            mobiledoc.sections.len(),
            rendered.toc.len(),
            config.render.version
        ));

        Ok(())
    }
}

/// Read the whole input file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().lock().read_to_string(&mut source)?;
        return Ok(source);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// One line per heading, indented by level: `  Title (#id)`.
fn format_toc(toc: &[TocEntry]) -> Vec<String> {
    toc.iter()
        .map(|entry| {
            let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
            format!("{indent}{} (#{})", entry.title, entry.id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_toc() {
        let toc = vec![
            TocEntry {
                level: 1,
                title: "Guide".to_owned(),
                id: "guide".to_owned(),
            },
            TocEntry {
                level: 3,
                title: "Setup".to_owned(),
                id: "setup".to_owned(),
            },
        ];
        assert_eq!(
            format_toc(&toc),
            vec!["Guide (#guide)".to_owned(), "    Setup (#setup)".to_owned()]
        );
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.json");
        std::fs::write(&path, r#"{"version": "0.3.1"}"#).unwrap();

        assert_eq!(read_input(&path).unwrap(), r#"{"version": "0.3.1"}"#);
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
