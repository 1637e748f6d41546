use std::path::{Path, PathBuf};

mod convert;
mod library;
mod show;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use convert::Convert;
use library::Library;
use show::Show;
use srtree::{Config, Dataset, SrDocument};
use tracing::instrument;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(short, long, default_value = "srdoc.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = Config::load_or_default(&self.config).map_err(anyhow::Error::msg)?;
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Check documents for errors
    ///
    /// Accepts document files and directories, which are searched for
    /// `*.json` datasets.
    Validate(Validate),

    /// Print the content tree of a document
    Show(Show),

    /// Convert a document to XML, HTML or a JSON dataset
    Convert(Convert),

    /// Build an image library document from image datasets
    Library(Library),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Validate(command) => command.run(config)?,
            Self::Show(command) => command.run(config)?,
            Self::Convert(command) => command.run(config)?,
            Self::Library(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// Loads a dataset file and reads the document it holds.
#[instrument(level = "debug", skip(config))]
fn load_document(path: &Path, config: &Config) -> anyhow::Result<SrDocument> {
    let dataset = Dataset::load(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let mut document = SrDocument::new(config.document_type);
    document
        .read(&dataset, &config.read)
        .with_context(|| format!("failed to read document from {}", path.display()))?;
    Ok(document)
}

/// Writes `content` to `path`, or to stdout without a path.
fn emit(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
