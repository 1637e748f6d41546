use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use srtree::{Config, Dataset, SrDocument};
use tracing::{info, instrument};

#[derive(Debug, Parser)]
#[command(about = "Convert a structured report document")]
pub struct Convert {
    /// The input document, a JSON dataset or the XML form of a content tree
    input: PathBuf,

    /// Output format
    #[arg(long, short, value_name = "FORMAT", default_value = "xml")]
    to: Format,

    /// Output file; defaults to stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Drop digital signatures from the content tree
    #[arg(long)]
    remove_signatures: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    #[default]
    Xml,
    Html,
    Json,
}

impl Convert {
    #[instrument(level = "debug", skip(self, config), fields(input = %self.input.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut document = self.load(config)?;
        if self.remove_signatures {
            document.tree_mut().remove_signatures();
        }

        let content = match self.to {
            Format::Xml => document.write_xml(&config.xml)?,
            Format::Html => document.render_html(&config.render)?,
            Format::Json => {
                let mut dataset = Dataset::new();
                document.write(&mut dataset)?;
                serde_json::to_string_pretty(&dataset)?
            }
        };
        super::emit(&content, self.output.as_deref())?;
        info!(format = ?self.to, "converted document");
        Ok(())
    }

    fn load(&self, config: &Config) -> anyhow::Result<SrDocument> {
        let is_xml = self
            .input
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("xml"));
        if !is_xml {
            return super::load_document(&self.input, config);
        }
        let xml = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let mut document = SrDocument::new(config.document_type);
        document
            .read_xml(&xml, &config.read, &config.xml)
            .with_context(|| format!("failed to read content tree from {}", self.input.display()))?;
        Ok(document)
    }
}
