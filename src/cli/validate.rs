use std::path::PathBuf;

use clap::Parser;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use srtree::{
    domain::ReadOptions,
    storage::directory::{collect_dataset_paths, load_datasets},
    Config, Dataset, SrDocument,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check structured report documents for errors")]
pub struct Validate {
    /// Document files, or directories searched for `*.json` datasets
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Downgrade recoverable content item and relationship errors to warnings
    #[arg(long)]
    lenient: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

#[derive(Debug)]
struct Outcome {
    path: PathBuf,
    result: Result<Checked, String>,
}

#[derive(Debug)]
struct Checked {
    document_type: String,
    content_items: usize,
}

impl Validate {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let options = if self.lenient {
            ReadOptions::lenient()
        } else {
            config.read
        };

        let paths = collect_dataset_paths(&self.paths);
        let (loaded, failures) = load_datasets(&paths);

        let mut outcomes: Vec<Outcome> = failures
            .into_iter()
            .map(|(path, error)| Outcome {
                path,
                result: Err(error.to_string()),
            })
            .collect();
        outcomes.extend(
            loaded
                .par_iter()
                .map(|(path, dataset)| Outcome {
                    path: path.clone(),
                    result: check(dataset, config, &options),
                })
                .collect::<Vec<_>>(),
        );
        outcomes.sort_by(|a, b| a.path.cmp(&b.path));

        match self.output {
            OutputFormat::Table => self.output_table(&outcomes),
            OutputFormat::Json => output_json(&outcomes)?,
            OutputFormat::Summary => output_summary(&outcomes),
        }

        let invalid = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
        if invalid > 0 {
            anyhow::bail!("{invalid} of {} documents are invalid", outcomes.len());
        }
        Ok(())
    }

    fn output_table(&self, outcomes: &[Outcome]) {
        for outcome in outcomes {
            match &outcome.result {
                Ok(checked) if !self.quiet => println!(
                    "{} {} {}",
                    "✓".success(),
                    outcome.path.display(),
                    format!(
                        "({}, {} content items)",
                        checked.document_type, checked.content_items
                    )
                    .dim()
                ),
                Ok(_) => {}
                Err(message) => println!(
                    "{} {}: {message}",
                    "✗".error(),
                    outcome.path.display()
                ),
            }
        }
        if self.quiet {
            return;
        }
        let invalid = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
        if outcomes.is_empty() {
            println!("\n{}", "No documents found".warning());
        } else if invalid == 0 {
            println!("\n{}", format!("All {} documents are valid", outcomes.len()).success());
        } else {
            println!(
                "\n{}",
                format!("{invalid} of {} documents are invalid", outcomes.len()).warning()
            );
        }
    }
}

/// Reads the document and makes sure it could be written back.
fn check(dataset: &Dataset, config: &Config, options: &ReadOptions) -> Result<Checked, String> {
    let mut document = SrDocument::new(config.document_type);
    document
        .read(dataset, options)
        .map_err(|error| error.to_string())?;
    if !document.tree().is_valid() {
        return Err("content tree is not a valid document tree".to_string());
    }
    let checked = Checked {
        document_type: document.document_type().to_string(),
        content_items: document.tree().count_nodes(),
    };
    // writing generates missing UIDs, so check on a copy
    document
        .clone()
        .write(&mut Dataset::new())
        .map_err(|error| error.to_string())?;
    Ok(checked)
}

fn output_json(outcomes: &[Outcome]) -> anyhow::Result<()> {
    use serde_json::json;

    let documents: Vec<_> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(checked) => json!({
                "path": outcome.path,
                "valid": true,
                "document_type": checked.document_type,
                "content_items": checked.content_items,
            }),
            Err(message) => json!({
                "path": outcome.path,
                "valid": false,
                "error": message,
            }),
        })
        .collect();
    let invalid = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
    let output = json!({
        "documents": documents,
        "summary": {
            "total": outcomes.len(),
            "invalid": invalid,
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_summary(outcomes: &[Outcome]) {
    let invalid = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
    println!("documents={}", outcomes.len());
    println!("invalid={invalid}");
}
