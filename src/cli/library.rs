use std::path::PathBuf;

use clap::Parser;
use srtree::{
    storage::directory::{collect_dataset_paths, load_datasets},
    templates::{AddImageMode, ImageLibrary},
    AddMode, CodedEntry, Config, Dataset, DocumentType, RelationshipType, SrDocument, ValueType,
};
use tracing::{instrument, warn};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Build an image library document from image datasets")]
pub struct Library {
    /// Image dataset files, or directories searched for `*.json` datasets
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Add the descriptors derivable from each image to its entry
    #[arg(long)]
    descriptors: bool,

    /// Add the descriptors of the first image to the group instead of the
    /// entries
    #[arg(long, conflicts_with = "descriptors")]
    group_descriptors: bool,

    /// Output file for the JSON dataset; defaults to stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Library {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let paths = collect_dataset_paths(&self.images);
        let (images, failures) = load_datasets(&paths);
        for (path, error) in &failures {
            eprintln!("{} {}: {error}", "✗".error(), path.display());
        }
        let Some((_, first)) = images.first() else {
            anyhow::bail!("no image datasets found");
        };

        let mode = if self.descriptors {
            AddImageMode::WithAllDescriptors
        } else {
            AddImageMode::WithoutDescriptors
        };
        let mut library = ImageLibrary::new()?;
        library.add_image_group()?;
        if self.group_descriptors {
            library.add_image_entry_descriptors(first, config.check_values)?;
        }
        let mut added = 0_usize;
        for (path, image) in &images {
            match library.add_image_entry(image, mode, config.check_values) {
                Ok(_) => added += 1,
                Err(error) => warn!("skipping {}: {error}", path.display()),
            }
        }
        if added == 0 {
            anyhow::bail!("none of the {} datasets could be added as an image", images.len());
        }

        let mut document = SrDocument::new(DocumentType::ComprehensiveSR);
        document.common_mut().import(first, true, true, false)?;
        let tree = document.tree_mut();
        tree.add_content_item(
            RelationshipType::IsRoot,
            ValueType::Container,
            Some(CodedEntry::new("18748-4", "LN", "Diagnostic Imaging Report")),
            AddMode::AfterCurrent,
        )?;
        tree.insert_template(library, AddMode::BelowCurrent, RelationshipType::Contains)?;

        let mut dataset = Dataset::new();
        document.write(&mut dataset)?;
        super::emit(&serde_json::to_string_pretty(&dataset)?, self.output.as_deref())?;
        eprintln!(
            "{}",
            format!("Added {added} of {} images to the library", images.len()).success()
        );
        Ok(())
    }
}
