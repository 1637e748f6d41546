//! Loading datasets stored as JSON files in a directory tree.

use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::storage::{Dataset, LoadError};

/// A dataset together with the file it was loaded from.
pub type LoadedDataset = (PathBuf, Dataset);

/// Collects the dataset files below the given paths.
///
/// Files are taken as given; directories are walked for `*.json` files.
/// Hidden directories are skipped. The result is sorted.
#[must_use]
pub fn collect_dataset_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = inputs
        .iter()
        .flat_map(|input| {
            if input.is_dir() {
                WalkDir::new(input)
                    .into_iter()
                    .filter_entry(|entry| {
                        entry.depth() == 0
                            || !entry.file_name().to_string_lossy().starts_with('.')
                    })
                    .filter_map(Result::ok)
                    .filter(|entry| entry.file_type().is_file())
                    .filter(|entry| entry.path().extension() == Some(OsStr::new("json")))
                    .map(walkdir::DirEntry::into_path)
                    .collect()
            } else {
                vec![input.clone()]
            }
        })
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Loads the given files in parallel.
///
/// Returns the loaded datasets and the failures, both in path order.
#[must_use]
pub fn load_datasets(paths: &[PathBuf]) -> (Vec<LoadedDataset>, Vec<(PathBuf, LoadError)>) {
    let results: Vec<_> = paths
        .par_iter()
        .map(|path| {
            Dataset::load(path)
                .map(|dataset| (path.clone(), dataset))
                .map_err(|error| {
                    tracing::debug!("Failed to load dataset from {}: {error}", path.display());
                    (path.clone(), error)
                })
        })
        .collect();

    let mut loaded = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(dataset) => loaded.push(dataset),
            Err(failure) => failures.push(failure),
        }
    }
    (loaded, failures)
}

/// Loads every dataset file below `root`.
///
/// # Errors
///
/// Unless `allow_unreadable` is set, fails with the list of files that could
/// not be loaded.
pub fn load_all(
    root: &Path,
    allow_unreadable: bool,
) -> Result<Vec<LoadedDataset>, DirectoryLoadError> {
    let paths = collect_dataset_paths(&[root.to_path_buf()]);
    let (loaded, failures) = load_datasets(&paths);
    if !allow_unreadable && !failures.is_empty() {
        return Err(DirectoryLoadError::UnreadableFiles(
            failures.into_iter().map(|(path, _)| path).collect(),
        ));
    }
    tracing::info!("Loaded {} datasets from {}", loaded.len(), root.display());
    Ok(loaded)
}

/// Files below a directory could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    /// The files that failed to load.
    UnreadableFiles(Vec<PathBuf>),
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        match self {
            Self::UnreadableFiles(paths) => {
                write!(f, "Unreadable dataset files: ")?;
                for (i, path) in paths.iter().take(MAX_DISPLAY).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", path.display())?;
                }
                if paths.len() > MAX_DISPLAY {
                    write!(f, "... (and {} more)", paths.len() - MAX_DISPLAY)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::storage::{tags, Vr};

    fn setup_temp_directory() -> TempDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let mut dataset = Dataset::new();
        dataset.put_string(tags::MODALITY, Vr::CS, "CT");
        dataset.save(&tmp.path().join("a.json")).unwrap();
        fs::create_dir(tmp.path().join("series")).unwrap();
        dataset.save(&tmp.path().join("series").join("b.json")).unwrap();
        fs::create_dir(tmp.path().join(".cache")).unwrap();
        dataset.save(&tmp.path().join(".cache").join("c.json")).unwrap();
        fs::write(tmp.path().join("notes.txt"), "not a dataset").unwrap();
        tmp
    }

    #[test]
    fn collects_json_files_recursively() {
        let tmp = setup_temp_directory();
        let paths = collect_dataset_paths(&[tmp.path().to_path_buf()]);
        assert_eq!(
            paths,
            vec![
                tmp.path().join("a.json"),
                tmp.path().join("series").join("b.json")
            ]
        );
    }

    #[test]
    fn load_all_reads_every_dataset() {
        let tmp = setup_temp_directory();
        let loaded = load_all(tmp.path(), false).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded
            .iter()
            .all(|(_, dataset)| dataset.string(tags::MODALITY) == Some("CT")));
    }

    #[test]
    fn unreadable_files_fail_unless_allowed() {
        let tmp = setup_temp_directory();
        fs::write(tmp.path().join("broken.json"), "{").unwrap();

        let error = load_all(tmp.path(), false).unwrap_err();
        assert!(error.to_string().contains("broken.json"));
        assert_eq!(load_all(tmp.path(), true).unwrap().len(), 2);
    }
}
