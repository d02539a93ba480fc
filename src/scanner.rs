use crate::classify::FileEntry;
use crate::error::Error;
use crate::progress::ProgressReporter;
use glob::Pattern;
use std::path::{Component, Path};
use tracing::{debug, error};
use walkdir::WalkDir;

const PROGRESS_INTERVAL: usize = 500;

/// Walks a dataset directory and lists its files as `/`-separated paths
/// relative to `root`, each starting with `/`. Ignore globs are matched
/// against the relative path without the leading `/`; an ignored directory
/// is not descended into. Symlinks are not followed. The result is sorted.
pub fn list_dataset_files(
    root: &Path,
    ignore_globs: &[String],
    reporter: &dyn ProgressReporter,
) -> Result<Vec<FileEntry>, Error> {
    if !root.is_dir() {
        return Err(Error::Other(format!(
            "Dataset root {} is not a directory",
            root.display()
        )));
    }

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let is_ignored = |relative: &str| {
        !relative.is_empty()
            && ignore_patterns
                .iter()
                .any(|pattern| pattern.matches(relative))
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| match relative_path(root, entry.path()) {
            Some(relative) => !is_ignored(&relative),
            None => true,
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                if err
                    .io_error()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied)
                {
                    error!("Access denied while walking {}: {}", root.display(), err);
                    continue;
                }
                return Err(err.into());
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = relative_path(root, entry.path()) else {
            debug!("Skipping {}: not valid UTF-8", entry.path().display());
            continue;
        };

        files.push(FileEntry::new(format!("/{}", relative)));
        if files.len() % PROGRESS_INTERVAL == 0 {
            reporter.on_scan_progress(files.len(), &relative);
        }
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

/// `path` relative to `root`, joined with `/`. `None` for non UTF-8 names.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in stripped.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
