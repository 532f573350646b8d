//! Collect a project directory into a generated-file mapping.

use crate::core::traits::GeneratedFiles;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Directories never published
const IGNORED_DIRS: &[&str] = &[".git", "node_modules", "target"];

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

/// Read every UTF-8 file under `root`, keyed by its `/`-separated relative path.
///
/// Binary (non UTF-8) files are skipped.
///
/// # Examples
///
/// ```no_run
/// use repo_publisher::core::project_files::read_project_files;
/// use std::path::Path;
///
/// let files = read_project_files(Path::new("./my-app")).unwrap();
/// println!("{} files", files.len());
/// ```
pub fn read_project_files(root: &Path) -> anyhow::Result<GeneratedFiles> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut files = GeneratedFiles::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root)?;
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        match fs::read_to_string(entry.path()) {
            Ok(content) => {
                files.insert(key, content);
            }
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "skipping unreadable file");
            }
        }
    }

    Ok(files)
}
