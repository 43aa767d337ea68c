//! Directory walker
//!
//! Lazily enumerates every eligible file under the configured root.

use crate::config::{PathFilter, RewriteConfig};
use std::io::ErrorKind;
use std::path::PathBuf;
use walkdir::WalkDir;

pub struct FileWalker {
    root: PathBuf,
    follow_symlinks: bool,
    filter: PathFilter,
}

impl FileWalker {
    pub fn new(config: &RewriteConfig, filter: PathFilter) -> Self {
        Self {
            root: config.root.clone(),
            follow_symlinks: config.follow_symlinks,
            filter,
        }
    }

    /// Eligible files, as traversed. A missing root, or a root that is not a
    /// directory, yields nothing.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(move |e| {
                // Prune ignored directories
                if e.file_type().is_dir() {
                    return !self.filter.should_ignore(e.path(), true);
                }
                true
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    let missing_root = err.depth() == 0
                        && err.io_error().map(|e| e.kind()) == Some(ErrorKind::NotFound);
                    if missing_root {
                        tracing::debug!(root = %self.root.display(), "root directory does not exist");
                    } else {
                        tracing::warn!(error = %err, "skipping unreadable entry");
                    }
                    None
                }
            })
            .filter(|entry| {
                let file_type = entry.file_type();
                if entry.depth() == 0 && !file_type.is_dir() {
                    tracing::debug!(root = %entry.path().display(), "root is not a directory");
                    return false;
                }
                if file_type.is_symlink() {
                    tracing::debug!(path = %entry.path().display(), "skipping symlink");
                    return false;
                }
                file_type.is_file()
            })
            .map(|entry| entry.into_path())
            .filter(move |path| {
                self.filter.is_eligible(path) && !self.filter.should_ignore(path, false)
            })
    }
}
