use crate::config::{ConfigError, PathFilter, RewriteConfig};
use crate::models::{FileOutcome, FileReport, FileStatus, RunMetadata, RunReport, RunStats};
use crate::rules::{RuleError, RuleSet};
use crate::walker::FileWalker;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Per-file failure; never aborts a run
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Setup failure; raised before any file is touched
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Rules error: {0}")]
    RuleError(#[from] RuleError),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Rewrites one file in place
pub struct FileRewriter<'a> {
    rules: &'a RuleSet,
    dry_run: bool,
}

impl<'a> FileRewriter<'a> {
    pub fn new(rules: &'a RuleSet, dry_run: bool) -> Self {
        Self { rules, dry_run }
    }

    /// Apply all rules to `path`, writing back only when the content changed
    pub fn rewrite_file(&self, path: &Path) -> Result<FileOutcome, RewriteError> {
        let original = fs::read_to_string(path).map_err(|source| RewriteError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let rewrite = self.rules.apply(&original);
        if rewrite.content == original {
            return Ok(FileOutcome::Unchanged);
        }

        if !self.dry_run {
            fs::write(path, &rewrite.content).map_err(|source| RewriteError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        Ok(FileOutcome::Rewritten {
            replacements: rewrite.total_replacements(),
            rules: rewrite.applied,
        })
    }

    /// Like [`rewrite_file`](Self::rewrite_file), but folded into a report line
    pub fn process(&self, path: PathBuf) -> FileReport {
        match self.rewrite_file(&path) {
            Ok(FileOutcome::Unchanged) => FileReport {
                path,
                status: FileStatus::Unchanged,
                replacements: 0,
                rules: vec![],
                error: None,
            },
            Ok(FileOutcome::Rewritten {
                replacements,
                rules,
            }) => FileReport {
                path,
                status: if self.dry_run {
                    FileStatus::WouldUpdate
                } else {
                    FileStatus::Updated
                },
                replacements,
                rules,
                error: None,
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "file failed");
                // Report the underlying cause; the path is printed alongside it
                let description = match err {
                    RewriteError::Read { source, .. } | RewriteError::Write { source, .. } => {
                        source.to_string()
                    }
                };
                FileReport {
                    path,
                    status: FileStatus::Failed,
                    replacements: 0,
                    rules: vec![],
                    error: Some(description),
                }
            }
        }
    }
}

/// Walks the tree and rewrites every eligible file, one at a time
pub struct Rewriter {
    config: RewriteConfig,
    rules: RuleSet,
    walker: FileWalker,
}

impl Rewriter {
    pub fn new(config: RewriteConfig) -> Result<Self, RunError> {
        let rules = match config.rules_file {
            Some(ref path) => RuleSet::load(path, config.scope)?,
            None => RuleSet::builtin(config.scope)?,
        };
        let filter = PathFilter::new(&config)?;
        let walker = FileWalker::new(&config, filter);

        tracing::debug!(
            rules = rules.len(),
            root = %config.root.display(),
            extension = %config.extension,
            "rewriter ready"
        );

        Ok(Self {
            config,
            rules,
            walker,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Process every eligible file, calling `on_file` as each one finishes
    pub fn run<F>(&self, mut on_file: F) -> RunReport
    where
        F: FnMut(&FileReport),
    {
        let start = Instant::now();
        let file_rewriter = FileRewriter::new(&self.rules, self.config.dry_run);

        let mut stats = RunStats::default();
        let mut files = Vec::new();

        for path in self.walker.files() {
            let report = file_rewriter.process(path);
            stats.record(&report);
            on_file(&report);
            files.push(report);
        }

        let metadata = RunMetadata {
            duration_ms: start.elapsed().as_millis() as u64,
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        RunReport {
            root: self.config.root.clone(),
            files,
            stats,
            metadata,
        }
    }
}
