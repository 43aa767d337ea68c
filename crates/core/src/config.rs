use crate::rules::MatchScope;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to build glob pattern: {0}")]
    GlobError(#[from] globset::Error),
    #[error("Failed to parse ignore file: {0}")]
    GitignoreError(#[from] ignore::Error),
}

/// Configuration for a rewrite run
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// Root directory to walk
    pub root: PathBuf,
    /// File extension (without the dot) that makes a file eligible
    pub extension: String,
    /// Where rule fragments may match
    pub scope: MatchScope,
    /// Custom rules file; the built-in table is used when absent
    pub rules_file: Option<PathBuf>,
    /// Additional ignore patterns (glob style)
    pub ignore_patterns: Vec<String>,
    /// Gitignore-style file of paths to skip
    pub ignore_file: Option<PathBuf>,
    /// Compute changes without writing them back
    pub dry_run: bool,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("lib"),
            extension: "dart".to_string(),
            scope: MatchScope::Anywhere,
            rules_file: None,
            ignore_patterns: vec![],
            ignore_file: None,
            dry_run: false,
            follow_symlinks: false,
        }
    }
}

impl RewriteConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_rules_file(mut self, path: PathBuf) -> Self {
        self.rules_file = Some(path);
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_ignore_file(mut self, path: PathBuf) -> Self {
        self.ignore_file = Some(path);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Decides which walked paths reach the rewriter
pub struct PathFilter {
    suffix: String,
    gitignore: Option<Gitignore>,
    custom_globs: GlobSet,
}

impl PathFilter {
    pub fn new(config: &RewriteConfig) -> Result<Self, ConfigError> {
        // Only an explicitly configured ignore file is honoured
        let gitignore = match config.ignore_file {
            Some(ref ignore_file) => {
                let mut builder = GitignoreBuilder::new(&config.root);
                if let Some(err) = builder.add(ignore_file) {
                    return Err(err.into());
                }
                Some(builder.build()?)
            }
            None => None,
        };

        let mut custom_builder = GlobSetBuilder::new();
        for pattern in &config.ignore_patterns {
            custom_builder.add(Glob::new(pattern)?);
        }
        let custom_globs = custom_builder.build()?;

        Ok(Self {
            suffix: format!(".{}", config.extension),
            gitignore,
            custom_globs,
        })
    }

    /// Check if a path should be skipped entirely
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        if self.custom_globs.is_match(path) {
            return true;
        }

        if let Some(ref gi) = self.gitignore {
            if gi.matched(path, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }

    /// Check if the file name carries the designated extension
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.suffix))
            .unwrap_or(false)
    }
}
