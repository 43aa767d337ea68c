//! MTA Rust FixImports Core Library
//!
//! This library rewrites legacy relative import strings in a source tree into
//! canonical package imports, using an ordered table of path fragments.
//!
//! # Features
//!
//! - Built-in rewrite table, or custom rules from a TOML/YAML file
//! - Quote-style agnostic matching confined to a single string literal
//! - Optional restriction to `import`/`export`/`part` directives
//! - Files are only written when their content actually changes
//! - Per-file failures are reported and never abort the run
//! - Run reports in text, JSON or YAML format
//!
//! # Example
//!
//! ```no_run
//! use mta_rust_fiximports_core::{format_report, notice_line, OutputFormat, RewriteConfig, Rewriter};
//! use std::path::PathBuf;
//!
//! let config = RewriteConfig::new(PathBuf::from("lib"));
//! let rewriter = Rewriter::new(config).unwrap();
//! let report = rewriter.run(|file| {
//!     if let Some(line) = notice_line(file) {
//!         println!("{}", line);
//!     }
//! });
//!
//! println!("{}", format_report(&report, OutputFormat::Text).unwrap());
//! ```

pub mod config;
pub mod models;
pub mod output;
pub mod rewriter;
pub mod rules;
pub mod walker;

// Re-exports for convenience
pub use config::{ConfigError, PathFilter, RewriteConfig};
pub use models::*;
pub use output::{format_report, format_summary, notice_line, FormatError, OutputFormat};
pub use rewriter::{FileRewriter, RewriteError, Rewriter, RunError};
pub use rules::{builtin_rules, MatchScope, RewriteRule, RuleError, RuleSet, BUILTIN_TABLE};
pub use walker::FileWalker;
