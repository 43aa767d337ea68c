use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mta_rust_fiximports_core::{
    format_report, notice_line, MatchScope, OutputFormat, RewriteConfig, Rewriter,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fiximports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rewrite legacy relative imports into canonical package imports")]
#[command(long_about = "Walks a source tree and rewrites quoted import paths that reference \
    legacy locations (e.g. '../../models/habit_model.dart') into canonical package imports \
    (e.g. 'package:recalim/features/tasks/domain/entities/habit_model.dart'). Files are \
    overwritten in place, and only when their content changes.\n\n\
    Prints 'Updated: <path>' for every rewritten file and 'Error processing <path>: <error>' \
    for every file that could not be read or written. Per-file errors never stop the run.")]
pub struct Args {
    /// Source root directory to rewrite
    #[arg(default_value = "lib")]
    pub path: PathBuf,

    /// File extension of eligible source files
    #[arg(long = "ext", default_value = "dart")]
    pub extension: String,

    /// Rules file (.toml or .yaml) replacing the built-in table
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Only rewrite strings that are operands of import/export/part directives
    #[arg(long)]
    pub imports_only: bool,

    /// Additional ignore patterns (glob style)
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Gitignore-style file listing paths to skip
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Text)]
    pub format: OutputFormatArg,

    /// Write the run report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the run report to stderr after the run
    #[arg(long)]
    pub summary: bool,

    /// Exit with status 1 if any file failed
    #[arg(long)]
    pub fail_on_error: bool,

    /// Show progress and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Text,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the per-file notices only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let scope = if args.imports_only {
        MatchScope::ImportsOnly
    } else {
        MatchScope::Anywhere
    };

    // Build config
    let mut config = RewriteConfig::new(args.path.clone())
        .with_extension(args.extension.clone())
        .with_scope(scope)
        .with_ignore_patterns(args.ignore.clone())
        .with_dry_run(args.dry_run)
        .with_follow_symlinks(args.follow_symlinks);

    if let Some(rules) = args.rules {
        config = config.with_rules_file(rules);
    }

    if let Some(ignore_file) = args.ignore_file {
        config = config.with_ignore_file(ignore_file);
    }

    let rewriter = Rewriter::new(config)?;

    // Show progress if verbose
    let spinner = if args.verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!(
            "Rewriting {} with {} rules...",
            args.path.display(),
            rewriter.rules().len()
        ));
        Some(pb)
    } else {
        None
    };

    let report = rewriter.run(|file| {
        if let Some(line) = notice_line(file) {
            match spinner {
                Some(ref pb) => pb.suspend(|| println!("{}", line)),
                None => println!("{}", line),
            }
        }
    });

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Processed {} files in {}ms",
            report.stats.files_scanned, report.metadata.duration_ms
        ));
    }

    let format: OutputFormat = args.format.into();

    if let Some(path) = args.output {
        fs::write(&path, format_report(&report, format)?)?;
        if args.verbose {
            eprintln!("Report written to: {}", path.display());
        }
    }

    if args.summary {
        eprintln!("{}", format_report(&report, format)?);
    }

    if args.fail_on_error && report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
