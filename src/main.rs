//! psdoc: generate Markdown documentation from PowerShell comment-based help.
//!
//! Scans a folder tree for `.ps1` scripts and writes one Markdown page per
//! script, optionally mirroring the source layout and adding a summary page:
//!
//! `psdoc -s scripts -o docs/scripts --keep-structure --include-wiki-summary`
//!
//! Exit status: 0 when every script was documented, 1 when some scripts
//! failed, 2 when the run could not start.

mod config;
mod discover;
mod model;
mod parser;
mod pipeline;
mod render;
mod summary;
mod toc;

use clap::Parser;
use config::{Config, TocStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "psdoc",
    about = "Generate Markdown documentation from PowerShell comment-based help"
)]
struct Cli {
    /// Folder to scan recursively for .ps1 scripts
    #[arg(short = 's', long)]
    script_folder: PathBuf,

    /// Folder to write the Markdown documents into (created if missing)
    #[arg(short = 'o', long)]
    output_folder: PathBuf,

    /// Comma-separated directory names whose scripts are skipped.
    /// Matched against each script's immediate parent directory.
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude_folders: Vec<String>,

    /// Write each document under a folder named after the script's parent directory
    #[arg(short = 'k', long)]
    keep_structure: bool,

    /// Add a table of contents to every document
    #[arg(long)]
    include_wiki_toc: bool,

    /// Also write a summary page listing every script and its synopsis
    #[arg(long)]
    include_wiki_summary: bool,

    /// File name of the summary page (default: Summary.md)
    #[arg(long)]
    wiki_summary_output_file_name: Option<String>,

    /// Table of contents flavor
    #[arg(long, value_enum, ignore_case = true, default_value_t = TocStyle::AzureDevOps)]
    wiki_toc_style: TocStyle,

    /// Enable debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            script_folder: self.script_folder.clone(),
            output_folder: self.output_folder.clone(),
            exclude_folders: config::parse_exclusions(&self.exclude_folders),
            keep_structure: self.keep_structure,
            include_toc: self.include_wiki_toc,
            toc_style: self.wiki_toc_style,
            summary_name: config::summary_name(
                self.include_wiki_summary,
                self.wiki_summary_output_file_name.as_deref(),
            ),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config();
    match pipeline::run(&config, &parser::CommentHelpParser, &toc::HeadingToc) {
        Ok(report) if report.is_complete() => ExitCode::SUCCESS,
        Ok(report) => {
            warn!(
                "{} of {} scripts could not be documented",
                report.failures.len(),
                report.processed
            );
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr. `RUST_LOG` overrides the default `info` level;
/// `--verbose` forces `debug`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
