//! The documentation run: discover, extract, render, aggregate.

use crate::config::Config;
use crate::discover;
use crate::model::{HelpMetadata, ScriptFile, Section};
use crate::parser::HelpParser;
use crate::render::markdown;
use crate::summary::SummaryWriter;
use crate::toc::TocGenerator;
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Scripts that were not excluded
    pub processed: usize,
    /// Documents written
    pub written: usize,
    pub warnings: Vec<MissingSection>,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSection {
    pub path: PathBuf,
    pub section: Section,
}

impl fmt::Display for MissingSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: no {} section found", self.path.display(), self.section)
    }
}

#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.path.display(), self.error)
    }
}

/// Document every script under the configured script folder.
///
/// Setup problems (missing script folder, output folder or summary that
/// cannot be created) fail the run. Problems with a single script are logged,
/// recorded in the report and the run moves on.
pub fn run(config: &Config, parser: &dyn HelpParser, toc: &dyn TocGenerator) -> Result<RunReport> {
    fs::create_dir_all(&config.output_folder).with_context(|| {
        format!(
            "failed to create output directory: {}",
            config.output_folder.display()
        )
    })?;

    let files = discover::discover(&config.script_folder, &config.exclude_folders)?;
    info!(
        "found {} scripts in {}",
        files.len(),
        config.script_folder.display()
    );

    let mut summary = match config.summary_path() {
        Some(path) => Some(SummaryWriter::create(&path, config.toc_marker())?),
        None => None,
    };

    let mut report = RunReport::default();
    for file in &files {
        report.processed += 1;
        match process_file(config, parser, toc, file, summary.as_mut(), &mut report) {
            Ok(()) => report.written += 1,
            Err(error) => {
                let failure = Failure {
                    path: file.path.clone(),
                    error,
                };
                error!("{}", failure);
                report.failures.push(failure);
            }
        }
    }

    if let Some(ref summary) = summary {
        info!("summary written to {}", summary.path().display());
    }
    info!(
        "documented {} of {} scripts ({} warnings, {} failures)",
        report.written,
        report.processed,
        report.warnings.len(),
        report.failures.len()
    );

    Ok(report)
}

fn process_file(
    config: &Config,
    parser: &dyn HelpParser,
    toc: &dyn TocGenerator,
    file: &ScriptFile,
    summary: Option<&mut SummaryWriter>,
    report: &mut RunReport,
) -> Result<()> {
    info!("processing {}", file.path.display());

    let help = extract(parser, file);
    let synopsis = help.as_ref().ok().and_then(|h| h.synopsis.clone());
    let documented = help.and_then(|help| write_document(config, toc, file, &help, report));

    // Every processed script gets a summary entry, documented or not.
    if let Some(summary) = summary {
        if let Err(error) = summary.append(&file.base_name, synopsis.as_deref()) {
            let failure = Failure {
                path: summary.path().to_path_buf(),
                error,
            };
            error!("{}", failure);
            report.failures.push(failure);
        }
    }

    documented
}

fn write_document(
    config: &Config,
    toc: &dyn TocGenerator,
    file: &ScriptFile,
    help: &HelpMetadata,
    report: &mut RunReport,
) -> Result<()> {
    for section in help.missing_sections() {
        let missing = MissingSection {
            path: file.path.clone(),
            section,
        };
        warn!("{}", missing);
        report.warnings.push(missing);
    }

    let target_dir = config.target_dir(file);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("failed to create directory: {}", target_dir.display()))?;

    let out_path = config.output_path(file);
    let document = markdown::render(file, help, config.toc_marker());
    fs::write(&out_path, &document)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    if config.generated_toc() {
        let contents = toc.generate(&out_path)?;
        if !contents.is_empty() {
            fs::write(&out_path, format!("{}{}", contents, document))
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }
    }

    debug!("wrote {}", out_path.display());
    Ok(())
}

fn extract(parser: &dyn HelpParser, file: &ScriptFile) -> Result<HelpMetadata> {
    let source = fs::read_to_string(&file.path)
        .with_context(|| format!("failed to read {}", file.path.display()))?;
    parser
        .parse(file, &source)
        .context("no help metadata could be extracted")
}
