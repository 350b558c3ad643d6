//! Combined summary page: one entry per processed script.

use crate::render::AZURE_TOC_MARKER;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Summary file name used when none is given.
pub const DEFAULT_SUMMARY_NAME: &str = "Summary.md";

/// Appends script entries to the summary document as the run progresses.
pub struct SummaryWriter {
    path: PathBuf,
    file: File,
}

impl SummaryWriter {
    /// Create (or truncate) the summary file, optionally seeded with the
    /// AzureDevOps TOC marker.
    pub fn create(path: &Path, toc_marker: bool) -> Result<Self> {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        if toc_marker {
            writeln!(file, "{}\n", AZURE_TOC_MARKER)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// `### <name>` followed by the synopsis paragraph when there is one.
    pub fn append(&mut self, name: &str, synopsis: Option<&str>) -> Result<()> {
        let mut entry = format!("### {}\n\n", name);
        if let Some(synopsis) = synopsis {
            entry.push_str(synopsis);
            entry.push_str("\n\n");
        }
        self.file
            .write_all(entry.as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve the summary file name, adding `.md` when it has no extension.
pub fn summary_file_name(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) if Path::new(n).extension().is_some() => n.to_string(),
        Some(n) => format!("{}.md", n),
        None => DEFAULT_SUMMARY_NAME.to_string(),
    }
}
