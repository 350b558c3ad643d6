//! Run configuration, built once from the command line and shared read-only
//! by every stage.

use crate::model::ScriptFile;
use crate::summary;
use clap::ValueEnum;
use std::path::PathBuf;

/// Table-of-contents flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TocStyle {
    /// `[[_TOC_]]` placeholder expanded by the AzureDevOps wiki
    #[default]
    #[value(name = "AzureDevOps")]
    AzureDevOps,
    /// Link list generated from the document's headings
    #[value(name = "Github")]
    Github,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub script_folder: PathBuf,
    pub output_folder: PathBuf,
    /// Parent directory names whose scripts are skipped
    pub exclude_folders: Vec<String>,
    pub keep_structure: bool,
    pub include_toc: bool,
    pub toc_style: TocStyle,
    /// Summary file name; `None` disables the summary
    pub summary_name: Option<String>,
}

impl Config {
    /// Whether documents start with the AzureDevOps TOC marker.
    pub fn toc_marker(&self) -> bool {
        self.include_toc && self.toc_style == TocStyle::AzureDevOps
    }

    /// Whether written documents get a generated heading TOC.
    pub fn generated_toc(&self) -> bool {
        self.include_toc && self.toc_style == TocStyle::Github
    }

    /// Directory a script's document goes to.
    pub fn target_dir(&self, file: &ScriptFile) -> PathBuf {
        if self.keep_structure && !file.dir_name.is_empty() {
            self.output_folder.join(&file.dir_name)
        } else {
            self.output_folder.clone()
        }
    }

    /// `<target>/<base name>.md`
    pub fn output_path(&self, file: &ScriptFile) -> PathBuf {
        self.target_dir(file).join(format!("{}.md", file.base_name))
    }

    pub fn summary_path(&self) -> Option<PathBuf> {
        self.summary_name
            .as_deref()
            .map(|name| self.output_folder.join(name))
    }
}

/// Trim exclusion names, dropping blank entries.
pub fn parse_exclusions(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Summary name to use when the summary is enabled.
pub fn summary_name(enabled: bool, name: Option<&str>) -> Option<String> {
    enabled.then(|| summary::summary_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config(keep_structure: bool) -> Config {
        Config {
            script_folder: PathBuf::from("scripts"),
            output_folder: PathBuf::from("docs"),
            exclude_folders: Vec::new(),
            keep_structure,
            include_toc: false,
            toc_style: TocStyle::default(),
            summary_name: None,
        }
    }

    #[test]
    fn flat_output_path() {
        let file = ScriptFile::new(Path::new("scripts/Deploy/Install-App.ps1"));
        assert_eq!(
            config(false).output_path(&file),
            PathBuf::from("docs/Install-App.md")
        );
    }

    #[test]
    fn structured_output_path() {
        let file = ScriptFile::new(Path::new("scripts/Deploy/Install-App.ps1"));
        assert_eq!(
            config(true).output_path(&file),
            PathBuf::from("docs/Deploy/Install-App.md")
        );
    }

    #[test]
    fn toc_flags() {
        let mut c = config(false);
        assert!(!c.toc_marker());
        c.include_toc = true;
        assert!(c.toc_marker());
        assert!(!c.generated_toc());
        c.toc_style = TocStyle::Github;
        assert!(!c.toc_marker());
        assert!(c.generated_toc());
    }

    #[test]
    fn exclusions_are_trimmed() {
        let values: Vec<String> = ["Archive", " Tests ", "", "Old"].map(String::from).into();
        assert_eq!(parse_exclusions(&values), vec!["Archive", "Tests", "Old"]);
    }

    #[test]
    fn summary_only_when_enabled() {
        assert_eq!(summary_name(false, Some("Index")), None);
        assert_eq!(summary_name(true, None).as_deref(), Some("Summary.md"));
        assert_eq!(summary_name(true, Some("Index")).as_deref(), Some("Index.md"));
    }

    #[test]
    fn summary_path_in_output_root() {
        let mut c = config(true);
        c.summary_name = Some("Summary.md".into());
        assert_eq!(c.summary_path(), Some(PathBuf::from("docs/Summary.md")));
    }
}
