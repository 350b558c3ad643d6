//! Help extraction: turns script source into [`HelpMetadata`].

pub mod help;
pub mod params;

use crate::model::{Example, HelpMetadata, Notes, ScriptFile};
use help::HelpSection;
use thiserror::Error;

/// Why a script yielded no help metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no comment-based help found")]
    NoHelp,

    #[error("unterminated block comment starting at line {line}")]
    UnterminatedBlock { line: usize },

    #[error("unterminated param block starting at line {line}")]
    UnterminatedParamBlock { line: usize },
}

/// Source of help metadata for a script.
pub trait HelpParser {
    fn parse(&self, file: &ScriptFile, source: &str) -> Result<HelpMetadata, ExtractError>;
}

/// Reads PowerShell comment-based help and the script's `param(...)` block.
pub struct CommentHelpParser;

impl HelpParser for CommentHelpParser {
    fn parse(&self, file: &ScriptFile, source: &str) -> Result<HelpMetadata, ExtractError> {
        // Windows editors commonly save scripts with a UTF-8 byte-order mark.
        let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
        let sections = help::extract(source)?.ok_or(ExtractError::NoHelp)?;
        let block = params::parse(source)?;

        let mut meta = HelpMetadata::default();

        for section in &sections {
            match section.keyword.as_str() {
                "SYNOPSIS" => meta.synopsis = section_text(section),
                "DESCRIPTION" => meta.description = section_text(section),
                "NOTES" => {
                    meta.notes = section_text(section)
                        .map(|raw| Notes::parse(&raw))
                        .filter(|n| !n.is_empty());
                }
                "EXAMPLE" => {
                    let title = format!(
                        "-------------------------- EXAMPLE {} --------------------------",
                        meta.examples.len() + 1
                    );
                    meta.examples.push(Example {
                        title,
                        code: section_text(section).unwrap_or_default(),
                    });
                }
                _ => {}
            }
        }

        if let Some(block) = block {
            meta.syntax = Some(params::synthesize_syntax(&file.file_name(), &block));
            meta.parameters = block.parameters;
            for param in &mut meta.parameters {
                if let Some(desc) = parameter_help(&sections, &param.name) {
                    param.description = desc;
                }
            }
        }

        Ok(meta)
    }
}

/// Section text including anything written on the keyword line itself.
fn section_text(section: &HelpSection) -> Option<String> {
    let text = match (&section.argument, section.body.is_empty()) {
        (Some(arg), true) => arg.clone(),
        (Some(arg), false) => format!("{}\n{}", arg, section.body),
        (None, _) => section.body.clone(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parameter_help(sections: &[HelpSection], name: &str) -> Option<String> {
    sections
        .iter()
        .filter(|s| s.keyword == "PARAMETER")
        .find(|s| {
            s.argument
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(name))
        })
        .map(|s| s.body.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(src: &str) -> Result<HelpMetadata, ExtractError> {
        let file = ScriptFile::new(Path::new("scripts/Get-Widget.ps1"));
        CommentHelpParser.parse(&file, src)
    }

    const FULL: &str = r#"<#
.SYNOPSIS
    Gets widgets from a folder.

.DESCRIPTION
    Walks the folder and prints
    every widget it finds.

.PARAMETER Path
    Target path

.PARAMETER force
    Overwrite existing output.

.EXAMPLE
    .\Get-Widget.ps1 -Path C:\widgets

.EXAMPLE
    .\Get-Widget.ps1 C:\widgets -Force
    Same, but overwrites.

.NOTES
    Author: Jane; Version: 1.0

.LINK
    https://example.com/widgets
#>
[CmdletBinding()]
param(
    [Parameter(Mandatory)]
    [string]$Path,

    [switch]$Force
)
"#;

    #[test]
    fn full_help() {
        let meta = parse(FULL).unwrap();
        assert_eq!(meta.synopsis.as_deref(), Some("Gets widgets from a folder."));
        assert_eq!(
            meta.description.as_deref(),
            Some("Walks the folder and prints\nevery widget it finds.")
        );
        assert_eq!(meta.notes.as_ref().unwrap().entries.len(), 2);
        assert!(meta.missing_sections().is_empty());

        assert_eq!(meta.examples.len(), 2);
        assert_eq!(
            meta.examples[1].title,
            "-------------------------- EXAMPLE 2 --------------------------"
        );
        assert_eq!(
            meta.examples[1].code,
            ".\\Get-Widget.ps1 C:\\widgets -Force\nSame, but overwrites."
        );

        assert_eq!(meta.parameters[0].name, "Path");
        assert_eq!(meta.parameters[0].description, "Target path");
        assert_eq!(meta.parameters[1].description, "Overwrite existing output.");

        assert_eq!(
            meta.syntax.unwrap().text,
            "Get-Widget.ps1 [-Path] <String> [-Force] [<CommonParameters>]"
        );
    }

    #[test]
    fn help_without_param_block() {
        let meta = parse("<#\n.SYNOPSIS\nJust a synopsis\n#>\nWrite-Output 1\n").unwrap();
        assert!(meta.syntax.is_none());
        assert!(meta.parameters.is_empty());
        assert_eq!(
            meta.missing_sections(),
            vec![
                crate::model::Section::Syntax,
                crate::model::Section::Notes,
                crate::model::Section::Description,
                crate::model::Section::Examples,
                crate::model::Section::Parameters,
            ]
        );
    }

    #[test]
    fn empty_sections_are_absent() {
        let meta = parse("<#\n.SYNOPSIS\n.NOTES\n   ;  \n.DESCRIPTION\nText\n#>\n").unwrap();
        assert!(meta.synopsis.is_none());
        assert!(meta.notes.is_none());
        assert_eq!(meta.description.as_deref(), Some("Text"));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let src = "\u{FEFF}<#\n.SYNOPSIS\n  Gets x.\n#>\n[CmdletBinding()]\nparam([string]$Path)\n";
        let meta = parse(src).unwrap();
        assert_eq!(meta.synopsis.as_deref(), Some("Gets x."));
        assert_eq!(meta.parameters.len(), 1);
        assert_eq!(
            meta.syntax.unwrap().text,
            "Get-Widget.ps1 [[-Path] <String>] [<CommonParameters>]"
        );
    }

    #[test]
    fn param_block_without_help_is_no_help() {
        assert_eq!(parse("param([string]$Path)\n"), Err(ExtractError::NoHelp));
    }
}
