//! Data model for discovered scripts and their help metadata.

use std::fmt;
use std::path::{Path, PathBuf};

/// A discovered script file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub path: PathBuf,
    /// File name without extension, e.g. "Get-Widget"
    pub base_name: String,
    /// Name of the immediate parent directory
    pub dir_name: String,
}

impl ScriptFile {
    pub fn new(path: &Path) -> Self {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir_name = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            base_name,
            dir_name,
        }
    }

    /// File name with extension, e.g. "Get-Widget.ps1"
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.base_name.clone())
    }
}

/// Help metadata extracted from a script's comment-based help.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HelpMetadata {
    pub synopsis: Option<String>,
    pub syntax: Option<Syntax>,
    pub notes: Option<Notes>,
    pub description: Option<String>,
    pub examples: Vec<Example>,
    pub parameters: Vec<Parameter>,
}

impl HelpMetadata {
    /// Sections with no content, in rendering order.
    pub fn missing_sections(&self) -> Vec<Section> {
        let mut missing = Vec::new();
        if self.synopsis.is_none() {
            missing.push(Section::Synopsis);
        }
        if self.syntax.is_none() {
            missing.push(Section::Syntax);
        }
        if self.notes.is_none() {
            missing.push(Section::Notes);
        }
        if self.description.is_none() {
            missing.push(Section::Description);
        }
        if self.examples.is_empty() {
            missing.push(Section::Examples);
        }
        if self.parameters.is_empty() {
            missing.push(Section::Parameters);
        }
        missing
    }
}

/// Invocation signature, starting with the script's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub text: String,
}

impl Syntax {
    /// The parameter usage string: everything after the first occurrence of
    /// `file_name`, trimmed.
    pub fn usage(&self, file_name: &str) -> &str {
        match self.text.split_once(file_name) {
            Some((_, rest)) => rest.trim(),
            None => self.text.trim(),
        }
    }
}

/// Key/value pairs from a `.NOTES` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    pub entries: Vec<NoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub key: String,
    pub value: String,
}

impl Notes {
    /// Split on `;`, then each segment on its first `:`.
    ///
    /// `"Author: Jane; Version: 1.0"` gives two entries. Further colons stay
    /// in the value. A segment without a colon is a key with an empty value.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(';')
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| match segment.split_once(':') {
                Some((key, value)) => NoteEntry {
                    key: key.trim().to_string(),
                    value: value.trim().to_string(),
                },
                None => NoteEntry {
                    key: segment.trim().to_string(),
                    value: String::new(),
                },
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub title: String,
    pub code: String,
}

/// A documented script parameter.
///
/// Attribute fields hold display strings; empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub type_name: String,
    pub default_value: String,
    pub parameter_value: String,
    pub pipeline_input: String,
    pub position: String,
    pub required: String,
}

/// A help section that may be missing from a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Synopsis,
    Syntax,
    Notes,
    Description,
    Examples,
    Parameters,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Synopsis => "Synopsis",
            Section::Syntax => "Syntax",
            Section::Notes => "Notes",
            Section::Description => "Description",
            Section::Examples => "Examples",
            Section::Parameters => "Parameters",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_file_names() {
        let file = ScriptFile::new(Path::new("scripts/Deploy/Install-App.ps1"));
        assert_eq!(file.base_name, "Install-App");
        assert_eq!(file.dir_name, "Deploy");
        assert_eq!(file.file_name(), "Install-App.ps1");
    }

    #[test]
    fn notes_two_entries() {
        let notes = Notes::parse("Author: Jane; Version: 1.0");
        assert_eq!(
            notes.entries,
            vec![
                NoteEntry { key: "Author".into(), value: "Jane".into() },
                NoteEntry { key: "Version".into(), value: "1.0".into() },
            ]
        );
    }

    #[test]
    fn notes_first_colon_only() {
        let notes = Notes::parse("Updated: 2024-01-01 10:30");
        assert_eq!(notes.entries[0].key, "Updated");
        assert_eq!(notes.entries[0].value, "2024-01-01 10:30");
    }

    #[test]
    fn notes_without_colon_and_trailing_semicolon() {
        let notes = Notes::parse("Internal use only;");
        assert_eq!(notes.entries.len(), 1);
        assert_eq!(notes.entries[0].key, "Internal use only");
        assert_eq!(notes.entries[0].value, "");
    }

    #[test]
    fn syntax_usage_after_file_name() {
        let syntax = Syntax {
            text: "Get-Widget.ps1 [-Path] <String> [<CommonParameters>]".into(),
        };
        assert_eq!(
            syntax.usage("Get-Widget.ps1"),
            "[-Path] <String> [<CommonParameters>]"
        );
    }

    #[test]
    fn syntax_usage_without_name() {
        let syntax = Syntax { text: "  [-Force]  ".into() };
        assert_eq!(syntax.usage("Other.ps1"), "[-Force]");
    }

    #[test]
    fn missing_sections_all() {
        let help = HelpMetadata::default();
        assert_eq!(help.missing_sections().len(), 6);
        assert_eq!(help.missing_sections()[0], Section::Synopsis);
    }
}
