//! Per-script Markdown document.
//!
//! Section order and heading text are fixed: wiki pages and links built on
//! top of the output depend on them.

use super::{fenced, table_cell, AZURE_TOC_MARKER};
use crate::model::*;

const CODE_LANG: &str = "powershell";

/// Render one script's help as a Markdown document.
///
/// Each present section renders on its own; a missing one is simply left out.
pub fn render(file: &ScriptFile, help: &HelpMetadata, toc_marker: bool) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if toc_marker {
        blocks.push(AZURE_TOC_MARKER.to_string());
    }

    if let Some(ref synopsis) = help.synopsis {
        blocks.push("## Synopsis".to_string());
        blocks.push(synopsis.clone());
    }

    if let Some(ref syntax) = help.syntax {
        let file_name = file.file_name();
        let invocation = format!(".\\{} {}", file_name, syntax.usage(&file_name));
        blocks.push(fenced(CODE_LANG, invocation.trim_end()));
    }

    if let Some(ref notes) = help.notes {
        blocks.push("## Information".to_string());
        for entry in &notes.entries {
            blocks.push(render_note(entry));
        }
    }

    if let Some(ref description) = help.description {
        blocks.push("## Description".to_string());
        blocks.push(description.clone());
    }

    if !help.examples.is_empty() {
        blocks.push("## Examples".to_string());
        for example in &help.examples {
            blocks.push(format!("### {}", example_title(&example.title)));
            blocks.push(fenced(CODE_LANG, &example.code));
        }
    }

    if !help.parameters.is_empty() {
        blocks.push("## Parameters".to_string());
        for param in &help.parameters {
            blocks.push(format!("### {}", param.name));
            if !param.description.is_empty() {
                blocks.push(param.description.clone());
            }
            blocks.push(parameter_table(param));
        }
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

/// `**Author:** Jane`
fn render_note(entry: &NoteEntry) -> String {
    format!("**{}:** {}", entry.key, entry.value)
        .trim_end()
        .to_string()
}

/// `-------------------------- EXAMPLE 1 --------------------------` → `Example 1`
fn example_title(raw: &str) -> String {
    raw.replace("--------------------------", "")
        .replace("EXAMPLE", "Example")
        .trim()
        .to_string()
}

/// Two-column attribute table. `Type` is always present; other rows only
/// when their value is set.
fn parameter_table(param: &Parameter) -> String {
    let mut rows = vec![
        "| | |".to_string(),
        "|-|-|".to_string(),
        format!("| Type | {} |", table_cell(&param.type_name)),
    ];
    let attributes = [
        ("DefaultValue", &param.default_value),
        ("ParameterValue", &param.parameter_value),
        ("PipelineInput", &param.pipeline_input),
        ("Position", &param.position),
        ("Required", &param.required),
    ];
    for (label, value) in attributes {
        if !value.is_empty() {
            rows.push(format!("| {} | {} |", label, table_cell(value)));
        }
    }
    rows.join("\n")
}
