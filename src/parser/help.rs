//! Comment-based help block scanner.
//!
//! Finds the first comment block (either `<# ... #>` or a run of `#` line
//! comments) that contains a help keyword line such as `.SYNOPSIS`, and splits
//! it into keyword sections.

use super::ExtractError;
use regex::Regex;
use std::sync::LazyLock;

static RE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^[[:space:]]*\.(SYNOPSIS|DESCRIPTION|PARAMETER|EXAMPLE|INPUTS|OUTPUTS|NOTES|LINK",
        r"|COMPONENT|ROLE|FUNCTIONALITY|FORWARDHELPTARGETNAME|FORWARDHELPCATEGORY",
        r"|REMOTEHELPRUNSPACE|EXTERNALHELP)(?:[[:space:]]+(.*?))?[[:space:]]*$"
    ))
    .unwrap()
});

static RE_REQUIRES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#requires[[:space:]]").unwrap());

/// One keyword section of a help block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    /// Upper-cased keyword without the dot, e.g. "PARAMETER"
    pub keyword: String,
    /// Text after the keyword on the same line, e.g. the parameter name
    pub argument: Option<String>,
    /// Unindented section body
    pub body: String,
}

/// Locate the help block and split it into sections.
///
/// Returns `Ok(None)` when no comment block carries a help keyword.
pub fn extract(source: &str) -> Result<Option<Vec<HelpSection>>, ExtractError> {
    for block in comment_blocks(source)? {
        if block.iter().any(|l| RE_KEYWORD.is_match(l)) {
            return Ok(Some(split_sections(&block)));
        }
    }
    Ok(None)
}

/// Collect comment blocks in source order, each as its inner text lines.
fn comment_blocks(source: &str) -> Result<Vec<Vec<String>>, ExtractError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim_start();

        if let Some(rest) = trimmed.strip_prefix("<#") {
            let start = i;
            let mut block = Vec::new();
            if let Some((inner, _)) = rest.split_once("#>") {
                block.push(inner.to_string());
                blocks.push(block);
                i += 1;
                continue;
            }
            block.push(rest.to_string());
            i += 1;
            loop {
                let Some(line) = lines.get(i) else {
                    return Err(ExtractError::UnterminatedBlock { line: start + 1 });
                };
                i += 1;
                if let Some((inner, _)) = line.split_once("#>") {
                    block.push(inner.to_string());
                    break;
                }
                block.push(line.to_string());
            }
            blocks.push(block);
            continue;
        }

        if is_line_comment(lines[i]) {
            let mut block = Vec::new();
            while i < lines.len() && is_line_comment(lines[i]) {
                let text = lines[i].trim_start();
                block.push(text[1..].to_string());
                i += 1;
            }
            blocks.push(block);
            continue;
        }

        i += 1;
    }

    Ok(blocks)
}

/// A `#` comment line that can be part of a help block.
fn is_line_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#')
        && !trimmed.starts_with("#>")
        && !trimmed.starts_with("#!")
        && !RE_REQUIRES.is_match(line)
}

fn split_sections(block: &[String]) -> Vec<HelpSection> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Option<String>, Vec<&str>)> = None;

    for line in block {
        if let Some(caps) = RE_KEYWORD.captures(line) {
            if let Some((keyword, argument, body)) = current.take() {
                sections.push(HelpSection {
                    keyword,
                    argument,
                    body: clean_text(&body),
                });
            }
            let argument = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|a| !a.is_empty());
            current = Some((caps[1].to_uppercase(), argument, Vec::new()));
        } else if let Some((_, _, ref mut body)) = current {
            body.push(line.as_str());
        }
    }

    if let Some((keyword, argument, body)) = current {
        sections.push(HelpSection {
            keyword,
            argument,
            body: clean_text(&body),
        });
    }

    sections
}

/// Drop blank leading/trailing lines and remove common indentation.
fn clean_text(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let lines = &lines[start..=end];

    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| l.get(min_indent..).map_or_else(|| l.trim(), str::trim_end))
        .collect::<Vec<_>>()
        .join("\n")
}
