//! GitHub-style table of contents generated from a rendered document's headings.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Produces a table-of-contents block for an already written Markdown file.
pub trait TocGenerator {
    fn generate(&self, rendered: &Path) -> Result<String>;
}

/// Builds a nested link list from the `##`..`######` headings of a file.
pub struct HeadingToc;

impl TocGenerator for HeadingToc {
    fn generate(&self, rendered: &Path) -> Result<String> {
        let content = fs::read_to_string(rendered)
            .with_context(|| format!("failed to read {}", rendered.display()))?;
        Ok(build_toc(&content))
    }
}

/// Link list for the headings of `markdown`, followed by a blank line.
///
/// Returns an empty string when there are no headings. Headings inside fenced
/// code blocks are ignored.
pub fn build_toc(markdown: &str) -> String {
    let mut items = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut fence: Option<(char, usize)> = None;

    for line in markdown.lines() {
        let trimmed = line.trim_start();

        if let Some((ch, len)) = fence {
            let run = trimmed.len() - trimmed.trim_start_matches(ch).len();
            if run >= len && trimmed[run..].trim().is_empty() {
                fence = None;
            }
            continue;
        }
        if let Some(open) = fence_open(trimmed) {
            fence = Some(open);
            continue;
        }

        let Some((level, text)) = heading(line) else {
            continue;
        };
        let slug = unique_slug(&mut seen, github_slug(text));
        let indent = "  ".repeat(level - 2);
        items.push(format!("{}- [{}](#{})", indent, text, slug));
    }

    if items.is_empty() {
        return String::new();
    }
    format!("{}\n\n", items.join("\n"))
}

/// Opening code fence: three or more backticks or tildes.
fn fence_open(trimmed: &str) -> Option<(char, usize)> {
    for ch in ['`', '~'] {
        let run = trimmed.len() - trimmed.trim_start_matches(ch).len();
        if run >= 3 {
            return Some((ch, run));
        }
    }
    None
}

/// `### Path` → `(3, "Path")`. Level 1 headings are not listed.
fn heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if !(2..=6).contains(&hashes) {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?.trim();
    let text = text.trim_end_matches('#').trim_end();
    if text.is_empty() {
        return None;
    }
    Some((hashes, text))
}

/// GitHub heading anchor slug.
///
/// - lowercase
/// - drop everything that isn't alphanumeric, space, underscore or hyphen
/// - spaces become hyphens
fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Repeated anchors get `-1`, `-2`, ... like GitHub does.
fn unique_slug(seen: &mut HashMap<String, usize>, slug: String) -> String {
    let count = seen.entry(slug.clone()).or_insert(0);
    let result = if *count == 0 {
        slug
    } else {
        format!("{}-{}", slug, count)
    };
    *count += 1;
    result
}
