//! Markdown rendering helpers shared by the per-script and summary documents.

pub mod markdown;

/// Placeholder the AzureDevOps wiki replaces with a table of contents.
pub const AZURE_TOC_MARKER: &str = "[[_TOC_]]";

/// Wrap `code` in a fenced block tagged `lang`.
///
/// The fence is made longer than any backtick run inside the code.
pub fn fenced(lang: &str, code: &str) -> String {
    let longest = code
        .lines()
        .map(|l| {
            let t = l.trim_start();
            t.len() - t.trim_start_matches('`').len()
        })
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest.max(2) + 1);
    format!("{fence}{lang}\n{code}\n{fence}")
}

/// Make a value safe for a single table cell.
pub fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_default() {
        assert_eq!(fenced("powershell", "Get-Item ."), "```powershell\nGet-Item .\n```");
    }

    #[test]
    fn fence_grows_past_inner_backticks() {
        assert_eq!(fenced("text", "````\nx\n````"), "`````text\n````\nx\n````\n`````");
    }

    #[test]
    fn cell_escapes_pipes_and_newlines() {
        assert_eq!(table_cell("a|b\nc"), "a\\|b c");
    }
}
