//! Drafting in $EDITOR
//!
//! A project is opened as a draft file: a short `#` header carrying the
//! title and type, a marker line, then the content. After the editor exits
//! the header is read back (so the title can be changed in place) and
//! stripped from the content.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};

use writeai_core::ProjectType;

/// Everything after this line is project content
const CONTENT_MARKER: &str = "# ---- write below this line ----";

const TITLE_PREFIX: &str = "# Title:";

/// A draft as handed to, and read back from, the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub kind: ProjectType,
    pub content: String,
}

impl Draft {
    pub fn new(title: impl Into<String>, kind: ProjectType, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            content: content.into(),
        }
    }

    /// File text shown in the editor
    pub fn render(&self) -> String {
        format!(
            "{} {}\n# Type: {}\n# Header lines are not saved; edit the title above.\n{}\n{}",
            TITLE_PREFIX, self.title, self.kind, CONTENT_MARKER, self.content
        )
    }

    /// Read an edited file back
    ///
    /// Without the marker the whole file is content and the title is kept.
    /// A blank title line also keeps the old title.
    pub fn parse(&self, edited: &str) -> Draft {
        let Some((header, content)) = split_at_marker(edited) else {
            return Draft::new(self.title.clone(), self.kind, edited);
        };

        let title = header
            .lines()
            .find_map(|line| line.strip_prefix(TITLE_PREFIX))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.title.as_str());

        Draft::new(title, self.kind, content)
    }

    /// `.md` for prose, `.txt` otherwise, so editors pick a sensible mode
    fn extension(&self) -> &'static str {
        match self.kind {
            ProjectType::Story | ProjectType::Article => ".md",
            ProjectType::Script | ProjectType::Other => ".txt",
        }
    }
}

fn split_at_marker(text: &str) -> Option<(&str, &str)> {
    let start = text.find(CONTENT_MARKER)?;
    let rest = &text[start + CONTENT_MARKER.len()..];
    let content = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    Some((&text[..start], content))
}

/// Open `draft` in the user's editor and return the edited draft
pub fn edit_draft(draft: &Draft) -> Result<Draft> {
    let editor = find_editor()?;

    let mut file = tempfile::Builder::new()
        .prefix("writeai_draft_")
        .suffix(draft.extension())
        .tempfile()
        .context("Failed to create draft file")?;
    file.write_all(draft.render().as_bytes())
        .context("Failed to write draft file")?;
    file.flush().context("Failed to write draft file")?;

    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    // Editors often replace the file, so read it back by path
    let edited = fs::read_to_string(file.path())
        .with_context(|| format!("Failed to read draft file: {:?}", file.path()))?;

    Ok(draft.parse(&edited))
}

/// $EDITOR, then $VISUAL, then the first common editor on PATH
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    ["nano", "vim", "vi", "notepad"]
        .into_iter()
        .find(|editor| command_exists(editor))
        .map(str::to_string)
        .context("No editor found. Set $EDITOR, e.g. export EDITOR=nano")
}

fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Whether stdin is an interactive terminal
pub fn stdin_is_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Ask a yes/no question; always "no" without a terminal
pub fn confirm(prompt: &str) -> Result<bool> {
    if !stdin_is_tty() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_then_parse_unchanged() {
        let draft = Draft::new("The Lighthouse", ProjectType::Story, "Waves.\n\nMore waves.");
        let text = draft.render();
        assert!(text.starts_with("# Title: The Lighthouse\n# Type: story\n"));
        assert!(text.ends_with("# ---- write below this line ----\nWaves.\n\nMore waves."));
        assert_eq!(draft.parse(&text), draft);
    }

    #[test]
    fn test_parse_picks_up_new_title_and_content() {
        let draft = Draft::new("Untitled", ProjectType::Article, "");
        let edited = "# Title:  Field Notes \n# Type: article\n# ---- write below this line ----\nDay one.\n";

        let parsed = draft.parse(edited);
        assert_eq!(parsed.title, "Field Notes");
        assert_eq!(parsed.content, "Day one.\n");
        assert_eq!(parsed.kind, ProjectType::Article);
    }

    #[test]
    fn test_parse_blank_title_keeps_old_one() {
        let draft = Draft::new("Keep Me", ProjectType::Other, "");
        let edited = "# Title:\n# ---- write below this line ----\nbody";
        assert_eq!(draft.parse(edited).title, "Keep Me");
    }

    #[test]
    fn test_parse_without_marker_is_all_content() {
        let draft = Draft::new("Script", ProjectType::Script, "old");
        let parsed = draft.parse("INT. HOUSE - DAY\n# not a header\n");
        assert_eq!(parsed.title, "Script");
        assert_eq!(parsed.content, "INT. HOUSE - DAY\n# not a header\n");
    }

    #[test]
    fn test_extension_follows_type() {
        assert_eq!(Draft::new("", ProjectType::Story, "").extension(), ".md");
        assert_eq!(Draft::new("", ProjectType::Script, "").extension(), ".txt");
    }

    #[test]
    fn test_command_exists() {
        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
