//! Project export
//!
//! Renders a project into a downloadable file. `pdf` and `docx` have no real
//! encoder and fall back to plain text with a `.txt` name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::models::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Html,
    Txt,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown export format '{0}'. Expected one of: pdf, docx, html, txt")]
pub struct UnknownFormat(pub String);

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Html,
        ExportFormat::Txt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Html => "html",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            _ => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html",
            _ => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "html" | "htm" => Ok(ExportFormat::Html),
            "txt" | "text" => Ok(ExportFormat::Txt),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A rendered export, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write into `dir` under `filename`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory: {:?}", dir))?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)
            .with_context(|| format!("Failed to write export: {:?}", path))?;
        Ok(path)
    }
}

/// Render `project` in `format`
pub fn export(project: &Project, format: ExportFormat) -> ExportedFile {
    let title = project.title();
    let content = project.content();

    let body = match format {
        ExportFormat::Pdf | ExportFormat::Docx => format!("{}\n\n{}", title, content),
        ExportFormat::Txt => format!(
            "{}\n{}\n\n{}",
            title,
            "=".repeat(title.chars().count()),
            content
        ),
        ExportFormat::Html => render_html(title, content),
    };

    ExportedFile {
        filename: filename(title, format),
        mime_type: format.mime_type(),
        bytes: body.into_bytes(),
    }
}

/// File name for `title`
///
/// Each whitespace run (leading and trailing ones included) becomes one `_`
/// and path separators become `-`. A blank title exports as `untitled`.
pub fn filename(title: &str, format: ExportFormat) -> String {
    if title.trim().is_empty() {
        return format!("untitled.{}", format.extension());
    }

    let mut stem = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        stem.push(if c == '/' || c == '\\' { '-' } else { c });
    }
    format!("{}.{}", stem, format.extension())
}

fn render_html(title: &str, content: &str) -> String {
    let title = escape_html(title);
    let body = escape_html(content).replace('\n', "<br>");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Georgia, serif; max-width: 800px; margin: 0 auto; padding: 2rem; line-height: 1.6; }}
    h1 {{ color: #333; border-bottom: 2px solid #3b82f6; padding-bottom: 0.5rem; }}
    p {{ margin-bottom: 1rem; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div>{body}</div>
</body>
</html>
"#
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectType;
    use tempfile::TempDir;

    fn project(title: &str, content: &str) -> Project {
        Project::new(title, content, ProjectType::Story)
    }

    fn text(file: &ExportedFile) -> &str {
        std::str::from_utf8(&file.bytes).unwrap()
    }

    #[test]
    fn test_txt_export() {
        let file = export(&project("My Story", "Once upon a time."), ExportFormat::Txt);
        assert_eq!(file.filename, "My_Story.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(text(&file), "My Story\n========\n\nOnce upon a time.");
    }

    #[test]
    fn test_underline_counts_chars() {
        let file = export(&project("Café", ""), ExportFormat::Txt);
        assert_eq!(text(&file), "Café\n====\n\n");
    }

    #[test]
    fn test_pdf_and_docx_fall_back_to_text() {
        let p = project("Draft  Two", "Body");
        for format in [ExportFormat::Pdf, ExportFormat::Docx] {
            let file = export(&p, format);
            assert_eq!(file.filename, "Draft_Two.txt");
            assert_eq!(file.mime_type, "text/plain");
            assert_eq!(text(&file), "Draft  Two\n\nBody");
        }
    }

    #[test]
    fn test_html_export() {
        let file = export(
            &project("Tom & Jerry", "Line one\nLine <two>"),
            ExportFormat::Html,
        );
        assert_eq!(file.filename, "Tom_&_Jerry.html");
        assert_eq!(file.mime_type, "text/html");

        let html = text(&file);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Tom &amp; Jerry</title>"));
        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains("<div>Line one<br>Line &lt;two&gt;</div>"));
        assert!(html.contains("font-family: Georgia, serif;"));
    }

    #[test]
    fn test_filename() {
        assert_eq!(filename("  A\tB \n C ", ExportFormat::Txt), "_A_B_C_.txt");
        assert_eq!(filename(" My Title ", ExportFormat::Txt), "_My_Title_.txt");
        assert_eq!(filename("", ExportFormat::Html), "untitled.html");
        assert_eq!(filename("   ", ExportFormat::Pdf), "untitled.txt");
        assert_eq!(filename("Act 1/Scene 2", ExportFormat::Txt), "Act_1-Scene_2.txt");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert_eq!(
            "rtf".parse::<ExportFormat>().unwrap_err(),
            UnknownFormat("rtf".to_string())
        );
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_write_to() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("exports");

        let file = export(&project("Saved", "words"), ExportFormat::Txt);
        let path = file.write_to(&out_dir).unwrap();

        assert_eq!(path, out_dir.join("Saved.txt"));
        assert_eq!(fs::read(&path).unwrap(), file.bytes);
    }
}
