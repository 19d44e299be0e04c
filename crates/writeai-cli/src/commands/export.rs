//! Export command handler

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use writeai_core::export::{self, ExportFormat};
use writeai_core::{ProjectStorage, ProjectStore};

use super::resolve_id;
use crate::output::{Output, OutputFormat};

/// Export a project to a file
///
/// Writes into `out_dir` (current directory by default).
pub fn run<S: ProjectStorage>(
    store: &ProjectStore<S>,
    id: String,
    format: String,
    out_dir: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let id = resolve_id(&id, store)?;
    let project = store
        .get(&id)
        .ok_or_else(|| anyhow!("Project not found: {}", id))?;

    let file = export::export(project, format);
    let dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
    let path = file.write_to(&dir).context("Failed to export project")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": path,
                    "filename": file.filename,
                    "format": format,
                    "mime_type": file.mime_type,
                    "bytes": file.bytes.len()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", path.display());
        }
        OutputFormat::Human => {
            if matches!(format, ExportFormat::Pdf | ExportFormat::Docx) {
                println!("Note: {} export is saved as plain text.", format);
            }
            output.success(&format!("Exported to {}", path.display()));
        }
    }

    Ok(())
}
