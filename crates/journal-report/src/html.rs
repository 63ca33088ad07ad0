//! Page output shared by the reports.

use askama::Template;
use journal_core::error::ReportError;
use std::fs;
use std::path::Path;

/// Render a template into a string.
pub(crate) fn render<T: Template>(template: &T) -> Result<String, ReportError> {
    template.render().map_err(|e| ReportError::Render(e.to_string()))
}

/// Write a page, creating parent directories as needed.
pub fn write_page(path: &Path, html: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}
