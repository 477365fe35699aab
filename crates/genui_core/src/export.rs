//! crates/genui_core/src/export.rs
//!
//! Copy and download actions over the current code payload. Both only read the
//! payload; neither changes the session.

use crate::error::ExportError;
use crate::ports::{ClipboardService, PortError};
use tracing::{info, warn};

/// Every download uses this name: the payload is always one self-contained HTML document.
pub const DOWNLOAD_FILE_NAME: &str = "GenUI-Code.html";
pub const DOWNLOAD_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// An in-memory file ready to be offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub contents: String,
}

/// Writes the code to the clipboard. Blank code is refused before the clipboard is touched.
pub async fn copy(clipboard: &dyn ClipboardService, code: &str) -> Result<(), ExportError> {
    if code.trim().is_empty() {
        return Err(ExportError::NothingToCopy);
    }

    clipboard.write_text(code).await.map_err(|e| {
        warn!("Clipboard write failed: {}", e);
        match e {
            PortError::Unavailable(reason) => ExportError::Clipboard(reason),
            other => ExportError::Clipboard(other.to_string()),
        }
    })?;

    info!(len = code.len(), "Code copied to clipboard");
    Ok(())
}

/// Packages the code as a downloadable file.
pub fn download(code: &str) -> Result<ExportFile, ExportError> {
    if code.trim().is_empty() {
        return Err(ExportError::NothingToDownload);
    }

    Ok(ExportFile {
        file_name: DOWNLOAD_FILE_NAME,
        content_type: DOWNLOAD_CONTENT_TYPE,
        contents: code.to_string(),
    })
}
