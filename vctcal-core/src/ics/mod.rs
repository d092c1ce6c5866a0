//! ICS file generation and parsing.
//!
//! This module handles reading and writing calendar files according to RFC 5545.

mod generate;
mod parse;

use std::path::Path;

pub use generate::encode_document;
pub use parse::decode_document;

use crate::document::CalendarDocument;
use crate::error::VctResult;
use crate::season::Season;

/// Read a calendar file. A missing file is an error; callers decide whether
/// that means "start from scratch".
pub fn load_document(path: &Path, season: &Season) -> VctResult<CalendarDocument> {
    let content = std::fs::read_to_string(path)?;
    decode_document(&content, season)
}

/// Write a calendar file atomically: readers see either the old or the new
/// file, never a partial one.
pub fn save_document(path: &Path, document: &CalendarDocument, season: &Season) -> VctResult<()> {
    let content = encode_document(document, season)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");

    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}
