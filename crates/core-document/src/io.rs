//! Plain-text line I/O.
//!
//! Reading splits on `\n` and strips a trailing `\r` per line, so CRLF
//! files load cleanly. A missing or unreadable path is not an error: the
//! caller gets a fresh single-empty-line document flagged as a new file,
//! which is how "edit a path that does not exist yet" behaves. Writing
//! emits one newline per line; write failures are surfaced so the caller
//! can keep the buffer dirty.

use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::Document;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Outcome of loading a path into line texts.
#[derive(Debug)]
pub struct ReadOutcome {
    pub document: Document,
    /// False when the path was missing or unreadable (treated as a new file).
    pub existed: bool,
}

/// Load `path` into a document. Never fails; see module docs.
pub fn read_document(path: &Path) -> ReadOutcome {
    match fs::read_to_string(path) {
        Ok(content) => {
            let mut lines: Vec<String> = content
                .split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect();
            // A trailing newline produces one phantom empty element.
            if content.ends_with('\n') {
                lines.pop();
            }
            debug!(target: "document.io", path = %path.display(), lines = lines.len(), "read");
            ReadOutcome {
                document: Document::from_lines(lines),
                existed: true,
            }
        }
        Err(e) => {
            debug!(target: "document.io", path = %path.display(), error = %e, "read_missing");
            ReadOutcome {
                document: Document::new(),
                existed: false,
            }
        }
    }
}

/// Write every line of `doc` to `path`, one newline per line.
pub fn write_document(path: &Path, doc: &Document) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = fs::File::create(path).map_err(io_err)?;
    for id in doc.iter() {
        file.write_all(doc.text(id).as_bytes()).map_err(io_err)?;
        file.write_all(b"\n").map_err(io_err)?;
    }
    debug!(target: "document.io", path = %path.display(), lines = doc.total_lines(), "write");
    Ok(())
}
