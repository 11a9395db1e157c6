//! Caller-facing result reports
//!
//! Hosts that only show a status line (a dialog, a CLI) can collapse an
//! operation result into `(ok, message)` here. On success the message is a
//! confirmation for embeds and the recovered payload for extracts; on
//! failure it is the error's display text.

use std::path::PathBuf;

use crate::error::Result;

pub fn embed_report(result: Result<PathBuf>) -> (bool, String) {
    match result {
        Ok(path) => (true, format!("Payload embedded in {}", path.display())),
        Err(err) => (false, err.to_string()),
    }
}

pub fn extract_report(result: Result<String>) -> (bool, String) {
    match result {
        Ok(payload) => (true, payload),
        Err(err) => (false, err.to_string()),
    }
}
