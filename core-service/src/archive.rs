//! Opaque-append strategy
//!
//! Archives are treated as opaque byte blobs: the payload is appended after
//! the last byte behind a fixed marker. Archive readers that locate their
//! index from the start of the file, or that tolerate trailing data, keep
//! working on the result.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::classifier::AppendPolicy;
use crate::error::{Result, StegoError};

/// Separates the carrier's bytes from the payload.
pub const MARKER: &[u8] = b"<<SECRET_MSG_START>>";

/// Largest payload `policy` admits, in bytes; `None` if unbounded.
pub fn payload_limit(policy: AppendPolicy) -> Option<usize> {
    policy
        .max_trailer
        .map(|max| max.saturating_sub(MARKER.len()))
}

/// Write `input`'s bytes followed by the marker and `payload` to `output`.
pub fn embed(input: &Path, output: &Path, payload: &str, policy: AppendPolicy) -> Result<()> {
    if let Some(limit) = payload_limit(policy) {
        if payload.len() > limit {
            return Err(StegoError::CapacityExceeded(format!(
                "{} payload bytes exceed the {}-byte trailer limit",
                payload.len(),
                limit
            )));
        }
    }

    let mut data = fs::read(input)?;
    let carrier_len = data.len();
    data.reserve(MARKER.len() + payload.len());
    data.extend_from_slice(MARKER);
    data.extend_from_slice(payload.as_bytes());
    fs::write(output, &data)?;

    debug!(carrier_len, trailer_len = data.len() - carrier_len, "Appended payload");
    Ok(())
}

/// Recover the payload following the first marker in `input`.
///
/// Malformed UTF-8 is replaced rather than rejected.
pub fn extract(input: &Path) -> Result<String> {
    let data = fs::read(input)?;

    let start = find_marker(&data)
        .ok_or_else(|| StegoError::NoHiddenPayload("payload marker not found".to_string()))?;
    let trailer = &data[start + MARKER.len()..];

    if trailer.is_empty() {
        return Err(StegoError::NoHiddenPayload(
            "nothing follows the payload marker".to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(trailer).into_owned())
}

fn find_marker(data: &[u8]) -> Option<usize> {
    data.windows(MARKER.len()).position(|window| window == MARKER)
}
