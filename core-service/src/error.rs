//! # Engine Error Types
//!
//! Every failure an embed or extract can report, as one flat enum whose
//! variants map one-to-one onto [`ErrorKind`]. Hosts that only need the
//! category match on [`StegoError::kind`]; the human-readable detail is in
//! [`StegoError::detail`].

use bridge_traits::error::BridgeError;
use core_metadata::MetadataError;
use core_samples::SampleError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    CapacityExceeded,
    PayloadTooLarge,
    NoHiddenPayload,
    TruncatedPayload,
    TranscodeFailed,
    TagIOFailed,
    IOFailure,
}

#[derive(Error, Debug)]
pub enum StegoError {
    /// The carrier's extension has no strategy.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The payload does not fit in the carrier.
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// The payload cannot be framed at all.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Nothing is hidden in the carrier, or what is there is not a payload.
    #[error("No hidden payload: {0}")]
    NoHiddenPayload(String),

    /// A frame header was found but the carrier ends before its payload.
    ///
    /// Not raised by the built-in strategies: the LSB codec reports a frame
    /// cut short as [`StegoError::NoHiddenPayload`].
    #[error("Truncated payload: {0}")]
    TruncatedPayload(String),

    #[error("Transcode failed: {0}")]
    TranscodeFailed(String),

    #[error("Tag I/O failed: {0}")]
    TagIOFailed(String),

    #[error("I/O failure: {0}")]
    IOFailure(String),
}

impl StegoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StegoError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            StegoError::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            StegoError::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            StegoError::NoHiddenPayload(_) => ErrorKind::NoHiddenPayload,
            StegoError::TruncatedPayload(_) => ErrorKind::TruncatedPayload,
            StegoError::TranscodeFailed(_) => ErrorKind::TranscodeFailed,
            StegoError::TagIOFailed(_) => ErrorKind::TagIOFailed,
            StegoError::IOFailure(_) => ErrorKind::IOFailure,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            StegoError::UnsupportedFormat(detail)
            | StegoError::CapacityExceeded(detail)
            | StegoError::PayloadTooLarge(detail)
            | StegoError::NoHiddenPayload(detail)
            | StegoError::TruncatedPayload(detail)
            | StegoError::TranscodeFailed(detail)
            | StegoError::TagIOFailed(detail)
            | StegoError::IOFailure(detail) => detail,
        }
    }

    /// Transcoder failures, whatever their bridge-level cause.
    pub(crate) fn transcode(err: BridgeError) -> Self {
        StegoError::TranscodeFailed(err.to_string())
    }

    /// Sample stream read/write failures.
    pub(crate) fn sample_io(err: BridgeError) -> Self {
        StegoError::IOFailure(err.to_string())
    }
}

impl From<SampleError> for StegoError {
    fn from(err: SampleError) -> Self {
        match err {
            SampleError::CapacityExceeded {
                required,
                available,
            } => StegoError::CapacityExceeded(format!(
                "payload frame needs {} sample bytes, carrier has {}",
                required, available
            )),
            SampleError::PayloadTooLarge(len) => StegoError::PayloadTooLarge(format!(
                "{} bytes exceed the 32-bit length prefix",
                len
            )),
            SampleError::NoHiddenPayload(detail) => StegoError::NoHiddenPayload(detail),
            other => StegoError::IOFailure(other.to_string()),
        }
    }
}

impl From<MetadataError> for StegoError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NoHiddenPayload(detail) => StegoError::NoHiddenPayload(detail),
            MetadataError::Bridge(e) => StegoError::TagIOFailed(e.to_string()),
            MetadataError::Io(e) => StegoError::IOFailure(e.to_string()),
        }
    }
}

impl From<core_runtime::Error> for StegoError {
    fn from(err: core_runtime::Error) -> Self {
        StegoError::IOFailure(err.to_string())
    }
}

impl From<std::io::Error> for StegoError {
    fn from(err: std::io::Error) -> Self {
        StegoError::IOFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use core_samples::FramingError;

    #[test]
    fn test_kind_and_detail() {
        let err = StegoError::NoHiddenPayload("marker not found".to_string());
        assert_eq!(err.kind(), ErrorKind::NoHiddenPayload);
        assert_eq!(err.detail(), "marker not found");
        assert_eq!(err.to_string(), "No hidden payload: marker not found");
    }

    #[test]
    fn test_sample_error_mapping() {
        let err: StegoError = SampleError::CapacityExceeded {
            required: 88,
            available: 87,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert!(err.detail().contains("88"));

        // a carrier cut short of its declared payload holds nothing usable
        let err: StegoError = SampleError::from(FramingError::TruncatedPayload {
            expected: 80,
            available: 12,
        })
        .into();
        assert_eq!(err.kind(), ErrorKind::NoHiddenPayload);
        assert!(err.detail().contains("expected 80 bits, 12 available"));

        let err: StegoError = SampleError::MalformedCarrier("no fmt chunk".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::IOFailure);
    }

    #[test]
    fn test_metadata_error_mapping() {
        let err: StegoError =
            MetadataError::Bridge(BridgeError::OperationFailed("bad atom".to_string())).into();
        assert_eq!(err.kind(), ErrorKind::TagIOFailed);

        let err: StegoError = MetadataError::NoHiddenPayload("no entry".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::NoHiddenPayload);
    }

    #[test]
    fn test_transcode_mapping_ignores_bridge_variant() {
        let err = StegoError::transcode(BridgeError::NotAvailable("ffmpeg".to_string()));
        assert_eq!(err.kind(), ErrorKind::TranscodeFailed);
    }

    #[test]
    fn test_error_kind_serializes_by_name() {
        let json = serde_json::to_string(&ErrorKind::TagIOFailed).unwrap();
        assert_eq!(json, "\"TagIOFailed\"");

        let kind: ErrorKind = serde_json::from_str("\"CapacityExceeded\"").unwrap();
        assert_eq!(kind, ErrorKind::CapacityExceeded);
    }
}
