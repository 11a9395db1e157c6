//! # Sample-Domain Error Types

use crate::framer::FramingError;
use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors raised while framing, embedding, extracting, or (de)serializing
/// sample carriers.
#[derive(Error, Debug)]
pub enum SampleError {
    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// Frame does not fit in the carrier's sample bytes.
    #[error("Capacity exceeded: frame needs {required} sample bytes, carrier has {available}")]
    CapacityExceeded { required: usize, available: usize },

    /// Payload cannot be represented by the 32-bit length prefix.
    #[error("Payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Carrier holds no recoverable payload.
    #[error("No hidden payload: {0}")]
    NoHiddenPayload(String),

    // ========================================================================
    // Carrier Errors
    // ========================================================================
    /// Carrier bytes do not follow the expected container layout.
    #[error("Malformed carrier: {0}")]
    MalformedCarrier(String),

    /// Carrier is well-formed but uses a sample layout we cannot address.
    #[error("Unsupported sample layout: {0}")]
    UnsupportedLayout(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FramingError> for SampleError {
    fn from(err: FramingError) -> Self {
        match err {
            FramingError::PayloadTooLarge(len) => SampleError::PayloadTooLarge(len),
            FramingError::NoValidPayload(_) | FramingError::TruncatedPayload { .. } => {
                SampleError::NoHiddenPayload(err.to_string())
            }
        }
    }
}

impl From<SampleError> for BridgeError {
    fn from(err: SampleError) -> Self {
        match err {
            SampleError::Io(e) => BridgeError::Io(e),
            SampleError::MalformedCarrier(_) | SampleError::UnsupportedLayout(_) => {
                BridgeError::InvalidData(err.to_string())
            }
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SampleError>;
