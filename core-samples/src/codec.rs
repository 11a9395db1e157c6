//! Least-significant-bit codec
//!
//! Hides a framed bit sequence in the low bit of consecutive sample bytes.
//! Bit `i` of the frame lands in the LSB of byte `i`; every other bit of
//! every byte is left alone, and bytes past the frame are untouched.
//!
//! The codec is indifferent to what the bytes mean: PCM samples, pixel
//! channels, or anything else. Container parsing lives in
//! [`wav`](crate::wav) and [`raster`](crate::raster).

use crate::error::{Result, SampleError};
use crate::framer;
use tracing::debug;

/// Stateless LSB embedder/extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec;

impl LsbCodec {
    /// Write `bits` into the LSBs of `samples`, starting at byte 0.
    ///
    /// Fails with [`SampleError::CapacityExceeded`] before touching any byte
    /// if there are more bits than bytes.
    pub fn embed(samples: &mut [u8], bits: &[bool]) -> Result<()> {
        if bits.len() > samples.len() {
            return Err(SampleError::CapacityExceeded {
                required: bits.len(),
                available: samples.len(),
            });
        }

        for (sample, &bit) in samples.iter_mut().zip(bits) {
            *sample = (*sample & !1) | u8::from(bit);
        }

        Ok(())
    }

    /// Read the LSB of every byte in `samples`.
    pub fn extract(samples: &[u8]) -> Vec<bool> {
        samples.iter().map(|&sample| sample & 1 == 1).collect()
    }

    /// Frame `payload` and embed it.
    ///
    /// Payloads longer than [`framer::MAX_DECODED_PAYLOAD`] are rejected
    /// like any other capacity overflow, since no decoder would accept
    /// their length prefix.
    pub fn embed_payload(samples: &mut [u8], payload: &str) -> Result<()> {
        if payload.len() > framer::MAX_DECODED_PAYLOAD {
            return Err(SampleError::CapacityExceeded {
                required: framer::frame_bit_len(payload.len()),
                available: samples
                    .len()
                    .min(framer::frame_bit_len(framer::MAX_DECODED_PAYLOAD)),
            });
        }

        let bits = framer::encode(payload.as_bytes())?;
        debug!(
            frame_bits = bits.len(),
            sample_bytes = samples.len(),
            "Embedding frame"
        );
        Self::embed(samples, &bits)
    }

    /// Extract and decode the payload hidden in `samples`.
    ///
    /// Payload bytes that are not valid UTF-8 are reported as
    /// [`SampleError::NoHiddenPayload`]: a random carrier can pass the
    /// length check by chance, and its bytes are noise.
    pub fn extract_payload(samples: &[u8]) -> Result<String> {
        let bits = Self::extract(samples);
        let bytes = framer::decode(&bits)?;

        if !framer::verify_terminator(&bits, bytes.len()) {
            debug!(payload_len = bytes.len(), "Frame terminator missing");
        }

        String::from_utf8(bytes).map_err(|e| {
            SampleError::NoHiddenPayload(format!("payload is not valid UTF-8: {}", e))
        })
    }

    /// Largest payload in bytes that fits in `sample_count` sample bytes.
    pub fn capacity(sample_count: usize) -> usize {
        framer::max_payload_for(sample_count)
    }
}
