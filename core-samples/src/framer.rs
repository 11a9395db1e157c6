//! Bitstream framing
//!
//! Turns payload bytes into a self-delimiting bit sequence and back:
//!
//! ```text
//! [32 bits] payload length n (u32, most significant bit first)
//! [8n bits] payload bytes, each most significant bit first
//! [16 bits] terminator 0b1111_1111_1111_1110
//! ```
//!
//! The length prefix makes decoding proportional to the payload rather than
//! to the carrier. The terminator is redundant with it; decoding never
//! requires it, but [`verify_terminator`] can use it as a cross-check.

use thiserror::Error;

/// Width of the length prefix in bits.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Terminator pattern appended after the payload bits.
pub const TERMINATOR: u16 = 0b1111_1111_1111_1110;

/// Width of the terminator in bits.
pub const TERMINATOR_BITS: usize = 16;

/// Bits a frame adds on top of the payload itself.
pub const FRAME_OVERHEAD_BITS: usize = LENGTH_PREFIX_BITS + TERMINATOR_BITS;

/// Largest length prefix the decoder accepts.
///
/// A carrier that was never embedded decodes to an arbitrary prefix; this
/// ceiling stops such a value from becoming a huge allocation.
pub const MAX_DECODED_PAYLOAD: usize = 100_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("payload of {0} bytes does not fit the 32-bit length prefix")]
    PayloadTooLarge(usize),

    #[error("no valid payload: {0}")]
    NoValidPayload(String),

    #[error("payload truncated: expected {expected} bits, {available} available")]
    TruncatedPayload { expected: usize, available: usize },
}

/// Total frame length in bits for a payload of `payload_len` bytes.
pub fn frame_bit_len(payload_len: usize) -> usize {
    payload_len
        .saturating_mul(8)
        .saturating_add(FRAME_OVERHEAD_BITS)
}

/// Largest payload, in bytes, whose frame fits in `bit_capacity` bits and
/// that the decoder will accept back.
pub fn max_payload_for(bit_capacity: usize) -> usize {
    (bit_capacity.saturating_sub(FRAME_OVERHEAD_BITS) / 8).min(MAX_DECODED_PAYLOAD)
}

/// Frame `payload` as a bit sequence.
pub fn encode(payload: &[u8]) -> Result<Vec<bool>, FramingError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| FramingError::PayloadTooLarge(payload.len()))?;

    let mut bits = Vec::with_capacity(frame_bit_len(payload.len()));
    push_bits(&mut bits, len, LENGTH_PREFIX_BITS);
    for &byte in payload {
        push_bits(&mut bits, u32::from(byte), 8);
    }
    push_bits(&mut bits, u32::from(TERMINATOR), TERMINATOR_BITS);

    Ok(bits)
}

/// Recover the payload bytes from the start of `bits`.
///
/// Reads at most `32 + 8n` bits; anything after that is ignored.
pub fn decode(bits: &[bool]) -> Result<Vec<u8>, FramingError> {
    if bits.len() < LENGTH_PREFIX_BITS {
        return Err(FramingError::NoValidPayload(format!(
            "carrier holds {} bits, fewer than the {}-bit length prefix",
            bits.len(),
            LENGTH_PREFIX_BITS
        )));
    }

    let declared = read_bits(&bits[..LENGTH_PREFIX_BITS]) as usize;
    if declared == 0 || declared > MAX_DECODED_PAYLOAD {
        return Err(FramingError::NoValidPayload(format!(
            "length prefix {} outside 1..={}",
            declared, MAX_DECODED_PAYLOAD
        )));
    }

    let expected = declared * 8;
    let available = bits.len() - LENGTH_PREFIX_BITS;
    if available < expected {
        return Err(FramingError::TruncatedPayload {
            expected,
            available,
        });
    }

    let payload = bits[LENGTH_PREFIX_BITS..LENGTH_PREFIX_BITS + expected]
        .chunks_exact(8)
        .map(|chunk| read_bits(chunk) as u8)
        .collect();

    Ok(payload)
}

/// Check that the terminator follows a payload of `payload_len` bytes.
pub fn verify_terminator(bits: &[bool], payload_len: usize) -> bool {
    let start = LENGTH_PREFIX_BITS + payload_len * 8;
    bits.get(start..start + TERMINATOR_BITS)
        .map(|window| read_bits(window) == u32::from(TERMINATOR))
        .unwrap_or(false)
}

fn push_bits(bits: &mut Vec<bool>, value: u32, width: usize) {
    for shift in (0..width).rev() {
        bits.push((value >> shift) & 1 == 1);
    }
}

fn read_bits(bits: &[bool]) -> u32 {
    bits.iter()
        .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_frame_is_88_bits() {
        let bits = encode(b"hello").unwrap();
        assert_eq!(bits.len(), 32 + 40 + 16);
        assert_eq!(bits.len(), frame_bit_len(5));
    }

    #[test]
    fn test_length_prefix_is_big_endian() {
        let bits = encode(b"hello").unwrap();

        // 5 = ...0101 in the lowest bits of the prefix
        assert!(bits[..29].iter().all(|&b| !b));
        assert_eq!(&bits[29..32], &[true, false, true]);

        // 'h' = 0x68 = 0110_1000
        assert_eq!(
            &bits[32..40],
            &[false, true, true, false, true, false, false, false]
        );
    }

    #[test]
    fn test_terminator_pattern() {
        let bits = encode(b"hi").unwrap();
        let tail = &bits[bits.len() - TERMINATOR_BITS..];

        assert!(tail[..15].iter().all(|&b| b));
        assert!(!tail[15]);
        assert!(verify_terminator(&bits, 2));
        assert!(!verify_terminator(&bits, 1));
    }

    #[test]
    fn test_decode_recovers_multibyte_utf8() {
        let text = "naïve façade — 秘密";
        let bits = encode(text.as_bytes()).unwrap();
        let decoded = decode(&bits).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), text);
    }

    #[test]
    fn test_decode_ignores_trailing_bits() {
        let mut bits = encode(b"abc").unwrap();
        bits.truncate(bits.len() - TERMINATOR_BITS);
        bits.extend(std::iter::repeat(true).take(500));

        assert_eq!(decode(&bits).unwrap(), b"abc");
    }

    #[test]
    fn test_decode_zero_length_rejected() {
        let bits = vec![false; 1000];
        assert!(matches!(decode(&bits), Err(FramingError::NoValidPayload(_))));
    }

    #[test]
    fn test_decode_above_ceiling_rejected() {
        // All-ones prefix decodes to u32::MAX
        let bits = vec![true; 4096];
        assert!(matches!(decode(&bits), Err(FramingError::NoValidPayload(_))));

        let mut bits = Vec::new();
        push_bits(&mut bits, (MAX_DECODED_PAYLOAD + 1) as u32, LENGTH_PREFIX_BITS);
        bits.extend(vec![false; (MAX_DECODED_PAYLOAD + 1) * 8]);
        assert!(matches!(decode(&bits), Err(FramingError::NoValidPayload(_))));
    }

    #[test]
    fn test_decode_short_carrier() {
        let bits = vec![true; 31];
        assert!(matches!(decode(&bits), Err(FramingError::NoValidPayload(_))));
    }

    #[test]
    fn test_decode_truncated() {
        let bits = encode(b"truncate me").unwrap();
        let cut = &bits[..LENGTH_PREFIX_BITS + 20];

        assert_eq!(
            decode(cut),
            Err(FramingError::TruncatedPayload {
                expected: 88,
                available: 20
            })
        );
    }

    #[test]
    fn test_max_payload_for() {
        assert_eq!(max_payload_for(0), 0);
        assert_eq!(max_payload_for(47), 0);
        assert_eq!(max_payload_for(56), 1);
        assert_eq!(max_payload_for(10_000), (10_000 - 48) / 8);
        assert_eq!(max_payload_for(usize::MAX), MAX_DECODED_PAYLOAD);
    }
}
