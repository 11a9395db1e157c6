//! Sample Stream Abstraction
//!
//! Exposes the ordered sample bytes of an uncompressed carrier together with
//! the parameters needed to serialize them back unchanged.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Parameters of a PCM waveform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmLayout {
    /// WAVE format tag (1 = PCM, 3 = IEEE float, 0xFFFE = extensible)
    pub format_tag: u16,
    /// Number of interleaved channels
    pub channels: u16,
    /// Frames per second
    pub frame_rate: u32,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Bytes of the format chunk past the 16-byte base, kept verbatim
    pub format_extension: Vec<u8>,
}

impl PcmLayout {
    /// Bytes per sample, rounded up
    pub fn sample_width(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    /// Bytes per interleaved frame, or `None` if it does not fit the
    /// 16-bit header field
    pub fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.sample_width())
    }
}

/// Parameters of a decoded raster image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterLayout {
    pub width: u32,
    pub height: u32,
    /// Channels per pixel (1 = luma, 2 = luma+alpha, 3 = RGB, 4 = RGBA)
    pub channels: u8,
    /// Bits per channel (8, 16 or 32)
    pub bits_per_channel: u8,
}

/// Serialization parameters of a sample buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleLayout {
    Pcm(PcmLayout),
    Raster(RasterLayout),
}

/// Sample bytes of a carrier, in the order they are serialized to file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    pub bytes: Vec<u8>,
    pub layout: SampleLayout,
}

impl SampleBuffer {
    pub fn new(bytes: Vec<u8>, layout: SampleLayout) -> Self {
        Self { bytes, layout }
    }

    /// Number of addressable sample bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Sample-stream reader/writer
///
/// `write_samples` must serialize `buffer.bytes` in exactly the order
/// `read_samples` produced them; any reordering (channel interleaving,
/// plane splitting) would scramble data hidden in those bytes.
pub trait SampleStream: Send + Sync {
    /// Read the sample bytes and layout of the carrier at `path`.
    fn read_samples(&self, path: &Path) -> Result<SampleBuffer>;

    /// Write `buffer` to `path` using its layout.
    fn write_samples(&self, path: &Path, buffer: &SampleBuffer) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_layout_widths() {
        let layout = PcmLayout {
            format_tag: 1,
            channels: 2,
            frame_rate: 44_100,
            bits_per_sample: 24,
            format_extension: Vec::new(),
        };

        assert_eq!(layout.sample_width(), 3);
        assert_eq!(layout.block_align(), Some(6));
    }

    #[test]
    fn test_block_align_overflow() {
        let layout = PcmLayout {
            format_tag: 1,
            channels: 0x8000,
            frame_rate: 8_000,
            bits_per_sample: 16,
            format_extension: Vec::new(),
        };

        assert_eq!(layout.block_align(), None);
    }

    #[test]
    fn test_sample_buffer_len() {
        let buffer = SampleBuffer::new(
            vec![0u8; 12],
            SampleLayout::Raster(RasterLayout {
                width: 2,
                height: 2,
                channels: 3,
                bits_per_channel: 8,
            }),
        );

        assert_eq!(buffer.len(), 12);
        assert!(!buffer.is_empty());
    }
}
