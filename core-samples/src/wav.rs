//! RIFF/WAVE sample stream
//!
//! Reads the `fmt ` and `data` chunks of a WAVE file and writes them back as
//! a canonical three-chunk file (`RIFF`, `fmt `, `data`). Sample bytes are
//! exposed exactly as stored: little-endian, frames interleaved.
//!
//! Ancillary chunks (`LIST`, `fact`, `bext`, ...) are not carried over.

use std::fs;
use std::path::Path;

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::samples::{PcmLayout, SampleBuffer, SampleLayout, SampleStream};
use tracing::debug;

use crate::error::{Result, SampleError};

const FORMAT_PCM: u16 = 0x0001;
const FORMAT_IEEE_FLOAT: u16 = 0x0003;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const FMT_BASE_LEN: usize = 16;

/// [`SampleStream`] for uncompressed WAVE files.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavSampleStream;

impl WavSampleStream {
    pub fn new() -> Self {
        Self
    }

    /// Parse the WAVE file at `path`.
    pub fn read(&self, path: &Path) -> Result<SampleBuffer> {
        let data = fs::read(path)?;
        let buffer = parse(&data)?;
        debug!(
            path = %path.display(),
            sample_bytes = buffer.len(),
            "Read WAVE samples"
        );
        Ok(buffer)
    }

    /// Serialize `buffer` as a WAVE file at `path`.
    pub fn write(&self, path: &Path, buffer: &SampleBuffer) -> Result<()> {
        let layout = match &buffer.layout {
            SampleLayout::Pcm(layout) => layout,
            SampleLayout::Raster(_) => {
                return Err(SampleError::UnsupportedLayout(
                    "raster samples cannot be written as WAVE".to_string(),
                ))
            }
        };

        let bytes = serialize(layout, &buffer.bytes)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

impl SampleStream for WavSampleStream {
    fn read_samples(&self, path: &Path) -> BridgeResult<SampleBuffer> {
        Ok(self.read(path)?)
    }

    fn write_samples(&self, path: &Path, buffer: &SampleBuffer) -> BridgeResult<()> {
        Ok(self.write(path, buffer)?)
    }
}

fn parse(data: &[u8]) -> Result<SampleBuffer> {
    if data.len() < RIFF_HEADER_LEN || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(SampleError::MalformedCarrier(
            "not a RIFF/WAVE file".to_string(),
        ));
    }

    let mut layout = None;
    let mut samples = None;
    let mut offset = RIFF_HEADER_LEN;

    while offset + CHUNK_HEADER_LEN <= data.len() {
        let id = &data[offset..offset + 4];
        let declared = read_u32(data, offset + 4) as usize;
        let body_start = offset + CHUNK_HEADER_LEN;
        let body_end = body_start.saturating_add(declared).min(data.len());
        let body = &data[body_start..body_end];

        match id {
            b"fmt " => layout = Some(parse_format(body)?),
            b"data" => {
                if body.len() < declared {
                    debug!(
                        declared,
                        present = body.len(),
                        "data chunk shorter than declared, using present bytes"
                    );
                }
                samples = Some(body.to_vec());
            }
            _ => {}
        }

        if layout.is_some() && samples.is_some() {
            break;
        }

        // Chunks are word aligned
        offset = body_end + (declared & 1);
    }

    let layout = layout.ok_or_else(|| {
        SampleError::MalformedCarrier("WAVE file has no fmt chunk".to_string())
    })?;
    let samples = samples.ok_or_else(|| {
        SampleError::MalformedCarrier("WAVE file has no data chunk".to_string())
    })?;

    Ok(SampleBuffer::new(samples, SampleLayout::Pcm(layout)))
}

fn parse_format(body: &[u8]) -> Result<PcmLayout> {
    if body.len() < FMT_BASE_LEN {
        return Err(SampleError::MalformedCarrier(format!(
            "fmt chunk is {} bytes, expected at least {}",
            body.len(),
            FMT_BASE_LEN
        )));
    }

    let format_tag = read_u16(body, 0);
    let channels = read_u16(body, 2);
    let frame_rate = read_u32(body, 4);
    let bits_per_sample = read_u16(body, 14);

    if !matches!(
        format_tag,
        FORMAT_PCM | FORMAT_IEEE_FLOAT | FORMAT_EXTENSIBLE
    ) {
        return Err(SampleError::UnsupportedLayout(format!(
            "WAVE format tag 0x{:04X} is compressed",
            format_tag
        )));
    }

    if channels == 0 || bits_per_sample == 0 {
        return Err(SampleError::MalformedCarrier(format!(
            "invalid fmt chunk: {} channels, {} bits per sample",
            channels, bits_per_sample
        )));
    }

    let layout = PcmLayout {
        format_tag,
        channels,
        frame_rate,
        bits_per_sample,
        format_extension: body[FMT_BASE_LEN..].to_vec(),
    };

    if layout.block_align().is_none() {
        return Err(SampleError::MalformedCarrier(format!(
            "invalid fmt chunk: {} channels of {} bits overflow the block size",
            channels, bits_per_sample
        )));
    }

    Ok(layout)
}

fn serialize(layout: &PcmLayout, samples: &[u8]) -> Result<Vec<u8>> {
    let fmt_len = FMT_BASE_LEN + layout.format_extension.len();
    let pad = samples.len() & 1;
    let riff_len = 4 + CHUNK_HEADER_LEN + fmt_len + CHUNK_HEADER_LEN + samples.len() + pad;

    let riff_size = u32::try_from(riff_len).map_err(|_| {
        SampleError::UnsupportedLayout(format!(
            "{} sample bytes exceed the 4 GiB RIFF limit",
            samples.len()
        ))
    })?;

    let block_align = layout.block_align().ok_or_else(|| {
        SampleError::UnsupportedLayout(format!(
            "{} channels of {} bits overflow the WAVE block size",
            layout.channels, layout.bits_per_sample
        ))
    })?;
    let byte_rate = layout.frame_rate.saturating_mul(u32::from(block_align));

    let mut out = Vec::with_capacity(CHUNK_HEADER_LEN + riff_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&(fmt_len as u32).to_le_bytes());
    out.extend_from_slice(&layout.format_tag.to_le_bytes());
    out.extend_from_slice(&layout.channels.to_le_bytes());
    out.extend_from_slice(&layout.frame_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&layout.bits_per_sample.to_le_bytes());
    out.extend_from_slice(&layout.format_extension);

    out.extend_from_slice(b"data");
    out.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    out.extend_from_slice(samples);
    if pad == 1 {
        out.push(0);
    }

    Ok(out)
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
