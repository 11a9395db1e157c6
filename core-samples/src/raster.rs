//! Raster sample stream
//!
//! Decodes losslessly stored images (PNG, BMP) to their channel bytes in
//! row-major, channel-interleaved order and encodes them back with the same
//! dimensions and color type. The output format follows the extension of
//! the path written to.

use std::path::Path;

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::samples::{RasterLayout, SampleBuffer, SampleLayout, SampleStream};
use image::{ColorType, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{Result, SampleError};

/// [`SampleStream`] for PNG and BMP images.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterSampleStream;

impl RasterSampleStream {
    pub fn new() -> Self {
        Self
    }

    /// Decode the image at `path`.
    pub fn read(&self, path: &Path) -> Result<SampleBuffer> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let color = image.color();

        let bits_per_channel = color.bits_per_pixel() / u16::from(color.channel_count());
        if color_type_for(color.channel_count(), bits_per_channel as u8).is_none() {
            return Err(SampleError::UnsupportedLayout(format!(
                "{:?} images are not supported",
                color
            )));
        }

        let layout = RasterLayout {
            width: image.width(),
            height: image.height(),
            channels: color.channel_count(),
            bits_per_channel: bits_per_channel as u8,
        };

        debug!(
            path = %path.display(),
            width = layout.width,
            height = layout.height,
            color = ?color,
            "Decoded raster samples"
        );

        Ok(SampleBuffer::new(image.into_bytes(), SampleLayout::Raster(layout)))
    }

    /// Encode `buffer` to `path`, choosing the format from its extension.
    pub fn write(&self, path: &Path, buffer: &SampleBuffer) -> Result<()> {
        let layout = match &buffer.layout {
            SampleLayout::Raster(layout) => layout,
            SampleLayout::Pcm(_) => {
                return Err(SampleError::UnsupportedLayout(
                    "PCM samples cannot be written as an image".to_string(),
                ))
            }
        };

        let color = color_type_for(layout.channels, layout.bits_per_channel).ok_or_else(|| {
            SampleError::UnsupportedLayout(format!(
                "{} channels at {} bits",
                layout.channels, layout.bits_per_channel
            ))
        })?;

        let format = ImageFormat::from_path(path)?;
        image::save_buffer_with_format(
            path,
            &buffer.bytes,
            layout.width,
            layout.height,
            color,
            format,
        )?;

        Ok(())
    }
}

impl SampleStream for RasterSampleStream {
    fn read_samples(&self, path: &Path) -> BridgeResult<SampleBuffer> {
        Ok(self.read(path)?)
    }

    fn write_samples(&self, path: &Path, buffer: &SampleBuffer) -> BridgeResult<()> {
        Ok(self.write(path, buffer)?)
    }
}

/// Integer color types only; float channels would not survive a PNG or BMP
/// re-encode bit for bit.
fn color_type_for(channels: u8, bits_per_channel: u8) -> Option<ColorType> {
    match (channels, bits_per_channel) {
        (1, 8) => Some(ColorType::L8),
        (2, 8) => Some(ColorType::La8),
        (3, 8) => Some(ColorType::Rgb8),
        (4, 8) => Some(ColorType::Rgba8),
        (1, 16) => Some(ColorType::L16),
        (2, 16) => Some(ColorType::La16),
        (3, 16) => Some(ColorType::Rgb16),
        (4, 16) => Some(ColorType::Rgba16),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8])
        })
    }

    #[test]
    fn test_read_png_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        gradient(16, 8).save(&path).unwrap();

        let buffer = RasterSampleStream::new().read(&path).unwrap();

        assert_eq!(buffer.len(), 16 * 8 * 3);
        assert_eq!(
            buffer.layout,
            SampleLayout::Raster(RasterLayout {
                width: 16,
                height: 8,
                channels: 3,
                bits_per_channel: 8,
            })
        );
        // row-major, channel-interleaved
        assert_eq!(&buffer.bytes[3..6], &[7, 0, 3]);
    }

    #[test]
    fn test_png_write_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        let copy = dir.path().join("copy.png");
        gradient(20, 20).save(&source).unwrap();

        let stream = RasterSampleStream::new();
        let mut buffer = stream.read(&source).unwrap();
        for byte in buffer.bytes.iter_mut().take(50) {
            *byte ^= 1;
        }
        stream.write(&copy, &buffer).unwrap();

        assert_eq!(stream.read(&copy).unwrap(), buffer);
    }

    #[test]
    fn test_bmp_write_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.bmp");
        let copy = dir.path().join("copy.bmp");
        gradient(10, 6).save(&source).unwrap();

        let stream = RasterSampleStream::new();
        let buffer = stream.read(&source).unwrap();
        stream.write(&copy, &buffer).unwrap();

        assert_eq!(stream.read(&copy).unwrap().bytes, buffer.bytes);
    }

    #[test]
    fn test_write_rejects_pcm_layout() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = SampleBuffer::new(
            vec![0; 4],
            SampleLayout::Pcm(bridge_traits::samples::PcmLayout {
                format_tag: 1,
                channels: 1,
                frame_rate: 8_000,
                bits_per_sample: 8,
                format_extension: Vec::new(),
            }),
        );

        let result = RasterSampleStream::new().write(&dir.path().join("x.png"), &buffer);
        assert!(matches!(result, Err(SampleError::UnsupportedLayout(_))));
    }

    #[test]
    fn test_read_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(RasterSampleStream::new().read(&path).is_err());
    }

    #[test]
    fn test_color_type_table() {
        assert_eq!(color_type_for(4, 16), Some(ColorType::Rgba16));
        assert_eq!(color_type_for(3, 32), None);
        assert_eq!(color_type_for(5, 8), None);
    }
}
