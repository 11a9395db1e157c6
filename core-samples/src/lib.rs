//! # Sample-Domain Embedding
//!
//! Bit-level payload framing and least-significant-bit embedding for
//! carriers whose content is an array of uncompressed samples.
//!
//! ## Components
//!
//! - [`framer`] - length-prefixed, terminated bit frames
//! - [`LsbCodec`] - writes/reads frame bits in sample LSBs
//! - [`WavSampleStream`] - RIFF/WAVE sample bytes
//! - [`RasterSampleStream`] - PNG/BMP channel bytes
//!
//! ## Usage
//!
//! ```ignore
//! use core_samples::{LsbCodec, WavSampleStream};
//!
//! let stream = WavSampleStream::new();
//! let mut buffer = stream.read(input)?;
//! LsbCodec::embed_payload(&mut buffer.bytes, "meet at noon")?;
//! stream.write(output, &buffer)?;
//! ```

pub mod codec;
pub mod error;
pub mod framer;
pub mod raster;
pub mod wav;

pub use codec::LsbCodec;
pub use error::{Result, SampleError};
pub use framer::FramingError;
pub use raster::RasterSampleStream;
pub use wav::WavSampleStream;
