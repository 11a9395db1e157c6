//! # Host Bridge Traits
//!
//! Collaborator contracts the embedding engine depends on but does not
//! implement itself.
//!
//! ## Overview
//!
//! This crate defines the seam between the engine and the tools that touch
//! container formats. Each trait is one capability the engine needs; the
//! concrete implementations live elsewhere:
//!
//! | Trait | Purpose | Implementations |
//! |-------|---------|-----------------|
//! | [`Transcoder`](transcode::Transcoder) | Convert containers to and from PCM WAV | `bridge-desktop::FfmpegTranscoder` |
//! | [`TagDictionary`](tags::TagDictionary) | Read/write named tag entries | `core-metadata::LoftyTagDictionary`, `bridge-desktop::FfprobeTagDictionary` |
//! | [`SampleStream`](samples::SampleStream) | Expose a carrier's sample bytes | `core-samples::WavSampleStream`, `core-samples::RasterSampleStream` |
//! | [`LoggerSink`](log::LoggerSink) | Mirror structured logs to the host | `ConsoleLogger` |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert tool-specific errors into it with a message that names the
//! file and the failing step. Callers decide which engine-level error kind a
//! bridge failure maps to.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` so a single set of collaborators can be
//! shared by concurrent embed/extract calls on distinct carriers.
//!
//! ## Examples
//!
//! ### Implementing Transcoder
//!
//! ```ignore
//! use bridge_traits::error::Result;
//! use bridge_traits::transcode::Transcoder;
//! use std::path::Path;
//!
//! struct SoxTranscoder;
//!
//! impl Transcoder for SoxTranscoder {
//!     fn decode_to_pcm(&self, source: &Path, pcm_target: &Path) -> Result<()> {
//!         todo!()
//!     }
//!
//!     fn encode_from_pcm(&self, pcm_source: &Path, target: &Path) -> Result<()> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod log;
pub mod samples;
pub mod tags;
pub mod transcode;

pub use error::BridgeError;

// Re-export commonly used types
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use samples::{PcmLayout, RasterLayout, SampleBuffer, SampleLayout, SampleStream};
pub use tags::{TagDictionary, TagSession};
pub use transcode::Transcoder;
