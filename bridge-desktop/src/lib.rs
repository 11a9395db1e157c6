//! # Desktop Bridge Implementations
//!
//! Implementations of bridge traits for desktop platforms (macOS, Windows,
//! Linux) that delegate container work to the FFmpeg command-line tools.
//!
//! ## Overview
//!
//! - `FfmpegTranscoder` converts containers to and from PCM WAV with `ffmpeg`
//! - `FfprobeTagDictionary` reads container tags with `ffprobe` and rewrites
//!   them with a stream-copying `ffmpeg` remux
//!
//! Both locate their executables through explicit paths, usually taken from
//! `core_runtime::config::StegoConfig`. A missing executable surfaces as
//! `BridgeError::NotAvailable`; a non-zero exit as
//! `BridgeError::OperationFailed` carrying the tool's stderr.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FfmpegTranscoder, FfprobeTagDictionary};
//!
//! let transcoder = FfmpegTranscoder::new("ffmpeg");
//! let tags = FfprobeTagDictionary::new("ffprobe", "ffmpeg");
//! ```

mod process;
mod tags;
mod transcoder;

pub use tags::FfprobeTagDictionary;
pub use transcoder::FfmpegTranscoder;
