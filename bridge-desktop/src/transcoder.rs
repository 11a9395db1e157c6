use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bridge_traits::error::Result;
use bridge_traits::transcode::Transcoder;
use tracing::{debug, instrument};

use crate::process::run_tool;

/// [`Transcoder`] backed by the `ffmpeg` executable.
///
/// Decoding always produces 16-bit little-endian PCM; encoding lets ffmpeg
/// pick the codec from the target's extension.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }
}

impl Transcoder for FfmpegTranscoder {
    #[instrument(skip(self))]
    fn decode_to_pcm(&self, source: &Path, pcm_target: &Path) -> Result<()> {
        run_tool(&self.ffmpeg, &decode_args(source, pcm_target), "decode to PCM")?;
        debug!("Decoded carrier to PCM WAV");
        Ok(())
    }

    #[instrument(skip(self))]
    fn encode_from_pcm(&self, pcm_source: &Path, target: &Path) -> Result<()> {
        run_tool(&self.ffmpeg, &encode_args(pcm_source, target), "encode from PCM")?;
        debug!("Encoded PCM WAV to target container");
        Ok(())
    }
}

fn decode_args(source: &Path, pcm_target: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-v", "error", "-i"].map(OsString::from).into();
    args.push(source.into());
    args.extend(["-vn", "-c:a", "pcm_s16le"].map(OsString::from));
    args.push(pcm_target.into());
    args
}

fn encode_args(pcm_source: &Path, target: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-v", "error", "-i"].map(OsString::from).into();
    args.push(pcm_source.into());
    args.push(target.into());
    args
}
