//! Container Transcoding Abstraction
//!
//! Converts carriers that the engine cannot address sample-by-sample into an
//! uncompressed PCM WAV intermediate and back again.

use std::path::Path;

use crate::error::Result;

/// Transcode collaborator
///
/// Implementations must treat the conversion as format-preserving for the
/// audible content: decoding a carrier produced by `encode_from_pcm` has to
/// yield the same PCM sample bytes that were encoded. Only lossless target
/// containers satisfy that contract.
///
/// Both operations are blocking and may take a long time for large files.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::transcode::Transcoder;
///
/// fn roundtrip(t: &dyn Transcoder) -> bridge_traits::error::Result<()> {
///     t.decode_to_pcm(Path::new("in.wv"), Path::new("/tmp/in.wav"))?;
///     t.encode_from_pcm(Path::new("/tmp/in.wav"), Path::new("out.wv"))
/// }
/// ```
pub trait Transcoder: Send + Sync {
    /// Decode `source` into a PCM WAV file written at `pcm_target`.
    fn decode_to_pcm(&self, source: &Path, pcm_target: &Path) -> Result<()>;

    /// Encode the PCM WAV at `pcm_source` into the container implied by
    /// `target`'s extension.
    fn encode_from_pcm(&self, pcm_source: &Path, target: &Path) -> Result<()>;
}
