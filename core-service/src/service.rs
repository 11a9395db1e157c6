//! Embed/extract dispatcher
//!
//! [`StegoService`] classifies each carrier and routes the call to the
//! strategy for its class. Outputs are staged next to the requested path and
//! only renamed into place once the strategy has finished, so a failed embed
//! never leaves a partial or stale file behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_traits::samples::SampleStream;
use bridge_traits::tags::TagDictionary;
use bridge_traits::transcode::Transcoder;
use core_metadata::{LoftyTagDictionary, TagFamily, TagStrategy};
use core_runtime::logging::{redact_if_sensitive, strip_path};
use core_runtime::staging::{ScopedWorkspace, StagedOutput};
use core_samples::{LsbCodec, RasterSampleStream, WavSampleStream};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::archive;
use crate::classifier::{self, CapabilityClass, SampleDomain, SupportedFormats};
use crate::error::{Result, StegoError};

/// File names used inside a conversion workspace.
const PCM_CARRIER: &str = "carrier.wav";
const PCM_STEGO: &str = "stego.wav";

/// How much payload a carrier can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CarrierCapacity {
    /// At most this many payload bytes.
    Bounded(usize),
    /// Limited only by storage.
    Unbounded,
    /// Decided by the container's tag format; not known in advance.
    CollaboratorLimited,
}

/// Collaborators the dispatcher routes work to.
pub struct StegoDependencies {
    pub transcoder: Arc<dyn Transcoder>,
    pub audio_tags: Arc<dyn TagDictionary>,
    pub media_tags: Arc<dyn TagDictionary>,
    pub waveform: Arc<dyn SampleStream>,
    pub raster: Arc<dyn SampleStream>,
    /// Parent directory for conversion workspaces.
    pub workspace_root: PathBuf,
}

impl StegoDependencies {
    /// Bundle the external collaborators with the in-process ones
    /// (lofty tags, WAV and raster sample streams).
    pub fn new(transcoder: Arc<dyn Transcoder>, media_tags: Arc<dyn TagDictionary>) -> Self {
        Self {
            transcoder,
            audio_tags: Arc::new(LoftyTagDictionary::new()),
            media_tags,
            waveform: Arc::new(WavSampleStream::new()),
            raster: Arc::new(RasterSampleStream::new()),
            workspace_root: std::env::temp_dir(),
        }
    }

    pub fn with_audio_tags(mut self, audio_tags: Arc<dyn TagDictionary>) -> Self {
        self.audio_tags = audio_tags;
        self
    }

    pub fn with_waveform_stream(mut self, waveform: Arc<dyn SampleStream>) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_raster_stream(mut self, raster: Arc<dyn SampleStream>) -> Self {
        self.raster = raster;
        self
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct StegoService {
    deps: Arc<StegoDependencies>,
}

impl StegoService {
    pub fn new(deps: StegoDependencies) -> Self {
        Self {
            deps: Arc::new(deps),
        }
    }

    /// Service wired to the desktop FFmpeg collaborators.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop(config: &core_runtime::config::StegoConfig) -> Self {
        use bridge_desktop::{FfmpegTranscoder, FfprobeTagDictionary};

        let deps = StegoDependencies::new(
            Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone())),
            Arc::new(FfprobeTagDictionary::new(
                config.ffprobe_path.clone(),
                config.ffmpeg_path.clone(),
            )),
        )
        .with_workspace_root(config.workspace_root());

        Self::new(deps)
    }

    pub fn dependencies(&self) -> Arc<StegoDependencies> {
        Arc::clone(&self.deps)
    }

    /// Hide `payload` in a copy of `input` written to `output`.
    ///
    /// `input` is never modified. On success the returned path is `output`;
    /// on failure nothing exists at `output` that was not there before.
    ///
    /// An empty payload is rejected with [`StegoError::NoHiddenPayload`].
    #[instrument(
        skip(self, input, output, payload),
        fields(
            carrier = %display_name(input),
            payload = %redact_if_sensitive("payload", payload),
        )
    )]
    pub fn embed(&self, input: &Path, output: &Path, payload: &str) -> Result<PathBuf> {
        let class = classifier::classify(input);
        debug!(?class, "Classified carrier");

        if class == CapabilityClass::Unsupported {
            return Err(unsupported(input));
        }

        if payload.is_empty() {
            return Err(StegoError::NoHiddenPayload(
                "payload is empty, nothing to embed".to_string(),
            ));
        }

        check_paths(input, output, class)?;

        let staged = StagedOutput::new(output)?;
        match class {
            CapabilityClass::NativeLsb(domain) => {
                self.embed_samples(self.sample_stream(domain), input, staged.path(), payload)?
            }
            CapabilityClass::TagBased(family) => {
                self.tag_strategy(family)
                    .embed(input, staged.path(), payload)?
            }
            CapabilityClass::ConvertThenLsb => {
                self.embed_converted(input, staged.path(), payload)?
            }
            CapabilityClass::OpaqueAppend(policy) => {
                archive::embed(input, staged.path(), payload, policy)?
            }
            CapabilityClass::Unsupported => return Err(unsupported(input)),
        }

        staged.inherit_permissions(input)?;
        let written = staged.commit()?;

        info!(output = %display_name(&written), "Payload embedded");
        Ok(written)
    }

    /// Recover the payload hidden in `input`.
    #[instrument(skip(self, input), fields(carrier = %display_name(input)))]
    pub fn extract(&self, input: &Path) -> Result<String> {
        let class = classifier::classify(input);
        debug!(?class, "Classified carrier");

        let payload = match class {
            CapabilityClass::NativeLsb(domain) => {
                let buffer = self
                    .sample_stream(domain)
                    .read_samples(input)
                    .map_err(StegoError::sample_io)?;
                LsbCodec::extract_payload(&buffer.bytes)?
            }
            CapabilityClass::TagBased(family) => self.tag_strategy(family).extract(input)?,
            CapabilityClass::ConvertThenLsb => self.extract_converted(input)?,
            CapabilityClass::OpaqueAppend(_) => archive::extract(input)?,
            CapabilityClass::Unsupported => return Err(unsupported(input)),
        };

        info!(
            payload = %redact_if_sensitive("payload", &payload),
            "Payload extracted"
        );
        Ok(payload)
    }

    /// Largest payload `input` can carry.
    #[instrument(skip(self, input), fields(carrier = %display_name(input)))]
    pub fn capacity(&self, input: &Path) -> Result<CarrierCapacity> {
        let capacity = match classifier::classify(input) {
            CapabilityClass::NativeLsb(domain) => {
                let buffer = self
                    .sample_stream(domain)
                    .read_samples(input)
                    .map_err(StegoError::sample_io)?;
                CarrierCapacity::Bounded(LsbCodec::capacity(buffer.len()))
            }
            CapabilityClass::ConvertThenLsb => {
                let workspace = ScopedWorkspace::new_in(&self.deps.workspace_root)?;
                let pcm = workspace.file(PCM_CARRIER);
                self.deps
                    .transcoder
                    .decode_to_pcm(input, &pcm)
                    .map_err(StegoError::transcode)?;
                let buffer = self
                    .deps
                    .waveform
                    .read_samples(&pcm)
                    .map_err(StegoError::sample_io)?;
                CarrierCapacity::Bounded(LsbCodec::capacity(buffer.len()))
            }
            CapabilityClass::TagBased(_) => CarrierCapacity::CollaboratorLimited,
            CapabilityClass::OpaqueAppend(policy) => match archive::payload_limit(policy) {
                Some(limit) => CarrierCapacity::Bounded(limit),
                None => CarrierCapacity::Unbounded,
            },
            CapabilityClass::Unsupported => return Err(unsupported(input)),
        };

        debug!(?capacity, "Computed carrier capacity");
        Ok(capacity)
    }

    pub fn supported_formats(&self) -> SupportedFormats {
        classifier::supported_formats()
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        classifier::classify(path) != CapabilityClass::Unsupported
    }

    fn sample_stream(&self, domain: SampleDomain) -> &dyn SampleStream {
        match domain {
            SampleDomain::Waveform => self.deps.waveform.as_ref(),
            SampleDomain::Raster => self.deps.raster.as_ref(),
        }
    }

    fn tag_strategy(&self, family: TagFamily) -> TagStrategy {
        let dictionary = match family {
            TagFamily::AudioContainer => Arc::clone(&self.deps.audio_tags),
            TagFamily::MediaContainer => Arc::clone(&self.deps.media_tags),
        };
        TagStrategy::new(dictionary, family)
    }

    fn embed_samples(
        &self,
        stream: &dyn SampleStream,
        input: &Path,
        output: &Path,
        payload: &str,
    ) -> Result<()> {
        let mut buffer = stream.read_samples(input).map_err(StegoError::sample_io)?;
        LsbCodec::embed_payload(&mut buffer.bytes, payload)?;
        stream
            .write_samples(output, &buffer)
            .map_err(StegoError::sample_io)
    }

    fn embed_converted(&self, input: &Path, output: &Path, payload: &str) -> Result<()> {
        let workspace = ScopedWorkspace::new_in(&self.deps.workspace_root)?;
        let carrier = workspace.file(PCM_CARRIER);
        let stego = workspace.file(PCM_STEGO);

        self.deps
            .transcoder
            .decode_to_pcm(input, &carrier)
            .map_err(StegoError::transcode)?;
        self.embed_samples(self.deps.waveform.as_ref(), &carrier, &stego, payload)?;
        self.deps
            .transcoder
            .encode_from_pcm(&stego, output)
            .map_err(StegoError::transcode)?;

        Ok(())
    }

    fn extract_converted(&self, input: &Path) -> Result<String> {
        let workspace = ScopedWorkspace::new_in(&self.deps.workspace_root)?;
        let carrier = workspace.file(PCM_CARRIER);

        self.deps
            .transcoder
            .decode_to_pcm(input, &carrier)
            .map_err(StegoError::transcode)?;
        let buffer = self
            .deps
            .waveform
            .read_samples(&carrier)
            .map_err(StegoError::sample_io)?;

        Ok(LsbCodec::extract_payload(&buffer.bytes)?)
    }
}

/// Reject output paths that would overwrite the input or silently change
/// an LSB carrier into a format that cannot hold it.
fn check_paths(input: &Path, output: &Path, class: CapabilityClass) -> Result<()> {
    if !fs::metadata(input)?.is_file() {
        return Err(StegoError::IOFailure(format!(
            "{} is not a regular file",
            display_name(input)
        )));
    }

    if same_file(input, output) {
        return Err(StegoError::IOFailure(
            "output path must differ from the input carrier".to_string(),
        ));
    }

    let lsb_class = matches!(
        class,
        CapabilityClass::NativeLsb(_) | CapabilityClass::ConvertThenLsb
    );
    if lsb_class && classifier::classify(output) != class {
        warn!(output = %display_name(output), "Output format cannot carry LSB payload");
        return Err(StegoError::UnsupportedFormat(format!(
            "output {} must use a lossless format of the same kind as the input",
            display_name(output)
        )));
    }

    Ok(())
}

fn unsupported(input: &Path) -> StegoError {
    StegoError::UnsupportedFormat(classifier::describe_unsupported(input))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn display_name(path: &Path) -> String {
    strip_path(&path.to_string_lossy()).to_string()
}
