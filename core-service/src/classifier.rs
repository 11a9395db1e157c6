//! Format classification
//!
//! Maps a carrier path to the [`CapabilityClass`] that decides how a payload
//! is hidden in it. Classification looks only at the lowercase file
//! extension, never at file contents, so it is pure and cannot fail.

use std::path::Path;

use core_metadata::TagFamily;
use serde::Serialize;

/// Trailer bytes a ZIP reader will scan past when locating the
/// end-of-central-directory record.
pub const ZIP_TRAILER_LIMIT: usize = 65_535;

/// What an LSB carrier's samples are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SampleDomain {
    /// PCM audio in a RIFF/WAVE container.
    Waveform,
    /// Pixel channels of a losslessly stored image.
    Raster,
}

/// Limits on data appended after an archive's own content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AppendPolicy {
    /// Maximum appended bytes (marker included); `None` if unbounded.
    pub max_trailer: Option<usize>,
}

impl AppendPolicy {
    pub const UNBOUNDED: AppendPolicy = AppendPolicy { max_trailer: None };
    pub const ZIP: AppendPolicy = AppendPolicy {
        max_trailer: Some(ZIP_TRAILER_LIMIT),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityClass {
    /// Payload bits go straight into sample LSBs.
    NativeLsb(SampleDomain),
    /// Payload is stored in a container tag entry.
    TagBased(TagFamily),
    /// Carrier is decoded to PCM WAV, embedded, and re-encoded.
    ConvertThenLsb,
    /// Payload is appended after the archive's bytes behind a marker.
    OpaqueAppend(AppendPolicy),
    Unsupported,
}

const CLASS_TABLE: &[(&str, CapabilityClass)] = &[
    ("wav", CapabilityClass::NativeLsb(SampleDomain::Waveform)),
    ("png", CapabilityClass::NativeLsb(SampleDomain::Raster)),
    ("bmp", CapabilityClass::NativeLsb(SampleDomain::Raster)),
    ("flac", CapabilityClass::TagBased(TagFamily::AudioContainer)),
    ("m4a", CapabilityClass::TagBased(TagFamily::AudioContainer)),
    ("mp4", CapabilityClass::TagBased(TagFamily::AudioContainer)),
    ("ogg", CapabilityClass::TagBased(TagFamily::AudioContainer)),
    ("aac", CapabilityClass::TagBased(TagFamily::AudioContainer)),
    ("mkv", CapabilityClass::TagBased(TagFamily::MediaContainer)),
    ("mov", CapabilityClass::TagBased(TagFamily::MediaContainer)),
    ("avi", CapabilityClass::TagBased(TagFamily::MediaContainer)),
    ("webm", CapabilityClass::TagBased(TagFamily::MediaContainer)),
    ("flv", CapabilityClass::TagBased(TagFamily::MediaContainer)),
    ("wmv", CapabilityClass::TagBased(TagFamily::MediaContainer)),
    ("aiff", CapabilityClass::ConvertThenLsb),
    ("aif", CapabilityClass::ConvertThenLsb),
    ("au", CapabilityClass::ConvertThenLsb),
    ("tta", CapabilityClass::ConvertThenLsb),
    ("wv", CapabilityClass::ConvertThenLsb),
    ("zip", CapabilityClass::OpaqueAppend(AppendPolicy::ZIP)),
    ("rar", CapabilityClass::OpaqueAppend(AppendPolicy::UNBOUNDED)),
    ("7z", CapabilityClass::OpaqueAppend(AppendPolicy::UNBOUNDED)),
    ("tar", CapabilityClass::OpaqueAppend(AppendPolicy::UNBOUNDED)),
    ("iso", CapabilityClass::OpaqueAppend(AppendPolicy::UNBOUNDED)),
];

/// Extensions that are deliberately rejected, with the reason.
const REMOVED_FORMATS: &[(&str, &str)] = &[
    ("mp3", "MP3 ID3 comment metadata compatibility issues"),
    ("opus", "lossy codec; re-encoding destroys sample LSBs"),
    ("amr", "lossy codec; re-encoding destroys sample LSBs"),
    ("ac3", "lossy codec; re-encoding destroys sample LSBs"),
    ("dts", "lossy codec; re-encoding destroys sample LSBs"),
    ("ape", "no encoder available to write Monkey's Audio back"),
    ("raw", "headerless audio; sample layout is unknown"),
    ("jpg", "lossy compression destroys pixel LSBs"),
    ("jpeg", "lossy compression destroys pixel LSBs"),
    ("gz", "decompressors report trailing data as an error"),
    ("bz2", "decompressors report trailing data as an error"),
    ("dmg", "disk image trailer must stay at the end of the file"),
];

/// Lowercase extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Capability class of the carrier at `path`.
pub fn classify(path: &Path) -> CapabilityClass {
    extension_of(path)
        .and_then(|ext| {
            CLASS_TABLE
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, class)| *class)
        })
        .unwrap_or(CapabilityClass::Unsupported)
}

/// Why `extension` is rejected, for extensions rejected on purpose.
pub fn unsupported_reason(extension: &str) -> Option<&'static str> {
    let extension = extension.trim_start_matches('.').to_lowercase();
    REMOVED_FORMATS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, reason)| *reason)
}

/// Diagnostic for an unsupported carrier.
pub(crate) fn describe_unsupported(path: &Path) -> String {
    match extension_of(path) {
        Some(ext) => match unsupported_reason(&ext) {
            Some(reason) => format!(".{} is not supported: {}", ext, reason),
            None => format!(".{} is not a supported carrier format", ext),
        },
        None => format!("{} has no file extension", path.display()),
    }
}

/// Supported extensions per class, plus rejected extensions and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedFormats {
    pub native_lsb: Vec<&'static str>,
    pub tag_based: Vec<&'static str>,
    pub convert_then_lsb: Vec<&'static str>,
    pub opaque_append: Vec<&'static str>,
    pub removed: Vec<RemovedFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedFormat {
    pub extension: &'static str,
    pub reason: &'static str,
}

impl SupportedFormats {
    /// Every extension with a strategy, in table order.
    pub fn all(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.native_lsb
            .iter()
            .chain(&self.tag_based)
            .chain(&self.convert_then_lsb)
            .chain(&self.opaque_append)
            .copied()
    }
}

fn extensions_where(pred: fn(&CapabilityClass) -> bool) -> Vec<&'static str> {
    CLASS_TABLE
        .iter()
        .filter(|(_, class)| pred(class))
        .map(|(ext, _)| *ext)
        .collect()
}

pub fn supported_formats() -> SupportedFormats {
    SupportedFormats {
        native_lsb: extensions_where(|c| matches!(c, CapabilityClass::NativeLsb(_))),
        tag_based: extensions_where(|c| matches!(c, CapabilityClass::TagBased(_))),
        convert_then_lsb: extensions_where(|c| matches!(c, CapabilityClass::ConvertThenLsb)),
        opaque_append: extensions_where(|c| matches!(c, CapabilityClass::OpaqueAppend(_))),
        removed: REMOVED_FORMATS
            .iter()
            .map(|&(extension, reason)| RemovedFormat { extension, reason })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(
            classify(Path::new("a/b/song.wav")),
            CapabilityClass::NativeLsb(SampleDomain::Waveform)
        );
        assert_eq!(
            classify(Path::new("photo.bmp")),
            CapabilityClass::NativeLsb(SampleDomain::Raster)
        );
        assert_eq!(
            classify(Path::new("track.flac")),
            CapabilityClass::TagBased(TagFamily::AudioContainer)
        );
        assert_eq!(
            classify(Path::new("clip.webm")),
            CapabilityClass::TagBased(TagFamily::MediaContainer)
        );
        assert_eq!(classify(Path::new("take.wv")), CapabilityClass::ConvertThenLsb);
        assert_eq!(
            classify(Path::new("bundle.zip")),
            CapabilityClass::OpaqueAppend(AppendPolicy::ZIP)
        );
        assert_eq!(
            classify(Path::new("disc.iso")),
            CapabilityClass::OpaqueAppend(AppendPolicy::UNBOUNDED)
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify(Path::new("LOUD.WAV")), classify(Path::new("loud.wav")));
        assert_eq!(classify(Path::new("Movie.MkV")), classify(Path::new("movie.mkv")));
    }

    #[test]
    fn test_classify_ignores_contents() {
        // Nothing exists at these paths; the answer comes from the name alone
        assert_eq!(
            classify(Path::new("/no/such/dir/missing.png")),
            CapabilityClass::NativeLsb(SampleDomain::Raster)
        );
    }

    #[test]
    fn test_rejected_formats_are_unsupported() {
        for ext in ["mp3", "opus", "amr", "ac3", "dts", "ape", "raw", "jpg", "jpeg", "gz", "bz2", "dmg"] {
            let path = format!("carrier.{}", ext);
            assert_eq!(classify(Path::new(&path)), CapabilityClass::Unsupported, "{}", ext);
            assert!(unsupported_reason(ext).is_some(), "{}", ext);
        }
    }

    #[test]
    fn test_unknown_and_missing_extensions() {
        assert_eq!(classify(Path::new("notes.txt")), CapabilityClass::Unsupported);
        assert_eq!(classify(Path::new("README")), CapabilityClass::Unsupported);
        assert_eq!(unsupported_reason("txt"), None);
    }

    #[test]
    fn test_unsupported_reason_for_mp3() {
        assert_eq!(
            unsupported_reason(".MP3"),
            Some("MP3 ID3 comment metadata compatibility issues")
        );
        assert!(describe_unsupported(Path::new("x.mp3")).contains("ID3"));
        assert!(describe_unsupported(Path::new("x")).contains("no file extension"));
    }

    #[test]
    fn test_supported_formats_lists() {
        let formats = supported_formats();

        assert_eq!(formats.native_lsb, vec!["wav", "png", "bmp"]);
        assert_eq!(formats.convert_then_lsb, vec!["aiff", "aif", "au", "tta", "wv"]);
        assert_eq!(formats.opaque_append, vec!["zip", "rar", "7z", "tar", "iso"]);
        assert_eq!(formats.tag_based.len(), 11);
        assert_eq!(formats.all().count(), CLASS_TABLE.len());
        assert!(formats.removed.iter().any(|r| r.extension == "dmg"));
    }
}
