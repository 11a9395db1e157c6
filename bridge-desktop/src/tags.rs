use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::tags::{TagDictionary, TagSession};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::process::run_tool;

/// [`TagDictionary`] for media containers, backed by `ffprobe`/`ffmpeg`.
///
/// Reads the container-level (`format`) tags reported by `ffprobe`. Saving
/// remuxes the file with every stream copied as-is and the changed entries
/// set, then replaces the original with the result.
#[derive(Debug, Clone)]
pub struct FfprobeTagDictionary {
    ffprobe: PathBuf,
    ffmpeg: PathBuf,
}

impl FfprobeTagDictionary {
    pub fn new(ffprobe: impl Into<PathBuf>, ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            ffmpeg: ffmpeg.into(),
        }
    }
}

impl TagDictionary for FfprobeTagDictionary {
    #[instrument(skip(self))]
    fn open(&self, path: &Path) -> Result<Box<dyn TagSession>> {
        let output = run_tool(&self.ffprobe, &probe_args(path), "read container tags")?;
        let entries = parse_probe_output(&output.stdout)?;

        debug!(entries = entries.len(), "Read container tags");

        Ok(Box::new(FfprobeTagSession {
            path: path.to_path_buf(),
            ffmpeg: self.ffmpeg.clone(),
            entries,
            pending: Vec::new(),
        }))
    }
}

struct FfprobeTagSession {
    path: PathBuf,
    ffmpeg: PathBuf,
    /// Keys lowercased; container tag names are case-insensitive.
    entries: HashMap<String, String>,
    pending: Vec<(String, String)>,
}

impl TagSession for FfprobeTagSession {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(&key.to_lowercase()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = key.to_lowercase();
        self.entries.insert(key.clone(), value.to_string());
        self.pending.retain(|(k, _)| *k != key);
        self.pending.push((key, value.to_string()));
        Ok(())
    }

    fn save(self: Box<Self>) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let suffix = self
            .path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        // ffmpeg cannot write in place; remux to a sibling and swap it in
        let remuxed = tempfile::Builder::new()
            .prefix(".remux-")
            .suffix(&suffix)
            .tempfile_in(parent)?;

        run_tool(
            &self.ffmpeg,
            &remux_args(&self.path, remuxed.path(), &self.pending),
            "write container tags",
        )?;

        remuxed
            .persist(&self.path)
            .map_err(|e| BridgeError::Io(e.error))?;

        debug!(path = %self.path.display(), "Rewrote container tags");
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: ProbeFormat,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    tags: HashMap<String, String>,
}

fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "quiet", "-print_format", "json", "-show_format"]
        .map(OsString::from)
        .into();
    args.push(path.into());
    args
}

fn remux_args(input: &Path, output: &Path, entries: &[(String, String)]) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-v", "error", "-i"].map(OsString::from).into();
    args.push(input.into());
    args.extend(["-map", "0", "-c", "copy", "-map_metadata", "0"].map(OsString::from));
    for (key, value) in entries {
        args.push("-metadata".into());
        args.push(format!("{}={}", key, value).into());
    }
    args.push(output.into());
    args
}

fn parse_probe_output(stdout: &[u8]) -> Result<HashMap<String, String>> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| BridgeError::InvalidData(format!("Unreadable ffprobe output: {}", e)))?;

    Ok(probe
        .format
        .tags
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_case_insensitive() {
        let json = br#"{
            "format": {
                "filename": "clip.mkv",
                "format_name": "matroska,webm",
                "tags": { "COMMENT": "rendezvous at six", "ENCODER": "Lavf60.3.100" }
            }
        }"#;

        let entries = parse_probe_output(json).unwrap();
        assert_eq!(entries.get("comment").map(String::as_str), Some("rendezvous at six"));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_parse_without_tags() {
        let entries = parse_probe_output(br#"{ "format": { "duration": "1.0" } }"#).unwrap();
        assert!(entries.is_empty());

        let entries = parse_probe_output(b"{}").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_invalid_output() {
        assert!(matches!(
            parse_probe_output(b""),
            Err(BridgeError::InvalidData(_))
        ));
    }

    #[test]
    fn test_probe_args() {
        assert_eq!(
            probe_args(Path::new("clip.mov")),
            ["-v", "quiet", "-print_format", "json", "-show_format", "clip.mov"]
                .map(OsString::from)
        );
    }

    #[test]
    fn test_remux_args_copy_all_streams() {
        let args = remux_args(
            Path::new("in.avi"),
            Path::new(".remux-1.avi"),
            &[("comment".to_string(), "a=b c".to_string())],
        );

        assert_eq!(
            args,
            [
                "-y", "-v", "error", "-i", "in.avi", "-map", "0", "-c", "copy",
                "-map_metadata", "0", "-metadata", "comment=a=b c", ".remux-1.avi"
            ]
            .map(OsString::from)
        );
    }

    #[test]
    fn test_session_set_overrides_and_save_without_changes_is_noop() {
        let mut session = Box::new(FfprobeTagSession {
            path: PathBuf::from("unused.mkv"),
            ffmpeg: PathBuf::from("no-such-ffmpeg-binary-91c2"),
            entries: HashMap::from([("comment".to_string(), "old".to_string())]),
            pending: Vec::new(),
        });

        assert_eq!(session.get("Comment").as_deref(), Some("old"));
        session.set("COMMENT", "new").unwrap();
        session.set("comment", "newer").unwrap();
        assert_eq!(session.get("comment").as_deref(), Some("newer"));
        assert_eq!(session.pending.len(), 1);

        let untouched = Box::new(FfprobeTagSession {
            path: PathBuf::from("unused.mkv"),
            ffmpeg: PathBuf::from("no-such-ffmpeg-binary-91c2"),
            entries: HashMap::new(),
            pending: Vec::new(),
        });
        assert!(untouched.save().is_ok());
    }

    #[test]
    fn test_missing_ffprobe() {
        let dictionary = FfprobeTagDictionary::new("no-such-ffprobe-binary-91c2", "ffmpeg");
        let result = dictionary.open(Path::new("clip.webm"));
        assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
    }
}
