//! In-process tag access for audio containers
//!
//! Backed by `lofty`, which reads and writes the native tag format of each
//! container (Vorbis comments for FLAC/Ogg, `ilst` atoms for MP4, ID3v2 for
//! AAC and WAV) and leaves the audio stream untouched.

use std::path::{Path, PathBuf};

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::tags::{TagDictionary, TagSession};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use tracing::debug;

/// [`TagDictionary`] for audio containers supported by `lofty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagDictionary;

impl LoftyTagDictionary {
    pub fn new() -> Self {
        Self
    }
}

impl TagDictionary for LoftyTagDictionary {
    fn open(&self, path: &Path) -> Result<Box<dyn TagSession>> {
        let file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| {
                BridgeError::OperationFailed(format!(
                    "Failed to read tags from {}: {}",
                    path.display(),
                    e
                ))
            })?;

        debug!(
            path = %path.display(),
            file_type = ?file.file_type(),
            tags = file.tags().len(),
            "Opened tag dictionary"
        );

        Ok(Box::new(LoftyTagSession {
            path: path.to_path_buf(),
            file,
        }))
    }
}

struct LoftyTagSession {
    path: PathBuf,
    file: TaggedFile,
}

impl TagSession for LoftyTagSession {
    fn get(&self, key: &str) -> Option<String> {
        let item_key = item_key(key);

        // Primary tag wins; fall back to any other tag the file carries
        self.file
            .primary_tag()
            .and_then(|tag| tag.get_string(&item_key))
            .or_else(|| {
                self.file
                    .tags()
                    .iter()
                    .find_map(|tag| tag.get_string(&item_key))
            })
            .map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.file.primary_tag_mut().is_none() {
            let tag_type = self.file.primary_tag_type();
            self.file.insert_tag(Tag::new(tag_type));
        }

        let tag = self.file.primary_tag_mut().ok_or_else(|| {
            BridgeError::OperationFailed(format!(
                "{} cannot hold a primary tag",
                self.path.display()
            ))
        })?;

        if !tag.insert_text(item_key(key), value.to_string()) {
            return Err(BridgeError::OperationFailed(format!(
                "{:?} tags have no '{}' entry",
                tag.tag_type(),
                key
            )));
        }

        Ok(())
    }

    fn save(self: Box<Self>) -> Result<()> {
        self.file
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| {
                BridgeError::OperationFailed(format!(
                    "Failed to write tags to {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

fn item_key(key: &str) -> ItemKey {
    match key {
        "comment" => ItemKey::Comment,
        "title" => ItemKey::TrackTitle,
        "description" => ItemKey::Description,
        other => ItemKey::Unknown(other.to_string()),
    }
}
