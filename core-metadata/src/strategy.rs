//! Tag-entry embedding strategy
//!
//! The payload is stored verbatim as the value of one tag entry. Every other
//! entry, and the media content itself, is carried over unchanged by the
//! underlying [`TagDictionary`].

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bridge_traits::tags::TagDictionary;
use tracing::{debug, instrument};

use crate::error::{MetadataError, Result};

/// Entry that carries the payload.
pub const PAYLOAD_ENTRY: &str = "comment";

/// Container families that share a tag-access mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    /// FLAC, MP4/M4A, Ogg, AAC: tags read and written in-process.
    AudioContainer,
    /// Matroska, QuickTime, AVI, WebM, FLV, WMV: tags rewritten by a
    /// stream-copying remux.
    MediaContainer,
}

impl TagFamily {
    /// Name of the entry holding the payload in this family.
    pub fn entry_key(self) -> &'static str {
        match self {
            TagFamily::AudioContainer | TagFamily::MediaContainer => PAYLOAD_ENTRY,
        }
    }
}

/// Embeds and extracts payloads through a [`TagDictionary`].
pub struct TagStrategy {
    dictionary: Arc<dyn TagDictionary>,
    family: TagFamily,
}

impl TagStrategy {
    pub fn new(dictionary: Arc<dyn TagDictionary>, family: TagFamily) -> Self {
        Self { dictionary, family }
    }

    pub fn family(&self) -> TagFamily {
        self.family
    }

    /// Copy `input` to `output` and store `payload` in the copy's payload
    /// entry, replacing any previous value.
    #[instrument(skip(self, payload), fields(family = ?self.family, payload_len = payload.len()))]
    pub fn embed(&self, input: &Path, output: &Path, payload: &str) -> Result<()> {
        fs::copy(input, output)?;

        let key = self.family.entry_key();
        let mut session = self.dictionary.open(output)?;
        session.set(key, payload)?;
        session.save()?;

        debug!(entry = key, "Stored payload in tag entry");
        Ok(())
    }

    /// Read the payload entry of `input`.
    ///
    /// An absent or empty entry means nothing is hidden.
    #[instrument(skip(self), fields(family = ?self.family))]
    pub fn extract(&self, input: &Path) -> Result<String> {
        let key = self.family.entry_key();
        let session = self.dictionary.open(input)?;

        match session.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(MetadataError::NoHiddenPayload(format!(
                "'{}' entry is empty",
                key
            ))),
            None => Err(MetadataError::NoHiddenPayload(format!(
                "no '{}' entry",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::tags::TagSession;
    use mockall::mock;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    mock! {
        pub Dictionary {}

        impl TagDictionary for Dictionary {
            fn open(&self, path: &Path) -> BridgeResult<Box<dyn TagSession>>;
        }
    }

    type Store = Arc<Mutex<HashMap<PathBuf, HashMap<String, String>>>>;

    /// Dictionary that keeps entries in memory, keyed by path.
    #[derive(Default)]
    struct MemoryDictionary {
        store: Store,
    }

    struct MemorySession {
        path: PathBuf,
        entries: HashMap<String, String>,
        store: Store,
    }

    impl TagDictionary for MemoryDictionary {
        fn open(&self, path: &Path) -> BridgeResult<Box<dyn TagSession>> {
            if !path.exists() {
                return Err(BridgeError::OperationFailed(format!(
                    "cannot open {}",
                    path.display()
                )));
            }
            let entries = self
                .store
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or_default();
            Ok(Box::new(MemorySession {
                path: path.to_path_buf(),
                entries,
                store: Arc::clone(&self.store),
            }))
        }
    }

    impl TagSession for MemorySession {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> BridgeResult<()> {
            self.entries.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn save(self: Box<Self>) -> BridgeResult<()> {
            self.store.lock().unwrap().insert(self.path, self.entries);
            Ok(())
        }
    }

    fn carrier(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"fLaC....media bytes").unwrap();
        path
    }

    #[test]
    fn test_entry_key_is_comment() {
        assert_eq!(TagFamily::AudioContainer.entry_key(), "comment");
        assert_eq!(TagFamily::MediaContainer.entry_key(), "comment");
    }

    #[test]
    fn test_embed_then_extract() {
        let dir = tempfile::tempdir().unwrap();
        let input = carrier(dir.path(), "in.flac");
        let output = dir.path().join("out.flac");

        let dictionary = Arc::new(MemoryDictionary::default());
        let strategy = TagStrategy::new(dictionary.clone(), TagFamily::AudioContainer);

        strategy.embed(&input, &output, "hidden in plain sight").unwrap();

        assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap());
        assert_eq!(strategy.extract(&output).unwrap(), "hidden in plain sight");
        // input is never modified
        assert!(matches!(
            strategy.extract(&input),
            Err(MetadataError::NoHiddenPayload(_))
        ));
    }

    #[test]
    fn test_each_output_carries_its_own_payload() {
        let dir = tempfile::tempdir().unwrap();
        let input = carrier(dir.path(), "in.mkv");
        let first = dir.path().join("first.mkv");
        let second = dir.path().join("second.mkv");

        let strategy = TagStrategy::new(
            Arc::new(MemoryDictionary::default()),
            TagFamily::MediaContainer,
        );

        strategy.embed(&input, &first, "one").unwrap();
        strategy.embed(&first, &second, "two").unwrap();

        assert_eq!(strategy.extract(&first).unwrap(), "one");
        assert_eq!(strategy.extract(&second).unwrap(), "two");
    }

    #[test]
    fn test_empty_entry_is_no_payload() {
        let dir = tempfile::tempdir().unwrap();
        let input = carrier(dir.path(), "in.ogg");

        let dictionary = MemoryDictionary::default();
        dictionary.store.lock().unwrap().insert(
            input.clone(),
            HashMap::from([("comment".to_string(), String::new())]),
        );

        let strategy = TagStrategy::new(Arc::new(dictionary), TagFamily::AudioContainer);
        let err = strategy.extract(&input).unwrap_err();

        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_open_failure_is_bridge_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = carrier(dir.path(), "in.m4a");

        let mut dictionary = MockDictionary::new();
        dictionary
            .expect_open()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("corrupt atom".to_string())));

        let strategy = TagStrategy::new(Arc::new(dictionary), TagFamily::AudioContainer);
        let err = strategy.extract(&input).unwrap_err();

        assert!(matches!(err, MetadataError::Bridge(_)));
    }

    #[test]
    fn test_embed_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = TagStrategy::new(
            Arc::new(MockDictionary::new()),
            TagFamily::AudioContainer,
        );

        let err = strategy
            .embed(
                &dir.path().join("missing.flac"),
                &dir.path().join("out.flac"),
                "x",
            )
            .unwrap_err();

        assert!(matches!(err, MetadataError::Io(_)));
    }
}
