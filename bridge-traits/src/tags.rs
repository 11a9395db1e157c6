//! Tag Dictionary Abstraction
//!
//! Exposes a container's native key/value metadata store (Vorbis comments,
//! MP4 atoms, ID3 frames, Matroska tags, ...) as named string entries.

use std::path::Path;

use crate::error::Result;

/// Tag dictionary collaborator
///
/// Opens a container and hands back a [`TagSession`] bound to that file.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::tags::TagDictionary;
///
/// fn read_comment(dict: &dyn TagDictionary, path: &Path) -> Result<Option<String>> {
///     let session = dict.open(path)?;
///     Ok(session.get("comment"))
/// }
/// ```
pub trait TagDictionary: Send + Sync {
    /// Open the tag dictionary of the container at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn TagSession>>;
}

/// An open tag dictionary bound to one file
///
/// Changes made with [`set`](TagSession::set) are held in memory until
/// [`save`](TagSession::save) persists all entries back to the same file.
/// Dropping a session without saving discards the changes.
pub trait TagSession {
    /// Read the entry named `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the entry named `key` with `value`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Persist every entry to the file the session was opened on.
    fn save(self: Box<Self>) -> Result<()>;
}
