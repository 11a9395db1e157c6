//! Workspace façade crate.
//!
//! Re-exports the embedding engine from `core-service` so host applications
//! can depend on `stego-workspace` and pick a feature set instead of wiring
//! each crate individually:
//!
//! - `desktop-shims` (default): ffmpeg/ffprobe-backed collaborators from
//!   `bridge-desktop` are available through `StegoService::desktop`.
//! - `core-only`: only the in-process strategies; hosts inject their own
//!   `Transcoder` and media-container `TagDictionary`.

#[cfg(any(feature = "desktop-shims", feature = "core-only"))]
pub use core_service::*;
