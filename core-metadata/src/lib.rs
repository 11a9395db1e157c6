//! # Container Tag Embedding
//!
//! Hides a text payload in a container's own metadata dictionary instead of
//! its media content.
//!
//! ## Overview
//!
//! This module handles:
//! - Writing the payload to a single well-known tag entry ([`TagStrategy`])
//! - Reading it back, treating an absent or empty entry as "nothing hidden"
//! - Tag access for audio containers through `lofty` ([`LoftyTagDictionary`])
//!
//! Media containers (Matroska, QuickTime, AVI, ...) use the same
//! [`TagStrategy`] with a dictionary backed by external tools; see
//! `bridge-desktop`.

pub mod error;
pub mod strategy;
pub mod tags;

pub use error::{MetadataError, Result};
pub use strategy::{TagFamily, TagStrategy};
pub use tags::LoftyTagDictionary;
