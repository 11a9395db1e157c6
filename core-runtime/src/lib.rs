//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the embedding engine:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Scoped filesystem resources (staged outputs, per-call workspaces)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other crates depend
//! on. It establishes the logging conventions and the fail-closed output
//! discipline used throughout the system: nothing is written to a caller's
//! output path until the operation producing it has succeeded.

pub mod config;
pub mod error;
pub mod logging;
pub mod staging;

pub use error::{Error, Result};
