//! Core service façade.
//!
//! This crate wires the embedding strategies and host-provided collaborators
//! (transcoder, tag dictionaries, sample streams) behind one dispatcher,
//! [`StegoService`]. Desktop apps typically enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`) and build the service with
//! [`StegoService::desktop`]; other hosts assemble [`StegoDependencies`]
//! themselves.
//!
//! ```ignore
//! use core_service::{StegoConfig, StegoService};
//!
//! let service = StegoService::desktop(&StegoConfig::default());
//! service.embed(Path::new("song.wav"), Path::new("song_stego.wav"), "meet at noon")?;
//! assert_eq!(service.extract(Path::new("song_stego.wav"))?, "meet at noon");
//! ```

pub mod archive;
pub mod classifier;
pub mod error;
pub mod outcome;
pub mod service;

pub use classifier::{
    classify, supported_formats, unsupported_reason, AppendPolicy, CapabilityClass,
    SampleDomain, SupportedFormats,
};
pub use core_metadata::TagFamily;
pub use core_runtime::config::StegoConfig;
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use error::{ErrorKind, Result, StegoError};
pub use service::{CarrierCapacity, StegoDependencies, StegoService};
