//! # Observability
//!
//! Structured logging for the mixer, the beamforming engine and the
//! simulator. Engines emit `tracing` events at operation boundaries; the
//! embedding application decides where they go by calling [`init_logging`]
//! once at startup.
//!
//! ```rust,ignore
//! use ipab_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development());
//! tracing::info!(slot = "img1", "Image loaded");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
