//! trickle-core: shared pieces of the trickle streaming demo.
//!
//! - [`ProgressSequence`]: the simulated slow computation, a blocking
//!   iterator that yields one status line per delay unit.
//! - [`SampleContext`]: the per-request template context that embeds a
//!   progress sequence.
//! - [`TrickleConfig`]: `trickle.toml` configuration and the resolved
//!   [`DelaySettings`] handed to the web layer.

pub mod config;
pub mod context;
pub mod error;
pub mod progress;

pub use config::{DelaySettings, TrickleConfig, parse_duration};
pub use context::SampleContext;
pub use error::{ConfigError, ConfigResult};
pub use progress::{ProgressSequence, ProgressState};
