//! Shared foundation for the Crestline concierge backend.
//!
//! Holds the configuration surface, the top-level error type, and the
//! domain types exchanged between the catalog store, the chat pipeline,
//! and the HTTP surface.

pub mod config;
pub mod error;
pub mod types;

pub use config::CrestlineConfig;
pub use error::{CrestlineError, Result};
pub use types::*;
