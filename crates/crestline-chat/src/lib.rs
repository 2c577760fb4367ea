//! Conversational pipeline for the Crestline catalog.
//!
//! Takes a raw user message through preprocessing, language detection,
//! short-circuit classification, fuzzy entity resolution, contextual
//! model generation, and response finalization.

pub mod classify;
pub mod context;
pub mod error;
pub mod finalize;
pub mod intent;
pub mod memory;
pub mod pipeline;
pub mod preprocess;
pub mod prompt;
pub mod replies;
pub mod resolve;
pub mod types;

pub use classify::{route, Route, RouteInput};
pub use context::CompanyInfoCache;
pub use error::ChatError;
pub use intent::{detect_intent, Intent};
pub use memory::NameStore;
pub use pipeline::ChatPipeline;
pub use preprocess::preprocess;
pub use resolve::{resolve_entities, Resolution};
pub use types::{AudioOutcome, ChatOutcome};
