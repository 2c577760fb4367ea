//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use crestline_chat::ChatPipeline;

/// Shared application state.
///
/// The pipeline is `Arc`-wrapped for cheap cloning across handler tasks;
/// all of its mutable internals carry their own synchronization.
#[derive(Clone)]
pub struct AppState {
    /// The conversational pipeline.
    pub pipeline: Arc<ChatPipeline>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            start_time: Instant::now(),
        }
    }
}
