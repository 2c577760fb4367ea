//! HTTP surface for the Crestline concierge.
//!
//! Exposes the chat pipeline over axum: `/chat` for text, `/chat/audio`
//! for voice, `/health` for liveness.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
