//! Document-store abstraction for the Crestline catalog.
//!
//! The concierge treats the catalog as an external collaborator reachable
//! through `find`/`find_one`-style operations with case-insensitive text
//! matching. `EntityStore` is the seam; `MemoryStore` is the in-tree
//! implementation used by tests, demos, and offline runs.

pub mod memory;
pub mod query;

use async_trait::async_trait;

use crestline_core::types::{CompanySection, EntityKind, EntityRecord};

pub use memory::MemoryStore;
pub use query::{FieldQuery, ListQuery, TextMatch};

/// Errors from the document-store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for crestline_core::CrestlineError {
    fn from(err: StoreError) -> Self {
        crestline_core::CrestlineError::Store(err.to_string())
    }
}

/// Read-only access to the catalog document store.
///
/// Result order is the store's natural order; callers rely on it for
/// tie-breaking, so implementations must return documents in a stable
/// order.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Find the first record of `kind` matching the field query.
    async fn find_one(
        &self,
        kind: EntityKind,
        query: &FieldQuery,
    ) -> Result<Option<EntityRecord>, StoreError>;

    /// List records of `kind` according to the list query.
    async fn find(&self, kind: EntityKind, query: &ListQuery)
        -> Result<Vec<EntityRecord>, StoreError>;

    /// All curated company-info sections.
    async fn company_sections(&self) -> Result<Vec<CompanySection>, StoreError>;
}
