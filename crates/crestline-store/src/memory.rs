//! In-memory `EntityStore` implementation.
//!
//! Backs tests, demos, and offline runs. Records are kept per kind in
//! insertion order, which doubles as the store's natural order for
//! tie-breaking.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crestline_core::types::{CompanySection, EntityKind, EntityRecord};

use crate::query::{FieldQuery, ListQuery};
use crate::{EntityStore, StoreError};

#[derive(Default)]
struct Inner {
    records: HashMap<EntityKind, Vec<EntityRecord>>,
    sections: Vec<CompanySection>,
}

/// Vec-backed catalog store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the end of its kind's collection.
    pub async fn insert(&self, kind: EntityKind, record: EntityRecord) {
        let mut inner = self.inner.write().await;
        inner.records.entry(kind).or_default().push(record);
    }

    /// Replace the company-info sections.
    pub async fn set_sections(&self, sections: Vec<CompanySection>) {
        self.inner.write().await.sections = sections;
    }

    /// Number of records stored for a kind.
    pub async fn len(&self, kind: EntityKind) -> usize {
        self.inner
            .read()
            .await
            .records
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Whether a kind has no records.
    pub async fn is_empty(&self, kind: EntityKind) -> bool {
        self.len(kind).await == 0
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_one(
        &self,
        kind: EntityKind,
        query: &FieldQuery,
    ) -> Result<Option<EntityRecord>, StoreError> {
        let inner = self.inner.read().await;
        let hit = inner
            .records
            .get(&kind)
            .into_iter()
            .flatten()
            .find(|r| query.matches(r))
            .cloned();
        Ok(hit)
    }

    async fn find(
        &self,
        kind: EntityKind,
        query: &ListQuery,
    ) -> Result<Vec<EntityRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut results: Vec<EntityRecord> = inner
            .records
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|r| !query.featured_only || r.featured)
            .cloned()
            .collect();

        if query.newest_first {
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        results.truncate(query.limit);
        Ok(results)
    }

    async fn company_sections(&self) -> Result<Vec<CompanySection>, StoreError> {
        Ok(self.inner.read().await.sections.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
