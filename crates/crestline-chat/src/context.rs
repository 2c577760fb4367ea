//! Context assembly: company information, entity digests, normalized
//! projections, sample lists, and structured links.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crestline_core::types::{
    CompanySection, EntityKind, EntityLink, EntityRecord, NormalizedEntity,
};
use crestline_store::{EntityStore, ListQuery};

use crate::error::ChatError;

/// Placeholder image for records without one.
pub const DEFAULT_IMAGE: &str = "https://via.placeholder.com/100";
/// Placeholder avatar for developers without an image.
pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/100?text=avatar";

// =============================================================================
// Company-info cache
// =============================================================================

/// Lazily populated, TTL-bounded cache of company-info sections.
///
/// Concurrent first reads may both hit the store; the duplicate fetch is
/// idempotent and the last write wins.
pub struct CompanyInfoCache {
    ttl: Duration,
    cached: RwLock<Option<(Instant, Arc<Vec<CompanySection>>)>>,
}

impl CompanyInfoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// The cached sections, fetching from the store when absent or stale.
    pub async fn sections(
        &self,
        store: &dyn EntityStore,
    ) -> Result<Arc<Vec<CompanySection>>, ChatError> {
        {
            let guard = self.cached.read().await;
            if let Some((fetched_at, sections)) = guard.as_ref() {
                if fetched_at.elapsed() <= self.ttl {
                    return Ok(Arc::clone(sections));
                }
            }
        }

        let sections = Arc::new(store.company_sections().await?);
        let mut guard = self.cached.write().await;
        *guard = Some((Instant::now(), Arc::clone(&sections)));
        tracing::debug!(sections = sections.len(), "Company info cached");
        Ok(sections)
    }
}

// =============================================================================
// Company-info relevance
// =============================================================================

/// Score sections against a message and return up to `max_sections`
/// rendered `title: content` snippets.
///
/// Tag substring hits weigh 3, content token overlap weighs 1. When no
/// section scores positively the single best section is still returned,
/// so any curated content beats silence.
pub fn relevant_company_info(
    sections: &[CompanySection],
    message: &str,
    max_sections: usize,
) -> Vec<String> {
    if sections.is_empty() {
        return Vec::new();
    }

    let lower = message.to_lowercase();
    let tokens: HashSet<String> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let mut scored: Vec<(&CompanySection, i64)> = sections
        .iter()
        .map(|section| {
            let mut score = 0i64;
            for tag in &section.tags {
                if lower.contains(&tag.to_lowercase()) {
                    score += 3;
                }
            }
            let content = section.content.to_lowercase();
            for token in &tokens {
                if content.contains(token.as_str()) {
                    score += 1;
                }
            }
            (section, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut relevant: Vec<&CompanySection> = scored
        .iter()
        .filter(|(_, score)| *score > 0)
        .take(max_sections)
        .map(|(section, _)| *section)
        .collect();
    if relevant.is_empty() {
        if let Some((best, _)) = scored.first() {
            relevant.push(best);
        }
    }

    relevant
        .into_iter()
        .map(|s| format!("{}: {}", s.title, s.content))
        .collect()
}

// =============================================================================
// Digests and truncation
// =============================================================================

/// Truncate to `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// A bounded human-readable digest of one record.
pub fn digest(record: &EntityRecord, kind: EntityKind, max_desc_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(name) = record.name.primary() {
        parts.push(format!("Name: {}", name));
    }
    match kind {
        EntityKind::Product => {
            if let Some(desc) = &record.description {
                parts.push(format!("Description: {}", truncate_chars(desc, max_desc_chars)));
            }
            if let Some(location) = &record.location {
                parts.push(format!("Location: {}", location));
            }
            if let Some(status) = &record.status {
                parts.push(format!("Status: {}", status));
            }
            if let Some(item_type) = &record.item_type {
                parts.push(format!("Type: {}", item_type));
            }
            if let Some(price) = &record.price {
                parts.push(format!("Price: {}", price));
            }
            if let Some(beds) = record.beds {
                parts.push(format!("Bedrooms: {}", beds));
            }
            if let Some(baths) = record.baths {
                parts.push(format!("Bathrooms: {}", baths));
            }
        }
        EntityKind::Project => {
            if let Some(location) = &record.location {
                parts.push(format!("Location: {}", location));
            }
            if let Some(status) = &record.status {
                parts.push(format!("Status: {}", status));
            }
            if let Some(desc) = &record.description {
                parts.push(format!("Description: {}", truncate_chars(desc, max_desc_chars)));
            }
        }
        EntityKind::Developer => {
            if let Some(desc) = &record.description {
                parts.push(format!("Description: {}", truncate_chars(desc, max_desc_chars)));
            }
        }
        EntityKind::User => {
            if let Some(email) = &record.email {
                parts.push(format!("Email: {}", email));
            }
            if let Some(role) = &record.role {
                parts.push(format!("Role: {}", role));
            }
        }
    }

    let label = match kind {
        EntityKind::Product => "Product details",
        EntityKind::Project => "Project details",
        EntityKind::Developer => "Developer details",
        EntityKind::User => "User details",
    };
    format!("{}: {}.", label, parts.join(" | "))
}

// =============================================================================
// Normalization
// =============================================================================

fn default_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Product => "Unnamed product",
        EntityKind::Project => "Unnamed project",
        EntityKind::Developer => "Unnamed",
        EntityKind::User => "Unnamed",
    }
}

/// Flatten a record into its UI-ready projection.
///
/// `name` and `image` always come out non-empty; `url` is absent only
/// when the record has no id.
pub fn normalize(record: &EntityRecord, kind: EntityKind, site_base_url: &str) -> NormalizedEntity {
    let name = record
        .name
        .primary()
        .filter(|n| !n.is_empty())
        .unwrap_or(default_name(kind))
        .to_string();

    let image = record
        .image
        .as_ref()
        .and_then(|i| i.best())
        .or(record.photo.as_deref().filter(|p| !p.is_empty()))
        .unwrap_or(match kind {
            EntityKind::Developer => DEFAULT_AVATAR,
            _ => DEFAULT_IMAGE,
        })
        .to_string();

    let url = record
        .id
        .as_ref()
        .map(|id| format!("{}/{}/{}", site_base_url, kind.link_path(), id));

    NormalizedEntity {
        id: record.id.clone(),
        name,
        image,
        url,
        description: record.description.clone().unwrap_or_default(),
    }
}

/// Drop entries sharing a name with an earlier entry.
pub fn dedupe_by_name(entities: Vec<NormalizedEntity>) -> Vec<NormalizedEntity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert(e.name.clone()))
        .collect()
}

// =============================================================================
// Samples and links
// =============================================================================

/// Fetch example records: featured ones first, any records as fallback.
pub async fn sample_entities(
    store: &dyn EntityStore,
    kind: EntityKind,
    limit: usize,
) -> Result<Vec<EntityRecord>, ChatError> {
    let featured = store.find(kind, &ListQuery::featured(limit)).await?;
    if !featured.is_empty() {
        return Ok(featured);
    }
    Ok(store.find(kind, &ListQuery::all(limit)).await?)
}

/// Build deep links for normalized entities that carry an identifier.
pub fn structured_links(entities: &[(EntityKind, &NormalizedEntity)]) -> Vec<EntityLink> {
    entities
        .iter()
        .filter(|(_, entity)| entity.id.is_some())
        .filter_map(|(kind, entity)| {
            entity.url.as_ref().map(|url| EntityLink {
                kind: *kind,
                label: entity.name.clone(),
                url: url.clone(),
            })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
