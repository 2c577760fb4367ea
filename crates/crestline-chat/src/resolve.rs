//! Fuzzy entity resolution against the document store.
//!
//! Lookup is three-tiered: exact full-string match on any searchable
//! field, then substring match, then substring match on the query's first
//! token. The first tier that yields a hit wins; ties within a tier fall
//! to the store's natural order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crestline_core::types::{EntityKind, EntityRecord};
use crestline_store::{EntityStore, FieldQuery, TextMatch};

use crate::error::ChatError;
use crate::intent::Intent;

/// Tokens ignored when building the fallback lookup phrase.
static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "write", "link", "of", "the", "for", "give", "me", "product", "project", "developer",
        "please", "show", "url", "what", "is", "my", "in", "to", "and", "a", "an", "on", "about",
        "any", "you", "could", "would", "like", "here", "there",
    ]
    .into_iter()
    .collect()
});

static PRODUCT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bproduct\s*(?:name)?:\s*([^\n,?.!]+)").expect("Invalid product label regex")
});
static PROJECT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bproject\s*(?:name)?:\s*([^\n,?.!]+)").expect("Invalid project label regex")
});
static DEVELOPER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdeveloper\s*(?:name)?:\s*([^\n,?.!]+)")
        .expect("Invalid developer label regex")
});
static USER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\buser\s*(?:name)?:\s*([^\n,?.!]+)").expect("Invalid user label regex")
});

/// Extract an explicit `<kind> name: <value>` mention, if present.
pub fn labeled_mention(kind: EntityKind, text: &str) -> Option<String> {
    let re = match kind {
        EntityKind::Product => &*PRODUCT_LABEL_RE,
        EntityKind::Project => &*PROJECT_LABEL_RE,
        EntityKind::Developer => &*DEVELOPER_LABEL_RE,
        EntityKind::User => &*USER_LABEL_RE,
    };
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Build a lookup phrase from the message's content tokens: stop words
/// and tokens shorter than three characters removed.
pub fn content_phrase(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && t.len() >= 3 && !STOPWORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Three-tier fuzzy lookup for one kind.
pub async fn find_one_fuzzy(
    store: &dyn EntityStore,
    kind: EntityKind,
    query_text: &str,
) -> Result<Option<EntityRecord>, ChatError> {
    let clean = query_text.trim();
    if clean.is_empty() {
        return Ok(None);
    }
    let fields = kind.search_fields();

    // Tier 1: exact full-string match on any field.
    let exact = FieldQuery::new(fields.clone(), TextMatch::Exact(clean.to_string()));
    if let Some(record) = store.find_one(kind, &exact).await? {
        return Ok(Some(record));
    }

    // Tier 2: substring match on any field.
    let partial = FieldQuery::new(fields.clone(), TextMatch::Contains(clean.to_string()));
    if let Some(record) = store.find_one(kind, &partial).await? {
        return Ok(Some(record));
    }

    // Tier 3: substring match on the first token, if it is long enough.
    let first_token = clean.split_whitespace().next().unwrap_or("");
    if first_token.len() >= 2 {
        let token = FieldQuery::new(fields, TextMatch::Contains(first_token.to_string()));
        if let Some(record) = store.find_one(kind, &token).await? {
            return Ok(Some(record));
        }
    }

    Ok(None)
}

/// At most one resolved record per kind for one message.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    pub product: Option<EntityRecord>,
    pub project: Option<EntityRecord>,
    pub developer: Option<EntityRecord>,
    pub user: Option<EntityRecord>,
}

impl Resolution {
    /// Drop matches that contradict a non-ambiguous intent.
    pub fn enforce_exclusive_intent(&mut self, intent: &Intent) {
        if intent.wants_product && !intent.ambiguous {
            self.project = None;
        }
        if intent.wants_project && !intent.ambiguous {
            self.product = None;
        }
        if intent.wants_developer && !intent.ambiguous {
            self.product = None;
            self.project = None;
        }
    }
}

/// Resolve entities mentioned by a message.
///
/// Labeled mentions in the preprocessed message are tried first for
/// every kind; the content-phrase fallback then covers only the kinds
/// implied by `intent` (or all catalog kinds when ambiguous). User
/// lookup happens only via labels and only when the capability is on.
pub async fn resolve_entities(
    store: &dyn EntityStore,
    processed: &str,
    pivot: &str,
    intent: &Intent,
    users_enabled: bool,
) -> Result<Resolution, ChatError> {
    let mut resolution = Resolution::default();

    if let Some(value) = labeled_mention(EntityKind::Product, processed) {
        resolution.product = find_one_fuzzy(store, EntityKind::Product, &value).await?;
    }
    if let Some(value) = labeled_mention(EntityKind::Project, processed) {
        resolution.project = find_one_fuzzy(store, EntityKind::Project, &value).await?;
    }
    if let Some(value) = labeled_mention(EntityKind::Developer, processed) {
        resolution.developer = find_one_fuzzy(store, EntityKind::Developer, &value).await?;
    }
    if users_enabled {
        if let Some(value) = labeled_mention(EntityKind::User, processed) {
            resolution.user = find_one_fuzzy(store, EntityKind::User, &value).await?;
        }
    }

    let phrase = content_phrase(pivot);
    if resolution.product.is_none() && (intent.wants_product || intent.ambiguous) {
        resolution.product = find_one_fuzzy(store, EntityKind::Product, &phrase).await?;
    }
    if resolution.project.is_none() && (intent.wants_project || intent.ambiguous) {
        resolution.project = find_one_fuzzy(store, EntityKind::Project, &phrase).await?;
    }
    if resolution.developer.is_none() && (intent.wants_developer || intent.ambiguous) {
        resolution.developer = find_one_fuzzy(store, EntityKind::Developer, &phrase).await?;
    }

    tracing::debug!(
        product = ?resolution.product.as_ref().and_then(|r| r.id.as_deref()),
        project = ?resolution.project.as_ref().and_then(|r| r.id.as_deref()),
        developer = ?resolution.developer.as_ref().and_then(|r| r.id.as_deref()),
        user = ?resolution.user.as_ref().and_then(|r| r.id.as_deref()),
        "Entities resolved"
    );

    Ok(resolution)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::detect_intent;
    use crestline_core::types::LocaleText;
    use crestline_store::MemoryStore;

    fn record(name: &str) -> EntityRecord {
        EntityRecord {
            id: Some(format!("id-{}", name.to_lowercase().replace(' ', "-"))),
            name: LocaleText::english(name),
            ..EntityRecord::default()
        }
    }

    async fn store_with(kind: EntityKind, names: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for name in names {
            store.insert(kind, record(name)).await;
        }
        store
    }

    // ---- labeled_mention ----

    #[test]
    fn test_labeled_mention_product() {
        assert_eq!(
            labeled_mention(EntityKind::Product, "product name: Marina Heights"),
            Some("Marina Heights".into())
        );
        assert_eq!(
            labeled_mention(EntityKind::Product, "product: Marina Heights"),
            Some("Marina Heights".into())
        );
    }

    #[test]
    fn test_labeled_mention_stops_at_punctuation() {
        assert_eq!(
            labeled_mention(EntityKind::Project, "project: Palm Gardens, please"),
            Some("Palm Gardens".into())
        );
    }

    #[test]
    fn test_labeled_mention_absent() {
        assert_eq!(labeled_mention(EntityKind::Developer, "marina heights"), None);
    }

    #[test]
    fn test_labeled_mention_kind_specific() {
        let text = "project: Palm Gardens";
        assert_eq!(labeled_mention(EntityKind::Product, text), None);
        assert!(labeled_mention(EntityKind::Project, text).is_some());
    }

    // ---- content_phrase ----

    #[test]
    fn test_content_phrase_filters_stopwords() {
        assert_eq!(
            content_phrase("show me the marina heights product"),
            "marina heights"
        );
    }

    #[test]
    fn test_content_phrase_filters_short_tokens() {
        assert_eq!(content_phrase("go to al marina"), "marina");
    }

    #[test]
    fn test_content_phrase_empty_when_all_filtered() {
        assert_eq!(content_phrase("show me the of"), "");
    }

    #[test]
    fn test_content_phrase_splits_punctuation() {
        assert_eq!(content_phrase("marina-heights, tower!"), "marina heights tower");
    }

    // ---- find_one_fuzzy tiers ----

    #[tokio::test]
    async fn test_exact_match_preferred_over_substring() {
        // "Marina" exactly names one record; another contains it.
        let store = store_with(EntityKind::Product, &["Marina Gardens", "Marina"]).await;
        let hit = find_one_fuzzy(&store, EntityKind::Product, "marina")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.name.en.as_deref(), Some("Marina"));
    }

    #[tokio::test]
    async fn test_substring_tier() {
        let store = store_with(EntityKind::Product, &["Marina Heights Tower"]).await;
        let hit = find_one_fuzzy(&store, EntityKind::Product, "marina heights")
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_first_token_tier() {
        let store = store_with(EntityKind::Product, &["Marina Heights"]).await;
        // Full phrase matches nothing; the first token does.
        let hit = find_one_fuzzy(&store, EntityKind::Product, "marina waterfront view")
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_first_token_skipped_when_too_short() {
        let store = store_with(EntityKind::Product, &["A Tower"]).await;
        // "a" is a single character; tier 3 must not run.
        let hit = find_one_fuzzy(&store, EntityKind::Product, "a nonexistent phrase")
            .await
            .unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_empty_query_is_none() {
        let store = store_with(EntityKind::Product, &["Marina Heights"]).await;
        assert!(find_one_fuzzy(&store, EntityKind::Product, "  ")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_tie_breaks_by_store_order() {
        let store = store_with(EntityKind::Project, &["Palm One", "Palm Two"]).await;
        let hit = find_one_fuzzy(&store, EntityKind::Project, "palm")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.name.en.as_deref(), Some("Palm One"));
    }

    // ---- resolve_entities ----

    #[tokio::test]
    async fn test_labeled_mention_resolves_directly() {
        let store = store_with(EntityKind::Product, &["Marina Heights"]).await;
        let intent = detect_intent("product name: marina heights");
        let resolution = resolve_entities(
            &store,
            "product name: marina heights",
            "product name: marina heights",
            &intent,
            true,
        )
        .await
        .unwrap();
        assert!(resolution.product.is_some());
        assert!(resolution.project.is_none());
    }

    #[tokio::test]
    async fn test_phrase_fallback_respects_intent() {
        let store = MemoryStore::new();
        store
            .insert(EntityKind::Product, record("Marina Heights"))
            .await;
        store
            .insert(EntityKind::Project, record("Marina Gardens"))
            .await;

        // Non-ambiguous project intent: product lookup must not run.
        let intent = detect_intent("marina project");
        let resolution = resolve_entities(&store, "marina project", "marina project", &intent, true)
            .await
            .unwrap();
        assert!(resolution.product.is_none());
        assert!(resolution.project.is_some());
    }

    #[tokio::test]
    async fn test_ambiguous_intent_tries_all_kinds() {
        let store = MemoryStore::new();
        store
            .insert(EntityKind::Developer, record("Hartwell Group"))
            .await;

        let intent = detect_intent("hartwell");
        assert!(intent.ambiguous);
        let resolution = resolve_entities(&store, "hartwell", "hartwell", &intent, true)
            .await
            .unwrap();
        assert!(resolution.developer.is_some());
    }

    #[tokio::test]
    async fn test_user_resolution_only_via_label() {
        let store = MemoryStore::new();
        let mut user = record("Sara Haddad");
        user.email = Some("sara@crestline.example".into());
        store.insert(EntityKind::User, user).await;

        // No label: ambiguous phrase lookup must not return users.
        let intent = detect_intent("sara haddad");
        let resolution = resolve_entities(&store, "sara haddad", "sara haddad", &intent, true)
            .await
            .unwrap();
        assert!(resolution.user.is_none());

        // With a label the user resolves.
        let resolution =
            resolve_entities(&store, "user: sara haddad", "user: sara haddad", &intent, true)
                .await
                .unwrap();
        assert!(resolution.user.is_some());
    }

    #[tokio::test]
    async fn test_user_capability_off_skips_user_lookup() {
        let store = MemoryStore::new();
        store.insert(EntityKind::User, record("Sara")).await;

        let intent = detect_intent("user: sara");
        let resolution = resolve_entities(&store, "user: sara", "user: sara", &intent, false)
            .await
            .unwrap();
        assert!(resolution.user.is_none());
    }

    // ---- exclusive intent ----

    #[tokio::test]
    async fn test_enforce_exclusive_intent_product() {
        let mut resolution = Resolution {
            product: Some(record("Marina Heights")),
            project: Some(record("Palm Gardens")),
            ..Resolution::default()
        };
        let intent = detect_intent("marina product");
        resolution.enforce_exclusive_intent(&intent);
        assert!(resolution.product.is_some());
        assert!(resolution.project.is_none());
    }

    #[tokio::test]
    async fn test_enforce_exclusive_intent_developer_clears_both() {
        let mut resolution = Resolution {
            product: Some(record("Marina Heights")),
            project: Some(record("Palm Gardens")),
            developer: Some(record("Hartwell Group")),
            ..Resolution::default()
        };
        let intent = detect_intent("hartwell developer");
        resolution.enforce_exclusive_intent(&intent);
        assert!(resolution.product.is_none());
        assert!(resolution.project.is_none());
        assert!(resolution.developer.is_some());
    }

    #[tokio::test]
    async fn test_ambiguous_intent_keeps_everything() {
        let mut resolution = Resolution {
            product: Some(record("Marina Heights")),
            project: Some(record("Palm Gardens")),
            ..Resolution::default()
        };
        let intent = detect_intent("marina");
        resolution.enforce_exclusive_intent(&intent);
        assert!(resolution.product.is_some());
        assert!(resolution.project.is_some());
    }
}
