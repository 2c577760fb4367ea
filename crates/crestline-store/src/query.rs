//! Query shapes accepted by the document-store seam.

use crestline_core::types::{EntityRecord, TextField};

/// A case-insensitive text pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum TextMatch {
    /// The whole field equals the value.
    Exact(String),
    /// The field contains the value as a substring.
    Contains(String),
}

impl TextMatch {
    /// Whether a field value satisfies this pattern.
    pub fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        match self {
            TextMatch::Exact(needle) => value == needle.to_lowercase(),
            TextMatch::Contains(needle) => value.contains(&needle.to_lowercase()),
        }
    }
}

/// A disjunctive field match: any listed field satisfying the pattern
/// selects the record.
#[derive(Clone, Debug)]
pub struct FieldQuery {
    pub fields: Vec<TextField>,
    pub pattern: TextMatch,
}

impl FieldQuery {
    pub fn new(fields: Vec<TextField>, pattern: TextMatch) -> Self {
        Self { fields, pattern }
    }

    /// Whether a record matches on any of the query's fields.
    pub fn matches(&self, record: &EntityRecord) -> bool {
        self.fields
            .iter()
            .filter_map(|f| record.field(*f))
            .any(|value| self.pattern.matches(value))
    }
}

/// Listing parameters for `find`.
#[derive(Clone, Debug)]
pub struct ListQuery {
    /// Restrict to records flagged as featured.
    pub featured_only: bool,
    /// Sort by creation time, newest first, instead of store order.
    pub newest_first: bool,
    /// Maximum records returned.
    pub limit: usize,
}

impl ListQuery {
    /// Plain listing in store order.
    pub fn all(limit: usize) -> Self {
        Self {
            featured_only: false,
            newest_first: false,
            limit,
        }
    }

    /// Featured records only, store order.
    pub fn featured(limit: usize) -> Self {
        Self {
            featured_only: true,
            newest_first: false,
            limit,
        }
    }

    /// Newest records first.
    pub fn newest(limit: usize) -> Self {
        Self {
            featured_only: false,
            newest_first: true,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crestline_core::types::{Locale, LocaleText};

    fn record(name: &str) -> EntityRecord {
        EntityRecord {
            name: LocaleText::english(name),
            ..EntityRecord::default()
        }
    }

    // ---- TextMatch ----

    #[test]
    fn test_exact_match_case_insensitive() {
        let m = TextMatch::Exact("Marina Heights".into());
        assert!(m.matches("marina heights"));
        assert!(m.matches("MARINA HEIGHTS"));
        assert!(!m.matches("marina heights tower"));
    }

    #[test]
    fn test_contains_match() {
        let m = TextMatch::Contains("marina".into());
        assert!(m.matches("Marina Heights"));
        assert!(m.matches("the marina district"));
        assert!(!m.matches("downtown"));
    }

    #[test]
    fn test_contains_empty_needle_matches_everything() {
        let m = TextMatch::Contains(String::new());
        assert!(m.matches("anything"));
    }

    // ---- FieldQuery ----

    #[test]
    fn test_field_query_matches_any_field() {
        let mut rec = record("Marina Heights");
        rec.name.ar = Some("مرتفعات المارينا".into());

        let q = FieldQuery::new(
            vec![TextField::Name(Locale::Ar)],
            TextMatch::Contains("المارينا".into()),
        );
        assert!(q.matches(&rec));
    }

    #[test]
    fn test_field_query_skips_absent_fields() {
        let rec = record("Marina Heights");
        let q = FieldQuery::new(
            vec![TextField::Name(Locale::De), TextField::Name(Locale::En)],
            TextMatch::Exact("marina heights".into()),
        );
        assert!(q.matches(&rec));
    }

    #[test]
    fn test_field_query_no_match() {
        let rec = record("Marina Heights");
        let q = FieldQuery::new(
            vec![TextField::Name(Locale::En)],
            TextMatch::Exact("palm gardens".into()),
        );
        assert!(!q.matches(&rec));
    }

    // ---- ListQuery constructors ----

    #[test]
    fn test_list_query_constructors() {
        let all = ListQuery::all(10);
        assert!(!all.featured_only);
        assert!(!all.newest_first);
        assert_eq!(all.limit, 10);

        let featured = ListQuery::featured(4);
        assert!(featured.featured_only);

        let newest = ListQuery::newest(5);
        assert!(newest.newest_first);
        assert_eq!(newest.limit, 5);
    }
}
