//! Coarse intent detection from surface keywords.

use std::sync::LazyLock;

use regex::Regex;

static PRODUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bproducts?\b").expect("Invalid product regex"));
static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bprojects?\b").expect("Invalid project regex"));
static DEVELOPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdevelopers?\b").expect("Invalid developer regex"));

/// What the message appears to be asking about.
///
/// Exactly one keyword group present yields a non-ambiguous want for that
/// kind; zero or more than one group yields `ambiguous`, which makes the
/// resolver attempt every kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub wants_product: bool,
    pub wants_project: bool,
    pub wants_developer: bool,
    pub ambiguous: bool,
}

/// Derive the intent from lowercased pivot-language text.
pub fn detect_intent(text: &str) -> Intent {
    let has_product = PRODUCT_RE.is_match(text);
    let has_project = PROJECT_RE.is_match(text);
    let has_developer = DEVELOPER_RE.is_match(text);

    let wants_product = has_product && !has_project && !has_developer;
    let wants_project = has_project && !has_product && !has_developer;
    let wants_developer = has_developer && !has_product && !has_project;
    let ambiguous = (!has_product && !has_project && !has_developer)
        || (has_product && has_project)
        || (has_developer && (has_product || has_project));

    Intent {
        wants_product,
        wants_project,
        wants_developer,
        ambiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_product() {
        let intent = detect_intent("show me a product in the marina");
        assert!(intent.wants_product);
        assert!(!intent.wants_project);
        assert!(!intent.wants_developer);
        assert!(!intent.ambiguous);
    }

    #[test]
    fn test_wants_product_plural() {
        assert!(detect_intent("any products left").wants_product);
    }

    #[test]
    fn test_wants_project() {
        let intent = detect_intent("details of the project");
        assert!(intent.wants_project);
        assert!(!intent.ambiguous);
    }

    #[test]
    fn test_wants_developer() {
        let intent = detect_intent("which developer built this");
        assert!(intent.wants_developer);
        assert!(!intent.ambiguous);
    }

    #[test]
    fn test_no_keywords_is_ambiguous() {
        let intent = detect_intent("marina heights");
        assert!(intent.ambiguous);
        assert!(!intent.wants_product);
        assert!(!intent.wants_project);
        assert!(!intent.wants_developer);
    }

    #[test]
    fn test_two_keywords_is_ambiguous() {
        let intent = detect_intent("products and projects");
        assert!(intent.ambiguous);
        assert!(!intent.wants_product);
        assert!(!intent.wants_project);
    }

    #[test]
    fn test_all_keywords_is_ambiguous() {
        let intent = detect_intent("products projects developers");
        assert!(intent.ambiguous);
    }

    #[test]
    fn test_developer_with_product_is_ambiguous() {
        let intent = detect_intent("the developer of this product");
        assert!(intent.ambiguous);
        assert!(!intent.wants_developer);
    }

    #[test]
    fn test_word_boundaries() {
        // "production" and "projector" must not count.
        let intent = detect_intent("production of a projector");
        assert!(intent.ambiguous);
        assert!(!intent.wants_product);
        assert!(!intent.wants_project);
    }

    #[test]
    fn test_idempotent() {
        let text = "list projects";
        assert_eq!(detect_intent(text), detect_intent(text));
    }

    #[test]
    fn test_empty_text_is_ambiguous() {
        assert!(detect_intent("").ambiguous);
    }
}
