//! Lexical preprocessing: validation, sanitization, and normalization.
//!
//! Raw input is validated (length, policy), stripped of script blocks,
//! lowercased, whitespace-collapsed, and run through an ordered table of
//! whole-word typo and slang corrections. The table is applied top to
//! bottom; later entries may re-correct the output of earlier ones, so
//! iteration order is part of the contract.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ChatError;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("Invalid script regex"));

/// Ordered whole-word corrections applied after lowercasing.
const CORRECTIONS: &[(&str, &str)] = &[
    // Domain typos
    ("propertie", "product"),
    ("properti", "product"),
    ("developr", "developer"),
    ("developrs", "developers"),
    ("projct", "project"),
    ("projcts", "projects"),
    ("dubaii", "dubai"),
    ("duba", "dubai"),
    ("developement", "development"),
    ("realestate", "real estate"),
    ("real-estate", "real estate"),
    ("apartmnt", "apartment"),
    ("apartmnts", "apartments"),
    ("vila", "villa"),
    ("vilas", "villas"),
    ("luxry", "luxury"),
    // Question words
    ("wat", "what"),
    ("wer", "where"),
    ("wen", "when"),
    ("wich", "which"),
    ("thier", "their"),
    ("ther", "there"),
    ("teh", "the"),
    ("adn", "and"),
    ("fo", "for"),
    ("frm", "from"),
    ("abt", "about"),
    // Chat slang
    ("pls", "please"),
    ("thx", "thanks"),
    ("u", "you"),
    ("r", "are"),
    ("2", "to"),
    ("4", "for"),
    ("b4", "before"),
    ("c", "see"),
    ("y", "why"),
    ("hv", "have"),
    ("wud", "would"),
    ("cud", "could"),
    ("shud", "should"),
    // Contractions without apostrophes
    ("dnt", "do not"),
    ("cnt", "cannot"),
    ("wont", "will not"),
    ("cant", "cannot"),
    ("im", "i am"),
    ("ive", "i have"),
    ("id", "i would"),
    ("ill", "i will"),
    ("theyre", "they are"),
    ("youre", "you are"),
    ("thats", "that is"),
    ("isnt", "is not"),
    ("arent", "are not"),
    ("werent", "were not"),
    ("dont", "do not"),
    ("doesnt", "does not"),
    ("didnt", "did not"),
    ("havent", "have not"),
    ("hasnt", "has not"),
    ("hadnt", "had not"),
    ("wouldnt", "would not"),
    ("couldnt", "could not"),
    ("shouldnt", "should not"),
    ("mightnt", "might not"),
    ("mustnt", "must not"),
];

static COMPILED_CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    CORRECTIONS
        .iter()
        .map(|(wrong, right)| {
            let pattern = format!(r"\b{}\b", regex::escape(wrong));
            (
                Regex::new(&pattern).expect("Invalid correction regex"),
                *right,
            )
        })
        .collect()
});

/// Whether the text contains any configured forbidden keyword
/// (case-insensitive substring match).
pub fn contains_forbidden(text: &str, forbidden: &[String]) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    forbidden
        .iter()
        .any(|keyword| !keyword.is_empty() && lower.contains(&keyword.to_lowercase()))
}

/// Validate and normalize raw user input.
///
/// Errors: `EmptyMessage` for empty/whitespace-only input,
/// `MessageTooLong` past `max_chars`, `ForbiddenKeyword` on a policy hit.
pub fn preprocess(
    raw: &str,
    max_chars: usize,
    forbidden: &[String],
) -> Result<String, ChatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if trimmed.chars().count() > max_chars {
        return Err(ChatError::MessageTooLong(max_chars));
    }
    if contains_forbidden(trimmed, forbidden) {
        return Err(ChatError::ForbiddenKeyword);
    }

    let sanitized = SCRIPT_RE.replace_all(trimmed, "");
    let mut processed = sanitized
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for (re, replacement) in COMPILED_CORRECTIONS.iter() {
        processed = re.replace_all(&processed, *replacement).into_owned();
    }

    Ok(processed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str) -> String {
        preprocess(raw, 1000, &[]).unwrap()
    }

    // ---- Validation ----

    #[test]
    fn test_empty_message_rejected() {
        assert!(matches!(
            preprocess("", 1000, &[]),
            Err(ChatError::EmptyMessage)
        ));
    }

    #[test]
    fn test_whitespace_only_rejected() {
        assert!(matches!(
            preprocess("   \n\t ", 1000, &[]),
            Err(ChatError::EmptyMessage)
        ));
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "a".repeat(1001);
        assert!(matches!(
            preprocess(&long, 1000, &[]),
            Err(ChatError::MessageTooLong(1000))
        ));
    }

    #[test]
    fn test_exactly_max_length_ok() {
        let msg = "a".repeat(1000);
        assert!(preprocess(&msg, 1000, &[]).is_ok());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 500 Arabic characters are 1000 bytes but well under 1000 chars.
        let msg = "م".repeat(500);
        assert!(preprocess(&msg, 1000, &[]).is_ok());
    }

    // ---- Policy ----

    #[test]
    fn test_forbidden_keyword_rejected() {
        let forbidden = vec!["casino".to_string()];
        assert!(matches!(
            preprocess("best casino in dubai", 1000, &forbidden),
            Err(ChatError::ForbiddenKeyword)
        ));
    }

    #[test]
    fn test_forbidden_keyword_case_insensitive() {
        let forbidden = vec!["casino".to_string()];
        assert!(matches!(
            preprocess("best CASINO here", 1000, &forbidden),
            Err(ChatError::ForbiddenKeyword)
        ));
    }

    #[test]
    fn test_forbidden_is_substring_match() {
        let forbidden = vec!["bet".to_string()];
        // "betting" contains "bet"
        assert!(matches!(
            preprocess("betting on projects", 1000, &forbidden),
            Err(ChatError::ForbiddenKeyword)
        ));
    }

    #[test]
    fn test_no_forbidden_keywords_passes() {
        let forbidden = vec!["casino".to_string()];
        assert!(preprocess("list projects", 1000, &forbidden).is_ok());
    }

    #[test]
    fn test_contains_forbidden_empty_list() {
        assert!(!contains_forbidden("anything", &[]));
    }

    // ---- Sanitization ----

    #[test]
    fn test_strips_script_blocks() {
        let out = run("hello <script>alert('x')</script> world");
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_strips_script_blocks_case_insensitive() {
        let out = run("a <SCRIPT src='x'>bad()</SCRIPT> b");
        assert_eq!(out, "a b");
    }

    #[test]
    fn test_strips_multiline_script() {
        let out = run("before <script>\nline1\nline2\n</script> after");
        assert_eq!(out, "before after");
    }

    // ---- Normalization ----

    #[test]
    fn test_lowercases() {
        assert_eq!(run("LIST Projects"), "list projects");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(run("list    projects\n\tnow"), "list projects now");
    }

    #[test]
    fn test_trims() {
        assert_eq!(run("  list projects  "), "list projects");
    }

    // ---- Corrections ----

    #[test]
    fn test_corrects_domain_typos() {
        assert_eq!(run("projcts in dubaii"), "projects in dubai");
        assert_eq!(run("luxry vila"), "luxury villa");
        assert_eq!(run("apartmnts"), "apartments");
    }

    #[test]
    fn test_corrects_slang() {
        assert_eq!(run("pls show me"), "please show me");
        assert_eq!(run("thx"), "thanks");
    }

    #[test]
    fn test_corrects_single_letter_slang() {
        assert_eq!(run("r u there"), "are you there");
        assert_eq!(run("c y"), "see why");
    }

    #[test]
    fn test_corrects_digit_slang() {
        assert_eq!(run("2 the marina"), "to the marina");
        assert_eq!(run("4 sale"), "for sale");
        assert_eq!(run("b4 friday"), "before friday");
    }

    #[test]
    fn test_corrects_contractions() {
        assert_eq!(run("i dont know"), "i do not know");
        assert_eq!(run("im interested"), "i am interested");
        assert_eq!(run("cant find it"), "cannot find it");
    }

    #[test]
    fn test_whole_word_only() {
        // "u" inside "dubai" must not be replaced.
        assert_eq!(run("dubai"), "dubai");
        // "r" inside "marina" must not be replaced.
        assert_eq!(run("marina"), "marina");
    }

    #[test]
    fn test_corrections_apply_after_lowercasing() {
        assert_eq!(run("IM HERE"), "i am here");
    }

    #[test]
    fn test_realestate_expands() {
        assert_eq!(run("realestate agents"), "real estate agents");
    }

    // ---- Idempotence on clean input ----

    #[test]
    fn test_clean_input_unchanged() {
        assert_eq!(run("show me available projects"), "show me available projects");
    }

    #[test]
    fn test_arabic_passes_through() {
        assert_eq!(run("اعرض المشاريع"), "اعرض المشاريع");
    }
}
