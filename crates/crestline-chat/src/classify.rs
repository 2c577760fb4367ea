//! Message classifiers and the short-circuit route chain.
//!
//! Every classifier is a stateless predicate over the pivot-language
//! (English) text. Routing is an explicit ordered table of matchers with
//! first-match-wins semantics: the first route that matches produces a
//! canned or templated reply and skips everything downstream, including
//! the model.

use std::sync::LazyLock;

use regex::Regex;

use crestline_core::types::EntityKind;

// =============================================================================
// Compiled pattern sets (compiled once, reused across calls)
// =============================================================================

static COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:about (?:the )?company|about your company|company info(?:rmation)?|what do you do|what is your business|tell me about (?:the|your) company|what services do you offer|what do you offer|your services|business hours|where are you located|your address|head office|who owns|who is the owner|who is the ceo|founder|your history|your background|contact (?:you|info|information|details)|how (?:do|can) i (?:contact|reach) you)\b",
    )
    .expect("Invalid company regex")
});

static CONTACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:contact|phone|call|whatsapp|email|e-mail|reach you)\b",
    )
    .expect("Invalid contact regex")
});

static OWNERSHIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:who owns|who is the owner|who is the ceo|founder|who founded)\b")
        .expect("Invalid ownership regex")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:what(?:'|’)?s|tell me|show|whats|what is)?\s*(?:the )?(?:current )?\b(?:time|clock)\b")
        .expect("Invalid time regex")
});

static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:what(?:'|’)?s your name|who are you|what are you called)\b")
        .expect("Invalid identity regex")
});

static NAME_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:my name is|i am|i'm|name's)\s+([A-Za-z\u{00C0}-\u{017F}]+)")
        .expect("Invalid name declaration regex")
});

static NAME_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:what(?:'|’)?s my name|do you know my name|what is my name)\b")
        .expect("Invalid name query regex")
});

static BARE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\u{00C0}-\u{017F}]+(?:\s+[A-Za-z\u{00C0}-\u{017F}]+)?$")
        .expect("Invalid bare name regex")
});

static USER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\buser\s*(?:name)?:\s*([^\n,?.!]+)").expect("Invalid user label regex")
});

static LIST_PRODUCTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:list|show|display|view|see|give me|what are|available|any)\b.*\bproducts\b|^\s*products\s*\??\s*$)",
    )
    .expect("Invalid list products regex")
});

static LIST_PROJECTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:list|show|display|view|see|give me|what are|available|any)\b.*\bprojects\b|^\s*projects\s*\??\s*$)",
    )
    .expect("Invalid list projects regex")
});

static LIST_DEVELOPERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:list|show|display|view|see|give me|what are|partner|any)\b.*\bdevelopers\b|^\s*developers\s*\??\s*$)",
    )
    .expect("Invalid list developers regex")
});

static FEATURED_PRODUCTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfeatured\b.*\bproducts?\b").expect("Invalid featured products regex")
});

static FEATURED_PROJECTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfeatured\b.*\bprojects?\b").expect("Invalid featured projects regex")
});

static BEST_OF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:best|top|most popular)\s+(projects|products|developers)(?:\s+(?:in\s+)?dubai)?\b")
        .expect("Invalid best-of regex")
});

static PRICING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:price|prices|pricing|cost|costs|how much|payment(?: plan)?|installments?|down payment|fees?)\b",
    )
    .expect("Invalid pricing regex")
});

static LOCATION_AVAILABILITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:availab(?:le|ility)|where (?:is|are)|located|schedule a (?:visit|viewing))\b",
    )
    .expect("Invalid location availability regex")
});

// =============================================================================
// Predicates
// =============================================================================

pub fn is_company_query(text: &str) -> bool {
    COMPANY_RE.is_match(text)
}

pub fn is_contact_query(text: &str) -> bool {
    CONTACT_RE.is_match(text)
}

pub fn is_ownership_query(text: &str) -> bool {
    OWNERSHIP_RE.is_match(text)
}

pub fn is_time_query(text: &str) -> bool {
    TIME_RE.is_match(text)
}

pub fn is_identity_query(text: &str) -> bool {
    IDENTITY_RE.is_match(text)
}

/// Extract a declared personal name ("my name is X", "i'm X").
///
/// Matched against the original-case text so the name keeps its casing.
pub fn name_declaration(text: &str) -> Option<String> {
    NAME_DECL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

pub fn is_name_query(text: &str) -> bool {
    NAME_QUERY_RE.is_match(text)
}

/// Whether the text is nothing but one or two alphabetic words.
pub fn is_bare_name(text: &str) -> bool {
    BARE_NAME_RE.is_match(text.trim())
}

/// Extract the value of a `user: X` / `user name: X` labeled mention.
pub fn user_label(text: &str) -> Option<String> {
    USER_LABEL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn is_list_products_query(text: &str) -> bool {
    LIST_PRODUCTS_RE.is_match(text)
}

pub fn is_list_projects_query(text: &str) -> bool {
    LIST_PROJECTS_RE.is_match(text)
}

pub fn is_list_developers_query(text: &str) -> bool {
    LIST_DEVELOPERS_RE.is_match(text)
}

pub fn is_featured_products_query(text: &str) -> bool {
    FEATURED_PRODUCTS_RE.is_match(text)
}

pub fn is_featured_projects_query(text: &str) -> bool {
    FEATURED_PROJECTS_RE.is_match(text)
}

/// The catalog kind named by a best-of query, if any.
pub fn best_of_query(text: &str) -> Option<EntityKind> {
    let caps = BEST_OF_RE.captures(text)?;
    match caps.get(1)?.as_str().to_lowercase().as_str() {
        "projects" => Some(EntityKind::Project),
        "products" => Some(EntityKind::Product),
        "developers" => Some(EntityKind::Developer),
        _ => None,
    }
}

pub fn is_pricing_query(text: &str) -> bool {
    PRICING_RE.is_match(text)
}

pub fn is_location_availability_query(text: &str) -> bool {
    LOCATION_AVAILABILITY_RE.is_match(text)
}

// =============================================================================
// Route chain
// =============================================================================

/// A short-circuit destination produced by the route chain.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    CompanyContact,
    CompanyOwnership,
    CompanyInfo,
    Time,
    Identity,
    /// The user declared their name in prose.
    NameDeclaration(String),
    /// The user introduced themselves via a `user:` label with a bare name.
    NameIntroduction(String),
    NameQuery,
    ListDevelopers,
    ListProducts,
    ListProjects,
    BestOf(EntityKind),
}

/// Inputs to the route chain: the pivot-language text for predicates and
/// the original-case text for name capture.
pub struct RouteInput<'a> {
    pub pivot: &'a str,
    pub original: &'a str,
}

type Matcher = for<'a> fn(&RouteInput<'a>) -> Option<Route>;

fn match_company_contact(input: &RouteInput) -> Option<Route> {
    (is_company_query(input.pivot) && is_contact_query(input.pivot))
        .then_some(Route::CompanyContact)
}

fn match_company_ownership(input: &RouteInput) -> Option<Route> {
    (is_company_query(input.pivot) && is_ownership_query(input.pivot))
        .then_some(Route::CompanyOwnership)
}

fn match_company_info(input: &RouteInput) -> Option<Route> {
    is_company_query(input.pivot).then_some(Route::CompanyInfo)
}

fn match_time(input: &RouteInput) -> Option<Route> {
    is_time_query(input.pivot).then_some(Route::Time)
}

fn match_identity(input: &RouteInput) -> Option<Route> {
    is_identity_query(input.pivot).then_some(Route::Identity)
}

fn match_name_declaration(input: &RouteInput) -> Option<Route> {
    name_declaration(input.original).map(Route::NameDeclaration)
}

fn match_name_introduction(input: &RouteInput) -> Option<Route> {
    user_label(input.original)
        .filter(|value| is_bare_name(value))
        .map(Route::NameIntroduction)
}

fn match_name_query(input: &RouteInput) -> Option<Route> {
    is_name_query(input.pivot).then_some(Route::NameQuery)
}

fn match_list_developers(input: &RouteInput) -> Option<Route> {
    is_list_developers_query(input.pivot).then_some(Route::ListDevelopers)
}

fn match_list_products(input: &RouteInput) -> Option<Route> {
    is_list_products_query(input.pivot).then_some(Route::ListProducts)
}

fn match_list_projects(input: &RouteInput) -> Option<Route> {
    is_list_projects_query(input.pivot).then_some(Route::ListProjects)
}

fn match_best_of(input: &RouteInput) -> Option<Route> {
    best_of_query(input.pivot).map(Route::BestOf)
}

/// The priority-ordered matcher table. The first `Some` wins.
const CHAIN: &[Matcher] = &[
    match_company_contact,
    match_company_ownership,
    match_company_info,
    match_time,
    match_identity,
    match_name_declaration,
    match_name_introduction,
    match_name_query,
    match_list_developers,
    match_list_products,
    match_list_projects,
    match_best_of,
];

/// Evaluate the route chain; `None` falls through to intent resolution.
pub fn route(input: &RouteInput) -> Option<Route> {
    CHAIN.iter().find_map(|matcher| matcher(input))
}

// =============================================================================
// Tests
// =============================================================================
