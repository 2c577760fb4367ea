//! Response finalization: fixed-order reply augmentation and
//! translation back to the user's language.

use crestline_core::types::EntityLink;
use crestline_lang::{LanguageService, PIVOT_LANG};

use crate::error::ChatError;

/// Render structured links as a single `label: url` line.
pub fn links_text(links: &[EntityLink]) -> String {
    links
        .iter()
        .map(|l| format!("{}: {}", l.label, l.url))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Append the optional extras to a model reply, in fixed order: entity
/// context, links, pricing contact, location availability.
pub fn append_extras(
    reply: &str,
    entity_context: &str,
    links: &[EntityLink],
    contact_info: Option<&str>,
    location_info: Option<&str>,
) -> String {
    let mut out = reply.to_string();
    if !entity_context.is_empty() {
        out.push('\n');
        out.push_str(entity_context);
    }
    if !links.is_empty() {
        out.push_str("\nLinks: ");
        out.push_str(&links_text(links));
    }
    if let Some(contact) = contact_info {
        out.push('\n');
        out.push_str(contact);
    }
    if let Some(location) = location_info {
        out.push('\n');
        out.push_str(location);
    }
    out
}

/// Translate a finished reply back to the user's language when it is not
/// the pivot.
pub async fn translate_back(
    language: &dyn LanguageService,
    reply: String,
    user_language: &str,
) -> Result<String, ChatError> {
    if user_language == PIVOT_LANG {
        return Ok(reply);
    }
    Ok(language.translate(&reply, user_language).await?)
}

// =============================================================================
// Tests
// =============================================================================
