//! Pipeline result types.

use serde::{Deserialize, Serialize};

use crestline_core::types::{EntityLink, NormalizedEntity};

/// The result of one chat turn.
///
/// `reply` is `None` when a single catalog entity answered the message
/// directly; the entity then appears in its scalar slot and in the
/// corresponding list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub reply: Option<String>,
    pub product: Option<NormalizedEntity>,
    pub project: Option<NormalizedEntity>,
    pub developer: Option<NormalizedEntity>,
    pub user: Option<NormalizedEntity>,
    pub products: Vec<NormalizedEntity>,
    pub projects: Vec<NormalizedEntity>,
    pub developers: Vec<NormalizedEntity>,
    pub links: Vec<EntityLink>,
    pub user_language: String,
}

impl ChatOutcome {
    /// A plain text reply with no entity payload.
    pub fn text(reply: impl Into<String>, user_language: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            user_language: user_language.into(),
            ..Self::default()
        }
    }
}

/// The result of one audio chat turn.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioOutcome {
    pub outcome: ChatOutcome,
    /// The transcribed user message.
    pub user_message: String,
    /// Synthesized reply audio.
    pub audio: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_outcome() {
        let outcome = ChatOutcome::text("hello", "en");
        assert_eq!(outcome.reply.as_deref(), Some("hello"));
        assert_eq!(outcome.user_language, "en");
        assert!(outcome.products.is_empty());
        assert!(outcome.product.is_none());
        assert!(outcome.links.is_empty());
    }

    #[test]
    fn test_default_outcome_has_no_reply() {
        let outcome = ChatOutcome::default();
        assert!(outcome.reply.is_none());
        assert!(outcome.user_language.is_empty());
    }
}
