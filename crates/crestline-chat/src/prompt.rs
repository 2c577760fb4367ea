//! System-prompt assembly and model-visible history filtering.

use crestline_core::config::{ChatConfig, CompanyConfig};
use crestline_core::types::{EntityKind, EntityRecord, Turn, TurnRole};
use crestline_llm::{ChatTurn, TurnRole as LlmRole};
use crestline_store::{EntityStore, ListQuery};

use crate::context::truncate_chars;
use crate::error::ChatError;

/// Replies the pipeline produced locally; they are filtered out of the
/// history passed to the model so templated text does not pollute its
/// context.
const CANNED_PREFIXES: &[&str] = &[
    "I'm sorry, but I don't have specific details about",
    "Company information:",
    "عذرًا، لا توجد تفاصيل",
];

/// Whether a prior turn is a canned/fallback reply.
pub fn is_canned_reply(text: &str) -> bool {
    CANNED_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

/// The newest records per kind, embedded into the system prompt.
#[derive(Debug, Default)]
pub struct PromptContext {
    pub products: Vec<EntityRecord>,
    pub projects: Vec<EntityRecord>,
    pub developers: Vec<EntityRecord>,
}

/// Fetch the newest `limit` records of each catalog kind.
pub async fn fetch_prompt_context(
    store: &dyn EntityStore,
    limit: usize,
) -> Result<PromptContext, ChatError> {
    Ok(PromptContext {
        products: store.find(EntityKind::Product, &ListQuery::newest(limit)).await?,
        projects: store.find(EntityKind::Project, &ListQuery::newest(limit)).await?,
        developers: store
            .find(EntityKind::Developer, &ListQuery::newest(limit))
            .await?,
    })
}

fn render_records(records: &[EntityRecord], empty_note: &str, max_desc: usize) -> String {
    if records.is_empty() {
        return empty_note.to_string();
    }
    records
        .iter()
        .map(|r| {
            let name = r.name.primary().unwrap_or("N/A");
            let alternates = [r.name.ar.as_deref(), r.name.de.as_deref(), r.name.fr.as_deref(), r.name.zh.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            let description = r
                .description
                .as_deref()
                .map(|d| truncate_chars(d, max_desc))
                .unwrap_or_else(|| "N/A".to_string());
            format!("- Name: {} ({})\n  Description: {}", name, alternates, description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the system prompt from live catalog content and the fixed
/// behavioral instructions.
pub fn build_system_prompt(
    company: &CompanyConfig,
    chat: &ChatConfig,
    context: &PromptContext,
) -> String {
    let max_desc = chat.prompt_description_chars;
    format!(
        "You are a friendly and professional real estate assistant for {company} in {city} called \"{agent}\".\n\
         \n\
         IMPORTANT DATABASE CONTEXT:\n\
         Here is the latest data directly fetched from our database:\n\
         \n\
         AVAILABLE PRODUCTS:\n{products}\n\
         \n\
         AVAILABLE PROJECTS:\n{projects}\n\
         \n\
         AVAILABLE DEVELOPERS:\n{developers}\n\
         \n\
         CRITICAL INSTRUCTIONS:\n\
         - For any question about products, projects, or developers, ALWAYS use the database context above.\n\
         - If the context contains relevant results, ONLY use those results in your answer. Do NOT invent, guess, or supplement with information not present in the context.\n\
         - If the context is empty or does not contain the requested information, politely say you do not have that information and suggest contacting {company} for more details.\n\
         - Never fabricate product, project, or developer names, details, or statistics.\n\
         \n\
         LANGUAGE SUPPORT:\n\
         - You MUST respond in the same language as the user's query (Arabic, English, German, French, or Chinese).\n\
         - For partial or incomplete queries, infer the complete meaning and answer helpfully.\n\
         \n\
         When asked your name, reply exactly: \"{agent}\".\n\
         When greeted, respond with a friendly greeting.\n\
         When asked about your mood, respond with a positive statement.\n\
         \n\
         Always provide accurate, helpful, and context-aware responses, and always respond in the user's language.",
        company = company.name,
        city = company.city,
        agent = company.agent_name,
        products = render_records(
            &context.products,
            "I'm sorry, I don't have the current database of available products at the moment.",
            max_desc,
        ),
        projects = render_records(
            &context.projects,
            "No projects currently available in database.",
            max_desc,
        ),
        developers = render_records(
            &context.developers,
            "I'm sorry, I don't have the specific developer information in my database at the moment.",
            max_desc,
        ),
    )
}

/// Build the model-visible turn list: filtered history plus the current
/// pivot-language user message.
///
/// Canned replies are dropped, blank turn content becomes `"..."`.
pub fn model_turns(history: &[Turn], pivot_message: &str) -> Vec<ChatTurn> {
    let mut turns: Vec<ChatTurn> = history
        .iter()
        .filter(|turn| !is_canned_reply(&turn.message))
        .map(|turn| ChatTurn {
            role: match turn.role {
                TurnRole::User => LlmRole::User,
                TurnRole::Assistant => LlmRole::Assistant,
            },
            content: if turn.message.trim().is_empty() {
                "...".to_string()
            } else {
                turn.message.clone()
            },
        })
        .collect();

    turns.push(ChatTurn {
        role: LlmRole::User,
        content: if pivot_message.trim().is_empty() {
            "...".to_string()
        } else {
            pivot_message.to_string()
        },
    });

    turns
}

// =============================================================================
// Tests
// =============================================================================
