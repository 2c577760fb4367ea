//! The chat pipeline: preprocess, detect, route, resolve, generate,
//! finalize.
//!
//! One request flows through sequentially; nothing survives the request
//! except the conversation name store and the company-info cache. All
//! collaborator failures abort the request; canned routes that need no
//! collaborator can never fail upstream.

use std::sync::Arc;
use std::time::Duration;

use crestline_core::config::CrestlineConfig;
use crestline_core::types::{EntityKind, EntityRecord, NormalizedEntity, Turn};
use crestline_lang::{LanguageService, PIVOT_LANG};
use crestline_llm::ChatModel;
use crestline_speech::{tts_language_code, SpeechService};
use crestline_store::{EntityStore, ListQuery};

use crate::classify::{self, Route, RouteInput};
use crate::context::{
    dedupe_by_name, digest, normalize, sample_entities, structured_links, CompanyInfoCache,
    relevant_company_info,
};
use crate::error::ChatError;
use crate::finalize::{append_extras, translate_back};
use crate::intent::detect_intent;
use crate::memory::NameStore;
use crate::preprocess::preprocess;
use crate::prompt::{build_system_prompt, fetch_prompt_context, model_turns};
use crate::replies;
use crate::resolve::resolve_entities;
use crate::types::{AudioOutcome, ChatOutcome};

/// The conversational pipeline, generalized over every catalog kind.
pub struct ChatPipeline {
    store: Arc<dyn EntityStore>,
    language: Arc<dyn LanguageService>,
    model: Arc<dyn ChatModel>,
    speech: Arc<dyn SpeechService>,
    names: NameStore,
    company_cache: CompanyInfoCache,
    config: CrestlineConfig,
}

impl ChatPipeline {
    pub fn new(
        config: CrestlineConfig,
        store: Arc<dyn EntityStore>,
        language: Arc<dyn LanguageService>,
        model: Arc<dyn ChatModel>,
        speech: Arc<dyn SpeechService>,
    ) -> Self {
        let names = NameStore::new(
            Duration::from_secs(config.memory.name_ttl_secs),
            config.memory.name_capacity,
        );
        let company_cache =
            CompanyInfoCache::new(Duration::from_secs(config.chat.company_cache_ttl_secs));
        Self {
            store,
            language,
            model,
            speech,
            names,
            company_cache,
            config,
        }
    }

    /// Handle one chat message.
    pub async fn handle_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
        history: &[Turn],
    ) -> Result<ChatOutcome, ChatError> {
        let trimmed = message.trim();
        let processed = preprocess(
            message,
            self.config.chat.max_message_chars,
            &self.config.moderation.forbidden_keywords,
        )?;

        let user_language = self
            .language
            .detect(trimmed)
            .await?
            .unwrap_or_else(|| PIVOT_LANG.to_string());

        let pivot = if user_language != PIVOT_LANG {
            self.language.translate(&processed, PIVOT_LANG).await?
        } else {
            processed.clone()
        };

        tracing::debug!(user_language = %user_language, "Message preprocessed");

        if let Some(route) = classify::route(&RouteInput {
            pivot: &pivot,
            original: trimmed,
        }) {
            tracing::debug!(route = ?route, "Short-circuit route matched");
            return self.handle_route(route, &pivot, conversation_id, &user_language).await;
        }

        let intent = detect_intent(&pivot);
        let mut resolution = resolve_entities(
            self.store.as_ref(),
            &processed,
            &pivot,
            &intent,
            self.config.capabilities.users,
        )
        .await?;
        resolution.enforce_exclusive_intent(&intent);

        // A single strong match answers directly, skipping the model.
        for (kind, record) in [
            (EntityKind::Product, resolution.product.as_ref()),
            (EntityKind::Project, resolution.project.as_ref()),
            (EntityKind::Developer, resolution.developer.as_ref()),
        ] {
            if let Some(record) = record.filter(|r| r.id.is_some()) {
                return Ok(self.direct_entity_outcome(kind, record, &user_language));
            }
        }

        // Example lists for featured queries or unmatched kind intents.
        let mut example_products: Vec<NormalizedEntity> = Vec::new();
        let mut example_projects: Vec<NormalizedEntity> = Vec::new();
        if (classify::is_featured_products_query(&pivot) || intent.wants_product)
            && resolution.product.is_none()
        {
            let samples = sample_entities(
                self.store.as_ref(),
                EntityKind::Product,
                self.config.chat.sample_limit,
            )
            .await?;
            example_products = samples
                .iter()
                .map(|r| self.normalize(r, EntityKind::Product))
                .collect();
        }
        if (classify::is_featured_projects_query(&pivot) || intent.wants_project)
            && resolution.project.is_none()
        {
            let samples = sample_entities(
                self.store.as_ref(),
                EntityKind::Project,
                self.config.chat.sample_limit,
            )
            .await?;
            example_projects = samples
                .iter()
                .map(|r| self.normalize(r, EntityKind::Project))
                .collect();
        }

        // Contextual reply through the model.
        let mut context_parts: Vec<String> = Vec::new();
        let digest_chars = self.config.chat.description_digest_chars;
        for (kind, record) in [
            (EntityKind::Product, resolution.product.as_ref()),
            (EntityKind::Project, resolution.project.as_ref()),
            (EntityKind::Developer, resolution.developer.as_ref()),
            (EntityKind::User, resolution.user.as_ref()),
        ] {
            if let Some(record) = record {
                context_parts.push(digest(record, kind, digest_chars));
            }
        }
        if !example_products.is_empty() {
            let names: Vec<&str> = example_products.iter().map(|p| p.name.as_str()).collect();
            context_parts.push(format!("Example available products: {}.", names.join(", ")));
        }
        if !example_projects.is_empty() {
            let names: Vec<&str> = example_projects.iter().map(|p| p.name.as_str()).collect();
            context_parts.push(format!("Example available projects: {}.", names.join(", ")));
        }
        let entity_context = context_parts.join(" ");

        let resolved_links: Vec<(EntityKind, NormalizedEntity)> = [
            (EntityKind::Product, resolution.product.as_ref()),
            (EntityKind::Project, resolution.project.as_ref()),
            (EntityKind::Developer, resolution.developer.as_ref()),
            (EntityKind::User, resolution.user.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, record)| {
            record
                .filter(|r| r.id.is_some())
                .map(|r| (kind, self.normalize(r, kind)))
        })
        .collect();
        let link_refs: Vec<(EntityKind, &NormalizedEntity)> = resolved_links
            .iter()
            .map(|(kind, entity)| (*kind, entity))
            .collect();
        let links = structured_links(&link_refs);

        let wants_pricing = classify::is_pricing_query(&pivot);
        let wants_location = classify::is_location_availability_query(&pivot);
        let contact_info = wants_pricing.then(|| replies::pricing_contact_line(&self.config.company));
        let location_info = wants_location
            .then(|| replies::location_availability_line(&self.config.company, &user_language));

        let prompt_context =
            fetch_prompt_context(self.store.as_ref(), self.config.chat.prompt_records).await?;
        let system_prompt =
            build_system_prompt(&self.config.company, &self.config.chat, &prompt_context);
        let turns = model_turns(history, &pivot);

        let completion = self
            .model
            .complete(&system_prompt, &turns)
            .await?
            .ok_or(ChatError::EmptyCompletion)?;

        let assembled = append_extras(
            &completion,
            &entity_context,
            &links,
            contact_info.as_deref(),
            location_info.as_deref(),
        );
        let reply =
            translate_back(self.language.as_ref(), assembled, &user_language).await?;

        Ok(ChatOutcome {
            reply: Some(reply),
            links,
            user_language,
            ..ChatOutcome::default()
        })
    }

    /// Handle one audio message: transcribe, delegate, synthesize.
    pub async fn handle_audio(
        &self,
        audio: &[u8],
        conversation_id: Option<&str>,
        history: &[Turn],
    ) -> Result<AudioOutcome, ChatError> {
        let user_message = self.speech.transcribe(audio).await?;
        if user_message.trim().is_empty() {
            return Err(ChatError::EmptyTranscription);
        }
        tracing::debug!(chars = user_message.len(), "Audio transcribed");

        let outcome = self
            .handle_message(&user_message, conversation_id, history)
            .await?;

        // Direct entity hits have no text reply; speak the entity instead.
        let speakable = outcome.reply.clone().unwrap_or_else(|| {
            [&outcome.product, &outcome.project, &outcome.developer]
                .into_iter()
                .flatten()
                .next()
                .map(|e| format!("{}. {}", e.name, e.description))
                .unwrap_or_default()
        });

        let audio_reply = if speakable.is_empty() {
            Vec::new()
        } else {
            self.speech
                .synthesize(&speakable, tts_language_code(&outcome.user_language))
                .await?
        };

        Ok(AudioOutcome {
            outcome,
            user_message,
            audio: audio_reply,
        })
    }

    // -- Private helpers --

    fn normalize(&self, record: &EntityRecord, kind: EntityKind) -> NormalizedEntity {
        normalize(record, kind, &self.config.company.site_base_url)
    }

    fn direct_entity_outcome(
        &self,
        kind: EntityKind,
        record: &EntityRecord,
        user_language: &str,
    ) -> ChatOutcome {
        let entity = self.normalize(record, kind);
        let links = structured_links(&[(kind, &entity)]);
        let mut outcome = ChatOutcome {
            reply: None,
            links,
            user_language: user_language.to_string(),
            ..ChatOutcome::default()
        };
        match kind {
            EntityKind::Product => {
                outcome.products = vec![entity.clone()];
                outcome.product = Some(entity);
            }
            EntityKind::Project => {
                outcome.projects = vec![entity.clone()];
                outcome.project = Some(entity);
            }
            EntityKind::Developer => {
                outcome.developers = vec![entity.clone()];
                outcome.developer = Some(entity);
            }
            EntityKind::User => {
                outcome.user = Some(entity);
            }
        }
        outcome
    }

    async fn handle_route(
        &self,
        route: Route,
        pivot: &str,
        conversation_id: Option<&str>,
        user_language: &str,
    ) -> Result<ChatOutcome, ChatError> {
        let company = &self.config.company;
        match route {
            Route::CompanyContact => Ok(ChatOutcome::text(
                replies::contact_reply(company, user_language),
                user_language,
            )),
            Route::CompanyOwnership => {
                let mut reply = replies::ownership_reply(company);
                if user_language != PIVOT_LANG {
                    reply = self.language.translate(&reply, user_language).await?;
                }
                Ok(ChatOutcome::text(reply, user_language))
            }
            Route::CompanyInfo => {
                // Degrade to the configured blurb when the capability is
                // off or the store is unreachable; this route must not
                // fail on upstream errors.
                let sections = if self.config.capabilities.company_info {
                    match self.company_cache.sections(self.store.as_ref()).await {
                        Ok(sections) => relevant_company_info(
                            &sections,
                            pivot,
                            self.config.chat.company_sections,
                        ),
                        Err(e) => {
                            tracing::warn!(error = %e, "Company info unavailable");
                            Vec::new()
                        }
                    }
                } else {
                    Vec::new()
                };
                Ok(ChatOutcome::text(
                    replies::company_info_reply(&sections, company),
                    user_language,
                ))
            }
            Route::Time => Ok(ChatOutcome::text(replies::time_reply(company), user_language)),
            Route::Identity => Ok(ChatOutcome::text(
                replies::identity_reply(company),
                user_language,
            )),
            Route::NameDeclaration(name) | Route::NameIntroduction(name) => {
                if let Some(id) = conversation_id {
                    self.names.remember(id, &name);
                }
                Ok(ChatOutcome::text(
                    replies::name_declared_reply(&name),
                    user_language,
                ))
            }
            Route::NameQuery => {
                let reply = conversation_id
                    .and_then(|id| self.names.recall(id))
                    .map(|name| replies::name_known_reply(&name))
                    .unwrap_or_else(|| replies::name_unknown_reply().to_string());
                Ok(ChatOutcome::text(reply, user_language))
            }
            Route::ListProducts => self.list_outcome(EntityKind::Product, user_language).await,
            Route::ListProjects => self.list_outcome(EntityKind::Project, user_language).await,
            Route::ListDevelopers => self.list_outcome(EntityKind::Developer, user_language).await,
            Route::BestOf(kind) => Ok(ChatOutcome::text(
                replies::best_of_reply(kind),
                user_language,
            )),
        }
    }

    async fn list_outcome(
        &self,
        kind: EntityKind,
        user_language: &str,
    ) -> Result<ChatOutcome, ChatError> {
        let records = self
            .store
            .find(kind, &ListQuery::all(self.config.chat.list_limit))
            .await?;

        if records.is_empty() {
            let mut reply = replies::empty_list_reply(kind, user_language);
            if user_language != PIVOT_LANG && user_language != "ar" {
                reply = self.language.translate(&reply, user_language).await?;
            }
            return Ok(ChatOutcome::text(reply, user_language));
        }

        let mut entities: Vec<NormalizedEntity> =
            records.iter().map(|r| self.normalize(r, kind)).collect();

        if user_language != PIVOT_LANG {
            for entity in &mut entities {
                entity.name = self.language.translate(&entity.name, user_language).await?;
                entity.description = self
                    .language
                    .translate(&entity.description, user_language)
                    .await?;
            }
        }

        let entities = dedupe_by_name(entities);
        let reply = replies::list_reply(kind, &entities, user_language);

        let mut outcome = ChatOutcome::text(reply, user_language);
        match kind {
            EntityKind::Product => outcome.products = entities,
            EntityKind::Project => outcome.projects = entities,
            EntityKind::Developer => outcome.developers = entities,
            EntityKind::User => {}
        }
        Ok(outcome)
    }
}

// =============================================================================
// Tests
// =============================================================================
