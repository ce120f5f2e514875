//! Chat orchestrator: drives one question through prompt construction,
//! generation, exercise matching and image resolution.
//!
//! Turns are strictly sequential: [`Orchestrator::handle_turn`] takes
//! `&mut self`, so a session can never have two generation calls in flight.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use repcoach_core::config::RepcoachConfig;
use repcoach_core::types::Exercise;

use crate::catalog::{CatalogSource, ExerciseCatalog};
use crate::error::ChatError;
use crate::matcher::{NameMatcher, SubstringMatcher};
use crate::media::{MediaFetcher, MediaResolver, ResolvedImage};
use crate::prompt::{PromptBuilder, PromptTemplate};
use crate::recommender::Recommender;
use crate::session::SessionContext;
use crate::state_machine::TurnState;
use crate::trigger::ImageTrigger;

/// Result of one completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Generated response text.
    pub answer: String,
    /// Catalog exercise the answer is about, if any.
    pub exercise: Option<Exercise>,
    /// Zero, one or two step images.
    pub images: Vec<ResolvedImage>,
}

/// Central coordinator for a single chat session.
pub struct Orchestrator {
    catalog: ExerciseCatalog,
    context: SessionContext,
    prompt_builder: PromptBuilder,
    recommender: Arc<dyn Recommender>,
    matcher: Box<dyn NameMatcher>,
    trigger: ImageTrigger,
    media: MediaResolver,
    media_fetcher: Arc<dyn MediaFetcher>,
    max_question_length: usize,
}

impl Orchestrator {
    /// Load the catalog and open a session.
    ///
    /// Fails with `CatalogUnavailable` before any question is accepted when
    /// the catalog cannot be loaded.
    pub async fn start(
        config: &RepcoachConfig,
        catalog_source: &dyn CatalogSource,
        recommender: Arc<dyn Recommender>,
        media_fetcher: Arc<dyn MediaFetcher>,
    ) -> Result<Self, ChatError> {
        let catalog = ExerciseCatalog::load(catalog_source).await?;
        Self::new(config, catalog, recommender, media_fetcher)
    }

    /// Open a session over an already loaded catalog.
    pub fn new(
        config: &RepcoachConfig,
        catalog: ExerciseCatalog,
        recommender: Arc<dyn Recommender>,
        media_fetcher: Arc<dyn MediaFetcher>,
    ) -> Result<Self, ChatError> {
        if catalog.is_empty() {
            return Err(ChatError::CatalogUnavailable(
                "cannot start a session with an empty catalog".to_string(),
            ));
        }
        let prompt_builder = PromptBuilder::new(PromptTemplate::v1());
        prompt_builder.template().validate()?;

        let context = SessionContext::new();
        info!(session = %context.id, exercises = catalog.len(), "Chat session started");

        Ok(Self {
            catalog,
            context,
            prompt_builder,
            recommender,
            matcher: Box::new(SubstringMatcher),
            trigger: ImageTrigger,
            media: MediaResolver::new(&config.media),
            media_fetcher,
            max_question_length: config.chat.max_question_length,
        })
    }

    /// Replace the exercise matcher.
    pub fn with_matcher(mut self, matcher: Box<dyn NameMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Replace the prompt template.
    pub fn with_prompt_template(mut self, template: PromptTemplate) -> Result<Self, ChatError> {
        template.validate()?;
        self.prompt_builder = PromptBuilder::new(template);
        Ok(self)
    }

    /// Replace the media resolver.
    pub fn with_media_resolver(mut self, media: MediaResolver) -> Self {
        self.media = media;
        self
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &SessionContext {
        &self.context
    }

    /// Start a new conversation over the same catalog.
    pub fn reset_session(&mut self) {
        self.context.reset();
        info!(session = %self.context.id, "Chat session reset");
    }

    /// Run one question to completion.
    ///
    /// On success the question and answer are appended to the history, in
    /// that order. On any error the history is left untouched.
    pub async fn handle_turn(&mut self, question: &str) -> Result<TurnOutcome, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        if question.chars().count() > self.max_question_length {
            return Err(ChatError::QuestionTooLong(self.max_question_length));
        }

        // A dropped handle_turn future leaves the machine mid-turn.
        if self.context.state() != TurnState::Idle {
            warn!(state = ?self.context.state(), "Discarding unfinished turn");
            self.context.abandon_turn();
        }

        let request =
            self.prompt_builder
                .build(question, &self.catalog, self.context.history().turns());
        debug!(
            template_version = request.template_version,
            prompt_chars = request.text.len(),
            history_turns = self.context.history().len(),
            "Prompt built"
        );

        self.context.advance(TurnState::AwaitingGeneration)?;
        let answer = match self.recommender.generate(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(session = %self.context.id, error = %e, "Turn failed");
                self.context.advance(TurnState::Failed)?;
                self.context.advance(TurnState::Idle)?;
                return Err(e);
            }
        };

        self.context.advance(TurnState::ImageDecision)?;
        let exercise = self.matcher.extract(&answer, &self.catalog).cloned();
        let wants_images = self.trigger.should_show_images(question);
        debug!(
            matched = exercise.as_ref().map(|e| e.key.as_str()),
            wants_images,
            "Image decision"
        );

        let images = match (&exercise, wants_images) {
            (Some(exercise), true) => {
                self.media
                    .resolve(self.media_fetcher.as_ref(), exercise)
                    .await
            }
            _ => Vec::new(),
        };

        self.context.advance(TurnState::Complete)?;
        self.context.commit(question, &answer)?;
        self.context.advance(TurnState::Idle)?;

        Ok(TurnOutcome {
            answer,
            exercise,
            images,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
