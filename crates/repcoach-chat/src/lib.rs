//! Conversational exercise recommendations for RepCoach.
//!
//! Grounds every answer in the exercise catalog, delegates text generation
//! to an external language model, and decides when step images accompany
//! the reply.

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod media;
pub mod orchestrator;
pub mod prompt;
pub mod recommender;
pub mod session;
pub mod state_machine;
pub mod trigger;

pub use catalog::{CatalogSource, ExerciseCatalog, HttpCatalogClient};
pub use error::{ChatError, GenerationFailure};
pub use matcher::{NameMatcher, SubstringMatcher};
pub use media::{HttpMediaClient, MediaFetcher, MediaResolver, ResolvedImage};
pub use orchestrator::{Orchestrator, TurnOutcome};
pub use prompt::{PromptBuilder, PromptRequest, PromptTemplate};
pub use recommender::{OpenAiRecommender, Recommender};
pub use session::{ConversationSession, SessionContext};
pub use state_machine::{validate_transition, TurnState};
pub use trigger::ImageTrigger;
