//! Prompt construction.
//!
//! The instruction text sent to the generation service is a versioned
//! [`PromptTemplate`]: fixed policy text with placeholders for the catalog
//! listing and the conversation. Rendering is a single pass, so catalog or
//! user text that happens to contain a placeholder is inserted verbatim.

use repcoach_core::types::ConversationTurn;

use crate::catalog::ExerciseCatalog;
use crate::error::ChatError;

/// Reply for math and off-topic questions.
pub const OFF_TOPIC_REFUSAL: &str =
    "Sorry, I can only assist with questions related to gym workouts and exercises.";

/// Reply for exercises missing from the catalog.
pub const UNKNOWN_EXERCISE_REFUSAL: &str =
    "Unfortunately, we don't provide information for this exercise.";

pub const CATALOG_PLACEHOLDER: &str = "{catalog}";
pub const CONVERSATION_PLACEHOLDER: &str = "{conversation}";

const POLICY_V1: &str = "\
You are a highly intelligent AI assistant and a fitness expert.
Your job is to recommend weekly workout sessions tailored to the user's preferences and goals.

Only answer questions about exercises and workout plans.
If the user asks a question outside the scope of exercises and workout plans, or something that looks like a math question (e.g., \"3+3\"), respond with: \"Sorry, I can only assist with questions related to gym workouts and exercises.\"
If the user asks about an exercise that is not in the list of exercises below, respond with: \"Unfortunately, we don't provide information for this exercise.\"

When recommending workout sessions, provide only the names of the exercises, with no detailed instructions.

For a weekly or monthly workout plan:
- Organize the plan by day, from Day 1 to Day 7 (e.g., Day 1: Exercise 1, Exercise 2, ...; Day 2: Rest day).
- Mark rest days explicitly (e.g., \"Day 3: Rest day\").
- Specify the number of repetitions for each exercise.
- Plans cover at most one month. If the user asks for a longer plan, politely explain the one-month limit and suggest repeating the same plan in later months while progressively increasing repetitions or weights.
- If the user has not stated their fitness level or the focus of the workout (e.g., strength, cardio), ask them to clarify before building the plan.

When the user asks about a specific exercise (e.g., \"Can you give me the instructions for Squats?\" or \"How to squat?\"):
- Give clear, detailed step-by-step instructions for that exercise.
- Make sure the user can perform it correctly and safely.

Respond in a friendly and motivational tone.

Use only the following list of exercise names:
{catalog}

Conversation:
{conversation}";

/// A versioned instruction template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub version: u32,
    text: &'static str,
}

impl PromptTemplate {
    /// The current policy template.
    pub const fn v1() -> Self {
        Self {
            version: 1,
            text: POLICY_V1,
        }
    }

    pub const fn new(version: u32, text: &'static str) -> Self {
        Self { version, text }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    /// Check that each placeholder occurs exactly once.
    pub fn validate(&self) -> Result<(), ChatError> {
        for placeholder in [CATALOG_PLACEHOLDER, CONVERSATION_PLACEHOLDER] {
            let count = self.text.matches(placeholder).count();
            if count != 1 {
                return Err(ChatError::Config(format!(
                    "prompt template v{} has {} occurrences of {}",
                    self.version, count, placeholder
                )));
            }
        }
        Ok(())
    }

    /// Substitute the placeholders in a single pass.
    pub fn render(&self, catalog: &str, conversation: &str) -> String {
        let mut out =
            String::with_capacity(self.text.len() + catalog.len() + conversation.len());
        let mut rest = self.text;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(CATALOG_PLACEHOLDER) {
                out.push_str(catalog);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(CONVERSATION_PLACEHOLDER) {
                out.push_str(conversation);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::v1()
    }
}

/// Fully rendered instruction text for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub template_version: u32,
    pub text: String,
}

/// Assembles the per-turn [`PromptRequest`].
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Render policy, full catalog listing, prior turns and the new question.
    pub fn build(
        &self,
        question: &str,
        catalog: &ExerciseCatalog,
        history: &[ConversationTurn],
    ) -> PromptRequest {
        PromptRequest {
            template_version: self.template.version,
            text: self
                .template
                .render(&catalog.listing(), &render_conversation(history, question)),
        }
    }
}

/// Prior turns as plain lines, then the question and the assistant cue.
fn render_conversation(history: &[ConversationTurn], question: &str) -> String {
    let mut lines: Vec<String> = history.iter().map(|t| t.text().to_string()).collect();
    lines.push(format!("User: {}", question));
    lines.push("AI:".to_string());
    lines.join("\n")
}
