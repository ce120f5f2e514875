//! Decides whether step images should accompany an answer.

/// Phrases (English and Indonesian) that ask for instructional visuals.
pub const TRIGGER_PHRASES: [&str; 3] = ["how to", "cara", "caranya"];

/// Case-insensitive trigger-phrase detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTrigger;

impl ImageTrigger {
    /// True when the question contains any trigger phrase.
    pub fn should_show_images(&self, question: &str) -> bool {
        let lower = question.to_lowercase();
        TRIGGER_PHRASES.iter().any(|phrase| lower.contains(phrase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_how_to_triggers() {
        assert!(ImageTrigger.should_show_images("How to do a squat?"));
        assert!(ImageTrigger.should_show_images("HOW TO deadlift"));
    }

    #[test]
    fn test_indonesian_phrases_trigger() {
        assert!(ImageTrigger.should_show_images("Bagaimana caranya push up?"));
        assert!(ImageTrigger.should_show_images("cara melakukan plank"));
    }

    #[test]
    fn test_plan_request_does_not_trigger() {
        assert!(!ImageTrigger.should_show_images("Recommend me a plan"));
        assert!(!ImageTrigger.should_show_images(""));
    }

    #[test]
    fn test_substring_containment() {
        // "cara" inside another word still counts.
        assert!(ImageTrigger.should_show_images("I like caramel"));
    }
}
