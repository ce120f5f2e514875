//! Line-oriented terminal shell around an [`Orchestrator`].

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use repcoach_chat::{ChatError, Orchestrator, TurnOutcome};

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput<'a> {
    Blank,
    Quit,
    Reset,
    History,
    Question(&'a str),
}

pub fn parse_line(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => ShellInput::Blank,
        "/quit" | "/exit" => ShellInput::Quit,
        "/reset" => ShellInput::Reset,
        "/history" => ShellInput::History,
        question => ShellInput::Question(question),
    }
}

/// Print an answer followed by any step images.
pub fn print_outcome<W: Write>(out: &mut W, outcome: &TurnOutcome) -> std::io::Result<()> {
    writeln!(out, "AI: {}", outcome.answer)?;
    for image in &outcome.images {
        writeln!(
            out,
            "  [{}] {} ({} bytes)",
            image.caption,
            image.locator,
            image.bytes.len()
        )?;
    }
    Ok(())
}

/// Read questions until EOF or `/quit`.
///
/// Turn errors are printed and the loop continues.
pub async fn run<R, W>(
    orchestrator: &mut Orchestrator,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(
        out,
        "RepCoach ready with {} exercises. Type /history, /reset or /quit.",
        orchestrator.catalog().len()
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse_line(&line) {
            ShellInput::Blank => continue,
            ShellInput::Quit => break,
            ShellInput::Reset => {
                orchestrator.reset_session();
                writeln!(out, "Conversation cleared.")?;
            }
            ShellInput::History => {
                let history = orchestrator.session().history();
                if history.is_empty() {
                    writeln!(out, "(no history)")?;
                }
                for turn in history.turns() {
                    writeln!(out, "{}: {}", turn.role(), turn.text())?;
                }
            }
            ShellInput::Question(question) => match orchestrator.handle_turn(question).await {
                Ok(outcome) => print_outcome(out, &outcome)?,
                Err(e) => print_error(out, &e)?,
            },
        }
    }
    Ok(())
}

fn print_error<W: Write>(out: &mut W, err: &ChatError) -> std::io::Result<()> {
    tracing::debug!(error = ?err, "Turn error shown to user");
    writeln!(out, "Error: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use repcoach_chat::{
        ExerciseCatalog, GenerationFailure, MediaFetcher, PromptRequest, Recommender,
    };
    use repcoach_core::config::RepcoachConfig;

    struct EchoRecommender {
        fail_on: Option<&'static str>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Recommender for EchoRecommender {
        async fn generate(&self, request: &PromptRequest) -> Result<String, ChatError> {
            *self.calls.lock().unwrap() += 1;
            if let Some(marker) = self.fail_on {
                if request.text.contains(&format!("User: {}", marker)) {
                    return Err(ChatError::generation(GenerationFailure::Status(500), "boom"));
                }
            }
            Ok("Try Squats: keep your back straight.".to_string())
        }
    }

    struct TinyJpegs;

    #[async_trait]
    impl MediaFetcher for TinyJpegs {
        async fn fetch(&self, _locator: &str) -> Result<Vec<u8>, ChatError> {
            Ok(vec![0xFF, 0xD8])
        }
    }

    fn orchestrator(fail_on: Option<&'static str>) -> Orchestrator {
        Orchestrator::new(
            &RepcoachConfig::default(),
            ExerciseCatalog::from_names(["squats", "plank"]),
            Arc::new(EchoRecommender {
                fail_on,
                calls: Mutex::new(0),
            }),
            Arc::new(TinyJpegs),
        )
        .unwrap()
    }

    async fn run_script(orch: &mut Orchestrator, script: &str) -> String {
        let mut out = Vec::new();
        run(orch, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    // ---- parse_line ----

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(parse_line("  "), ShellInput::Blank);
        assert_eq!(parse_line("/quit\n"), ShellInput::Quit);
        assert_eq!(parse_line("/reset"), ShellInput::Reset);
        assert_eq!(parse_line("/history"), ShellInput::History);
        assert_eq!(
            parse_line("  How to plank? "),
            ShellInput::Question("How to plank?")
        );
    }

    // ---- run ----

    #[tokio::test]
    async fn test_run_answers_and_shows_images() {
        let mut orch = orchestrator(None);
        let output = run_script(&mut orch, "How to squat?\n/quit\n").await;
        assert!(output.contains("AI: Try Squats: keep your back straight."));
        assert!(output.contains("[Step 1 - Squats]"));
        assert!(output.contains("[Step 2 - Squats]"));
        assert_eq!(orch.session().history().len(), 2);
    }

    #[tokio::test]
    async fn test_run_continues_after_generation_error() {
        let mut orch = orchestrator(Some("bad"));
        let output = run_script(&mut orch, "bad\nRecommend a plan\n").await;
        assert!(output.contains("Error: generation failed"));
        assert!(output.contains("AI: Try Squats"));
        assert_eq!(orch.session().history().len(), 2);
    }

    #[tokio::test]
    async fn test_run_history_and_reset() {
        let mut orch = orchestrator(None);
        let output = run_script(&mut orch, "Recommend a plan\n/history\n/reset\n/history\n").await;
        assert!(output.contains("user: Recommend a plan"));
        assert!(output.contains("assistant: Try Squats"));
        assert!(output.contains("Conversation cleared."));
        assert!(output.contains("(no history)"));
        assert!(orch.session().history().is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_at_eof() {
        let mut orch = orchestrator(None);
        let output = run_script(&mut orch, "").await;
        assert!(output.starts_with("RepCoach ready with 2 exercises."));
    }
}
