//! HTML quiz renderer.
//!
//! Produces fragments for each display cycle and submit, or a self-contained
//! HTML document with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use quizkit_core::error::DisplayError;
use quizkit_core::feedback::Feedback;
use quizkit_core::model::{InputState, QuestionKind};
use quizkit_core::session::{QuestionFrame, QuizSession, SlotView, SubmitOutcome};
use quizkit_core::traits::Renderer;

const NO_SOLUTION: &str = "This question has no suggested solution.";

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders quiz frames and outcomes as HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    title: Option<String>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// A complete HTML page for the session's current cycle, including the
    /// last submit outcome (if any) and the session summary as raw JSON.
    pub fn render_document(&mut self, session: &QuizSession) -> Result<String, DisplayError> {
        let title = self.title.clone().unwrap_or_else(|| "quizkit".to_string());
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>{}</title>\n", html_escape(&title)));
        html.push_str("<style>\n");
        html.push_str(CSS);
        html.push_str("</style>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str("<header>\n");
        html.push_str(&format!("<h1>{}</h1>\n", html_escape(&title)));
        html.push_str(&format!(
            "<p class=\"meta\">{} questions | attempt {} | {}</p>\n",
            session.len(),
            session.attempt(),
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        html.push_str("</header>\n");

        html.push_str(&self.render_frame(&session.frame())?);
        if let Some(outcome) = session.last_outcome() {
            html.push_str(&self.render_outcome(outcome)?);
        }

        let summary = serde_json::to_string_pretty(&session.summary())
            .map_err(|e| DisplayError::Unsupported(format!("session summary: {e}")))?;
        html.push_str("<section class=\"raw-data\">\n");
        html.push_str("<details>\n<summary>Session JSON</summary>\n");
        html.push_str("<pre><code>");
        html.push_str(&html_escape(&summary));
        html.push_str("</code></pre>\n");
        html.push_str("</details>\n</section>\n");

        html.push_str("</body>\n</html>");
        Ok(html)
    }

    fn render_slot(&self, html: &mut String, view: &SlotView<'_>) {
        let question = view.question;
        let name = format!("q{}", view.slot);

        html.push_str(&format!(
            "<article class=\"question\" data-kind=\"{}\">\n",
            question.kind().wire_tag()
        ));
        html.push_str(&format!(
            "<p class=\"prompt\"><span class=\"number\">{}.</span> {}</p>\n",
            view.slot + 1,
            html_escape(question.prompt())
        ));

        match question.kind() {
            QuestionKind::SingleChoice { options, .. } => {
                let chosen = match view.input {
                    InputState::Choice(choice) => Some(choice.as_str()),
                    _ => None,
                };
                html.push_str("<ul class=\"options\">\n");
                for (i, option) in options.iter().enumerate() {
                    html.push_str(&format!(
                        "<li><label><input type=\"radio\" name=\"{name}\" value=\"{i}\"{}> {}</label></li>\n",
                        checked(chosen == Some(option.as_str())),
                        html_escape(option)
                    ));
                }
                html.push_str("</ul>\n");
            }
            QuestionKind::MultiChoice { options, .. } => {
                html.push_str("<ul class=\"options\">\n");
                for (i, option) in options.iter().enumerate() {
                    let on = matches!(view.input, InputState::Toggled(set) if set.contains(option));
                    html.push_str(&format!(
                        "<li><label><input type=\"checkbox\" name=\"{name}\" value=\"{i}\"{}> {}</label></li>\n",
                        checked(on),
                        html_escape(option)
                    ));
                }
                html.push_str("</ul>\n");
            }
            QuestionKind::Numeric { .. } => {
                let value = match view.input {
                    InputState::Number(n) => format!(" value=\"{n}\""),
                    _ => String::new(),
                };
                html.push_str(&format!(
                    "<input type=\"number\" step=\"any\" name=\"{name}\"{value}>\n"
                ));
            }
            QuestionKind::Code { .. } => {
                let value = match view.input {
                    InputState::Function(f) => format!(" value=\"{}\"", html_escape(f)),
                    _ => String::new(),
                };
                html.push_str(&format!(
                    "<input type=\"text\" name=\"{name}\" placeholder=\"function name\"{value}>\n"
                ));
            }
            QuestionKind::Informational => {
                html.push_str(&format!(
                    "<details class=\"notes\"{}>\n<summary>Solution</summary>\n",
                    if view.notes_revealed { " open" } else { "" }
                ));
                if question.notes().is_empty() {
                    html.push_str(&format!("<p>{NO_SOLUTION}</p>\n"));
                } else {
                    for note in question.notes() {
                        html.push_str(&format!("<p>{}</p>\n", html_escape(note)));
                    }
                }
                html.push_str("</details>\n");
            }
        }

        html.push_str("</article>\n");
    }
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

fn feedback_box(feedback: &Feedback, class: &str) -> String {
    format!(
        "<div class=\"{class} {}\" style=\"border: 2px solid {}\">{}</div>\n",
        feedback.severity,
        feedback.severity.color(),
        html_escape(&feedback.message)
    )
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render_frame(&mut self, frame: &QuestionFrame<'_>) -> Result<String, DisplayError> {
        let mut html = String::new();
        html.push_str(&format!(
            "<form class=\"quiz\" data-attempt=\"{}\">\n",
            frame.attempt
        ));
        for view in &frame.slots {
            self.render_slot(&mut html, view);
        }
        html.push_str("<button type=\"submit\">Submit</button>\n");
        html.push_str("</form>\n");
        Ok(html)
    }

    fn render_outcome(&mut self, outcome: &SubmitOutcome) -> Result<String, DisplayError> {
        let mut html = String::new();
        html.push_str(&format!(
            "<section class=\"outcome\" data-attempt=\"{}\">\n",
            outcome.attempt
        ));
        for graded in &outcome.graded {
            html.push_str(&format!(
                "<div class=\"graded\" data-slot=\"{}\">\n<span class=\"number\">{}.</span>\n",
                graded.slot,
                graded.slot + 1
            ));
            html.push_str(&feedback_box(&graded.feedback, "feedback"));
            if !graded.explanation.is_empty() {
                html.push_str("<details class=\"explanation\">\n<summary>Explanation</summary>\n");
                for note in &graded.explanation {
                    html.push_str(&format!("<p>{}</p>\n", html_escape(note)));
                }
                html.push_str("</details>\n");
            }
            html.push_str("</div>\n");
        }
        html.push_str(&feedback_box(&outcome.feedback, "group-feedback"));
        html.push_str("</section>\n");
        Ok(html)
    }
}

/// Write the session's current cycle as an HTML document.
pub fn write_html_quiz(session: &QuizSession, title: &str, path: &Path) -> Result<()> {
    let html = HtmlRenderer::new().with_title(title).render_document(session)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 2rem; }
.meta { color: #6b7280; }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 0.5rem 1rem; margin: 1rem 0; }
.prompt { font-weight: bold; }
.options { list-style: none; padding-left: 0; }
.feedback, .group-feedback { border-radius: 6px; padding: 0.5rem 1rem; margin: 0.5rem 0; }
.group-feedback { font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizkit_core::model::{Question, QuestionPool};
    use quizkit_core::session::SessionConfig;

    fn session() -> QuizSession {
        let pool = QuestionPool::new(vec![Question::single_choice(
            "Is 1 < 2?",
            vec!["<yes>".into(), "no".into()],
            "<yes>",
        )
        .unwrap()
        .with_notes(vec!["Numbers & order.".into()])]);
        QuizSession::new(
            pool,
            SessionConfig {
                display_count: None,
                seed: Some(1),
            },
        )
    }

    #[test]
    fn frame_escapes_and_checks_input() {
        let mut session = session();
        session
            .set_input(0, InputState::Choice("<yes>".into()))
            .unwrap();

        let html = HtmlRenderer::new().render_frame(&session.frame()).unwrap();
        assert!(html.contains("Is 1 &lt; 2?"));
        assert!(html.contains("value=\"0\" checked> &lt;yes&gt;"));
        assert!(html.contains("type=\"radio\""));
        assert!(!html.contains("<yes>"));
    }

    #[test]
    fn informational_without_notes_shows_placeholder() {
        let pool = QuestionPool::new(vec![Question::informational("Think about it", vec![])]);
        let session = QuizSession::new(pool, SessionConfig::default());
        let html = HtmlRenderer::new().render_frame(&session.frame()).unwrap();
        assert!(html.contains(NO_SOLUTION));
        assert!(html.contains("<details class=\"notes\">"));
    }

    #[test]
    fn outcome_uses_severity_colors_and_explanation() {
        let mut session = session();
        session
            .set_input(0, InputState::Choice("<yes>".into()))
            .unwrap();
        let outcome = session.submit().unwrap();

        let html = HtmlRenderer::new().render_outcome(&outcome).unwrap();
        assert!(html.contains("border: 2px solid lightgreen"));
        assert!(html.contains("All questions are correct!"));
        assert!(html.contains("Numbers &amp; order."));
    }

    #[test]
    fn document_contains_required_elements() {
        let session = session();
        let html = HtmlRenderer::new()
            .with_title("Calculus")
            .render_document(&session)
            .unwrap();

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<title>Calculus</title>"));
        assert!(html.contains("Session JSON"));
    }

    #[test]
    fn write_to_file() {
        let session = session();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("quiz.html");

        write_html_quiz(&session, "quiz", &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<form class=\"quiz\""));
    }
}
