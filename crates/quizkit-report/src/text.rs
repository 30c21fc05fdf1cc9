//! Plain-text quiz renderer for terminals.

use std::io::Write;

use quizkit_core::error::DisplayError;
use quizkit_core::model::{InputState, QuestionKind};
use quizkit_core::session::{QuestionFrame, SubmitOutcome};
use quizkit_core::traits::Renderer;

/// Writes numbered questions and feedback lines to `W`.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Output = ();

    fn render_frame(&mut self, frame: &QuestionFrame<'_>) -> Result<(), DisplayError> {
        writeln!(self.out, "Attempt {}", frame.attempt)?;

        for view in &frame.slots {
            let question = view.question;
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{}. {}  [{}]",
                view.slot + 1,
                question.prompt(),
                question.kind().label()
            )?;

            match question.kind() {
                QuestionKind::SingleChoice { options, .. }
                | QuestionKind::MultiChoice { options, .. } => {
                    for (i, option) in options.iter().enumerate() {
                        let marked = match view.input {
                            InputState::Choice(choice) => choice == option,
                            InputState::Toggled(set) => set.contains(option),
                            _ => false,
                        };
                        let mark = if marked { "x" } else { " " };
                        writeln!(self.out, "   [{mark}] {}) {option}", i + 1)?;
                    }
                }
                QuestionKind::Numeric { .. } => {
                    if let InputState::Number(n) = view.input {
                        writeln!(self.out, "   = {n}")?;
                    }
                }
                QuestionKind::Code { .. } => {
                    if let InputState::Function(name) = view.input {
                        writeln!(self.out, "   fn {name}")?;
                    }
                }
                QuestionKind::Informational => {
                    if question.notes().is_empty() {
                        writeln!(self.out, "   (no suggested solution)")?;
                    } else if view.notes_revealed {
                        for note in question.notes() {
                            writeln!(self.out, "   > {note}")?;
                        }
                    } else {
                        writeln!(self.out, "   (solution hidden, enter ? to show)")?;
                    }
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn render_outcome(&mut self, outcome: &SubmitOutcome) -> Result<(), DisplayError> {
        writeln!(self.out)?;
        for graded in &outcome.graded {
            writeln!(
                self.out,
                "{}. [{}] {}",
                graded.slot + 1,
                graded.feedback.severity,
                graded.feedback.message
            )?;
            for note in &graded.explanation {
                writeln!(self.out, "   > {note}")?;
            }
        }
        writeln!(
            self.out,
            "{} ({}/{})",
            outcome.feedback.message,
            outcome.group.total,
            outcome.group.count
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizkit_core::model::{Question, QuestionPool};
    use quizkit_core::session::{QuizSession, SessionConfig};
    use std::collections::BTreeSet;

    fn render_frame(session: &QuizSession) -> String {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render_frame(&session.frame()).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    fn pool() -> QuestionPool {
        QuestionPool::new(vec![Question::multi_choice(
            "Which are prime?",
            vec!["2".into(), "3".into(), "4".into()],
            vec!["2".into(), "3".into()],
        )
        .unwrap()
        .with_notes(vec!["4 = 2 * 2".into()])])
    }

    #[test]
    fn frame_lists_numbered_options_with_marks() {
        let mut session = QuizSession::new(pool(), SessionConfig::default());
        session
            .set_input(0, InputState::Toggled(BTreeSet::from(["3".to_string()])))
            .unwrap();

        let text = render_frame(&session);
        assert!(text.starts_with("Attempt 1"));
        assert!(text.contains("1. Which are prime?  [multiple choice]"));
        assert!(text.contains("   [ ] 1) 2"));
        assert!(text.contains("   [x] 2) 3"));
    }

    #[test]
    fn informational_reveal_state() {
        let pool = QuestionPool::new(vec![Question::informational(
            "Why?",
            vec!["Because.".into()],
        )]);
        let mut session = QuizSession::new(pool, SessionConfig::default());
        assert!(render_frame(&session).contains("solution hidden"));

        session.toggle_notes(0).unwrap();
        assert!(render_frame(&session).contains("   > Because."));
    }

    #[test]
    fn outcome_lines() {
        let mut session = QuizSession::new(pool(), SessionConfig::default());
        session
            .set_input(0, InputState::Toggled(BTreeSet::from(["2".to_string()])))
            .unwrap();
        let outcome = session.submit().unwrap();

        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render_outcome(&outcome).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains("1. [partial] Correct answers: 1/2"));
        assert!(text.contains("Some answers are wrong. Try again!"));
        assert!(!text.contains("4 = 2 * 2"));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_reported() {
        let session = QuizSession::new(pool(), SessionConfig::default());
        let err = TextRenderer::new(Broken)
            .render_frame(&session.frame())
            .unwrap_err();
        assert!(matches!(err, DisplayError::Io(_)));
    }
}
