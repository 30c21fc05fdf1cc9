//! The `quizkit take` command.

use std::io::{BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizkit_bank::{fetch_all, load_config_from};
use quizkit_core::aggregate::Verdict;
use quizkit_core::model::{InputState, QuestionKind, QuestionPool};
use quizkit_core::parser::load_pool;
use quizkit_core::session::QuizSession;
use quizkit_core::traits::{FetchOutcome, Renderer};
use quizkit_report::TextRenderer;

use crate::builtins;

pub struct TakeArgs {
    pub pool: Option<PathBuf>,
    pub query: Vec<String>,
    pub count: Option<NonZeroUsize>,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let pool = match &args.pool {
        Some(path) => load_pool(path)?,
        None => {
            let bank = config.bank.connect()?;
            let outcome = fetch_all(&bank, &args.query)
                .await
                .with_context(|| format!("failed to fetch questions from {}", bank.base_url()))?;
            match fetched_pool(outcome)? {
                Some(pool) => pool,
                None => {
                    println!("No questions found for: {}", args.query.join(", "));
                    return Ok(());
                }
            }
        }
    };
    anyhow::ensure!(!pool.is_empty(), "no questions to ask");

    let mut session_config = config.quiz.session_config();
    if args.count.is_some() {
        session_config.display_count = args.count;
    }
    if args.seed.is_some() {
        session_config.seed = args.seed;
    }

    let mut session = start(pool, session_config);
    tracing::info!(session = %session.id(), questions = session.len(), "quiz started");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_quiz(&mut session, stdin.lock(), stdout.lock())?;

    tracing::info!(
        session = %session.id(),
        attempts = session.attempt(),
        verdict = %session.verdict(),
        "quiz finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.summary())?);
    }

    Ok(())
}

/// The pool to quiz on, or `None` when the bank had nothing for the queries.
fn fetched_pool(outcome: FetchOutcome) -> Result<Option<QuestionPool>> {
    match outcome {
        FetchOutcome::NoResults => Ok(None),
        FetchOutcome::Questions(questions) if questions.is_empty() => Ok(None),
        outcome => outcome
            .into_pool()
            .map(Some)
            .context("question bank returned an invalid question"),
    }
}

fn start(pool: QuestionPool, config: quizkit_core::session::SessionConfig) -> QuizSession {
    QuizSession::new(pool, config).with_registry(Arc::new(builtins::registry()))
}

/// What one line typed at a question prompt means.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Answer(InputState),
    ToggleNotes,
    Skip,
}

/// Interpret a line typed for a question of `kind`.
fn parse_entry(kind: &QuestionKind, line: &str) -> Result<Entry, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Entry::Skip);
    }
    if line == "?" {
        return Ok(Entry::ToggleNotes);
    }

    match kind {
        QuestionKind::SingleChoice { options, .. } => {
            let index = option_index(line, options.len())?;
            Ok(Entry::Answer(InputState::Choice(options[index].clone())))
        }
        QuestionKind::MultiChoice { options, .. } => {
            let mut input = InputState::Empty;
            for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let index = option_index(part, options.len())?;
                input.toggle(&options[index]);
            }
            Ok(Entry::Answer(input))
        }
        QuestionKind::Numeric { .. } => line
            .parse::<f64>()
            .map(|n| Entry::Answer(InputState::Number(n)))
            .map_err(|_| format!("'{line}' is not a number")),
        QuestionKind::Code { .. } => Ok(Entry::Answer(InputState::Function(line.to_string()))),
        QuestionKind::Informational => Ok(Entry::Skip),
    }
}

fn option_index(text: &str, len: usize) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(format!("enter an option number between 1 and {len}")),
    }
}

fn hint(kind: &QuestionKind) -> String {
    match kind {
        QuestionKind::SingleChoice { options, .. } => format!("option 1-{}", options.len()),
        QuestionKind::MultiChoice { options, .. } => {
            format!("options 1-{}, comma-separated", options.len())
        }
        QuestionKind::Numeric { .. } => "number".to_string(),
        QuestionKind::Code { .. } => "function name".to_string(),
        QuestionKind::Informational => "? to toggle the solution, enter to continue".to_string(),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Drive `session` from `input` until it is approved, the learner declines a
/// retry, or input runs out.
fn run_quiz<R: BufRead, W: Write>(session: &mut QuizSession, mut input: R, mut out: W) -> Result<()> {
    loop {
        let rendered = TextRenderer::new(&mut out).render_frame(&session.frame());
        if let Err(e) = rendered {
            writeln!(out, "(questions could not be displayed: {e})")?;
        }

        let mut exhausted = false;
        'slots: for slot in 0..session.len() {
            loop {
                let Some(kind) = session.displayed().nth(slot).map(|q| q.kind().clone()) else {
                    break;
                };
                write!(out, "\n{}> ({}) ", slot + 1, hint(&kind))?;
                out.flush()?;

                let Some(line) = read_line(&mut input)? else {
                    exhausted = true;
                    break 'slots;
                };

                match parse_entry(&kind, &line) {
                    Ok(Entry::Skip) => break,
                    Ok(Entry::Answer(answer)) => {
                        session.set_input(slot, answer)?;
                        break;
                    }
                    Ok(Entry::ToggleNotes) => match session.toggle_notes(slot) {
                        Ok(true) => {
                            let notes = session
                                .displayed()
                                .nth(slot)
                                .map(|q| q.notes().to_vec())
                                .unwrap_or_default();
                            for note in notes {
                                writeln!(out, "   > {note}")?;
                            }
                        }
                        Ok(false) => writeln!(out, "   (solution hidden)")?,
                        Err(e) => writeln!(out, "   {e}")?,
                    },
                    Err(message) => writeln!(out, "   {message}")?,
                }
            }
        }

        let outcome = session.submit()?;
        let rendered = TextRenderer::new(&mut out).render_outcome(&outcome);
        if let Err(e) = rendered {
            writeln!(out, "(feedback could not be displayed: {e}) {}", outcome.feedback.message)?;
        }

        if outcome.verdict() == Verdict::Approved || exhausted {
            return Ok(());
        }

        write!(out, "\nTry again? [y/N] ")?;
        out.flush()?;
        match read_line(&mut input)? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                session.retry()?;
                writeln!(out)?;
            }
            _ => return Ok(()),
        }
    }
}
