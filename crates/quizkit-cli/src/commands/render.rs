//! The `quizkit render` command.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::parser::load_pool;
use quizkit_core::session::{QuizSession, SessionConfig};
use quizkit_report::write_html_quiz;

pub fn execute(
    pool_path: PathBuf,
    count: Option<NonZeroUsize>,
    seed: Option<u64>,
    output: PathBuf,
) -> Result<()> {
    let pool = load_pool(&pool_path)?;
    anyhow::ensure!(!pool.is_empty(), "question pool is empty: {}", pool_path.display());

    let session = QuizSession::new(
        pool,
        SessionConfig {
            display_count: count,
            seed,
        },
    );

    let title = pool_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quizkit".to_string());
    write_html_quiz(&session, &title, &output)?;

    println!(
        "Rendered {} question(s) to {}",
        session.len(),
        output.display()
    );
    Ok(())
}
