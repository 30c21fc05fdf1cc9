//! The `quizkit fetch` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizkit_bank::{fetch_all, load_config_from};
use quizkit_core::model::{Question, WireQuestion};
use quizkit_core::traits::FetchOutcome;

pub async fn execute(
    queries: Vec<String>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = config.bank.connect()?;

    let outcome = fetch_all(&bank, &queries)
        .await
        .with_context(|| format!("failed to fetch questions from {}", bank.base_url()))?;

    let questions = match outcome {
        FetchOutcome::NoResults => {
            println!("No questions found for: {}", queries.join(", "));
            return Ok(());
        }
        FetchOutcome::Questions(questions) => questions,
    };

    println!("{}", question_table(&questions));
    println!("{} question(s) found.", questions.len());

    if let Some(path) = output {
        let document = serde_json::json!({ "status": "success", "questions": questions });
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}

fn question_table(questions: &[WireQuestion]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Question", "Options", "Status"]);

    for (i, wire) in questions.iter().enumerate() {
        let (kind, status) = match Question::from_wire(wire) {
            Ok(question) => (question.kind().label().to_string(), "ok".to_string()),
            Err(e) => (wire.kind.clone(), e.to_string()),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(kind),
            Cell::new(&wire.body),
            Cell::new(wire.answers.as_ref().map_or(0, Vec::len)),
            Cell::new(status),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_flags_invalid_questions() {
        let questions: Vec<WireQuestion> = serde_json::from_str(
            r#"[
                { "type": "NUMERIC", "body": "6 * 7", "answer": "42" },
                { "type": "ESSAY", "body": "Discuss" }
            ]"#,
        )
        .unwrap();

        let rendered = question_table(&questions).to_string();
        assert!(rendered.contains("numeric"));
        assert!(rendered.contains("unsupported question type: ESSAY"));
    }
}
