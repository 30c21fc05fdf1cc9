//! Question pool file loader.
//!
//! Loads pools from JSON (a bank response envelope or a bare array) and TOML
//! (`[[questions]]` tables) files and directories, and validates them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{DisplayPhase, Question, QuestionPool, WireQuestion, WIRE_TEXT};

/// Either a question bank envelope or a bare list of questions.
///
/// An object without a `questions` key matches neither, so a lone question
/// or a misspelled key is a parse error rather than an empty pool.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoolDocument {
    Envelope {
        #[serde(default)]
        status: Option<String>,
        questions: Vec<WireQuestion>,
    },
    Bare(Vec<WireQuestion>),
}

/// The questions read from one file, not yet materialized.
#[derive(Debug, Clone)]
pub struct PoolFile {
    pub path: PathBuf,
    pub questions: Vec<WireQuestion>,
}

impl PoolFile {
    /// The file name, for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn to_pool(&self) -> Result<QuestionPool> {
        QuestionPool::from_wire(&self.questions)
            .with_context(|| format!("invalid question pool: {}", self.path.display()))
    }
}

/// Parse pool file content. The format is chosen by `source_path`'s
/// extension; anything other than `.toml` is read as JSON.
pub fn parse_pool_str(content: &str, source_path: &Path) -> Result<PoolFile> {
    let is_toml = source_path.extension().is_some_and(|ext| ext == "toml");
    let document: PoolDocument = if is_toml {
        toml::from_str(content).with_context(|| {
            format!(
                "failed to parse TOML: {} (expected [[questions]] tables)",
                source_path.display()
            )
        })?
    } else {
        serde_json::from_str(content).with_context(|| {
            format!(
                "failed to parse JSON: {} (expected an array of questions or an object with a \"questions\" array)",
                source_path.display()
            )
        })?
    };

    let questions = match document {
        PoolDocument::Envelope { status, questions } => {
            if let Some(status) = status.filter(|s| s != "success") {
                anyhow::bail!(
                    "{} has status {status:?}, expected \"success\"",
                    source_path.display()
                );
            }
            questions
        }
        PoolDocument::Bare(questions) => questions,
    };

    Ok(PoolFile {
        path: source_path.to_path_buf(),
        questions,
    })
}

/// Parse a single pool file.
pub fn parse_pool_file(path: &Path) -> Result<PoolFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question pool: {}", path.display()))?;

    parse_pool_str(&content, path)
}

/// Recursively load all `.json` and `.toml` pool files from a directory.
pub fn load_pool_directory(dir: &Path) -> Result<Vec<PoolFile>> {
    let mut files = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            files.extend(load_pool_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "json" || ext == "toml")
        {
            match parse_pool_file(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(files)
}

/// Load a pool from a file, or merge every pool file under a directory.
pub fn load_pool(path: &Path) -> Result<QuestionPool> {
    if path.is_dir() {
        let questions = load_pool_directory(path)?
            .iter()
            .map(PoolFile::to_pool)
            .collect::<Result<Vec<_>>>()?
            .iter()
            .flat_map(|pool| pool.iter().cloned())
            .collect::<Vec<Question>>();
        Ok(QuestionPool::new(questions))
    } else {
        parse_pool_file(path)?.to_pool()
    }
}

/// A problem found while validating a pool.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Position of the question in its file (if applicable).
    pub index: Option<usize>,
    /// Warning message.
    pub message: String,
    /// The question cannot be materialized at all.
    pub fatal: bool,
}

impl ValidationWarning {
    fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            message: message.into(),
            fatal: false,
        }
    }
}

/// Validate pool questions for errors and common authoring mistakes.
pub fn validate_pool(questions: &[WireQuestion]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Materialization errors
    for (index, question) in questions.iter().enumerate() {
        if let Err(e) = Question::from_wire(question) {
            warnings.push(ValidationWarning {
                fatal: true,
                ..ValidationWarning::at(index, e.to_string())
            });
        }
    }

    // Empty prompts
    for (index, question) in questions.iter().enumerate() {
        if question.body.trim().is_empty() {
            warnings.push(ValidationWarning::at(index, "body is empty"));
        }
    }

    // Duplicate prompts
    let mut seen_bodies = HashSet::new();
    for (index, question) in questions.iter().enumerate() {
        if !question.body.trim().is_empty() && !seen_bodies.insert(question.body.trim()) {
            warnings.push(ValidationWarning::at(
                index,
                format!("duplicate question body: {}", question.body.trim()),
            ));
        }
    }

    // Duplicate options
    for (index, question) in questions.iter().enumerate() {
        let mut seen = HashSet::new();
        for option in question.answers.iter().flatten() {
            if !seen.insert(option) {
                warnings.push(ValidationWarning::at(
                    index,
                    format!("duplicate option: {option}"),
                ));
            }
        }
    }

    // Informational questions
    for (index, question) in questions.iter().enumerate() {
        if question.kind != WIRE_TEXT {
            continue;
        }
        if question.notes.as_ref().map_or(true, Vec::is_empty) {
            warnings.push(ValidationWarning::at(
                index,
                "TEXT question has no notes and will show no suggested solution",
            ));
        }
        if question.answer.is_some() || question.answers.is_some() {
            warnings.push(ValidationWarning::at(
                index,
                "answer and answers are ignored for TEXT questions",
            ));
        }
    }

    // Display phases
    if !questions.is_empty()
        && questions
            .iter()
            .all(|q| q.phase == Some(DisplayPhase::Retry))
    {
        warnings.push(ValidationWarning {
            index: None,
            message: "no question is eligible for the initial draw; the whole pool will be used"
                .into(),
            fatal: false,
        });
    }

    warnings
}
