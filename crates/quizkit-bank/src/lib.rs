//! quizkit-bank: Question bank client and configuration.
//!
//! Implements the `QuestionSource` trait over the question bank HTTP API and
//! as an in-memory source, and loads the `quizkit.toml` configuration.

pub mod client;
pub mod config;
pub mod error;
pub mod mock;

pub use client::{fetch_all, HttpQuestionBank};
pub use config::{load_config, load_config_from, BankConfig, QuizConfig, QuizkitConfig};
pub use error::BankError;
pub use mock::StaticSource;
