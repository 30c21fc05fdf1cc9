//! quizkit-core: Question model, evaluators, aggregation and quiz sessions.
//!
//! This crate defines the question model, one scoring strategy per question
//! kind, the group verdict, random subset selection and the session state
//! machine that drives submit and retry cycles.

pub mod aggregate;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod model;
pub mod parser;
pub mod registry;
pub mod selector;
pub mod session;
pub mod traits;
