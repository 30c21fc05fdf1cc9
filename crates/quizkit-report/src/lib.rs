//! quizkit-report: Renderers for quiz sessions.
//!
//! Implements the `Renderer` trait for the terminal and for self-contained
//! HTML documents.

pub mod html;
pub mod text;

pub use html::{write_html_quiz, HtmlRenderer};
pub use text::TextRenderer;
