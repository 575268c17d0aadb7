//! Command line interface: arguments, prompt and terminal output

pub mod args;
pub mod output;
pub mod prompt;

pub use args::Args;
pub use output::ProgressRenderer;
pub use prompt::{InteractivePrompt, PromptAnswers};
