//! Core functionality for vget

pub mod orchestrator;
pub mod preferences;
pub mod progress;
pub mod quality;
pub mod request;

pub use orchestrator::*;
pub use preferences::*;
pub use progress::*;
pub use quality::*;
pub use request::*;
