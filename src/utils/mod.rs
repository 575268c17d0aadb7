//! Utility functions for vget

pub mod paths;
pub mod url;

pub use paths::*;
pub use url::*;
