//! Error types for trigger loading and rule evaluation.
//!
//! Neither variant ever escapes a classification call: a resource that
//! fails to load leaves its category empty, and an evaluation failure is
//! logged and contributes no features for the affected category.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading trigger resources or evaluating rules.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A trigger resource file could not be read.
    #[error("failed to read trigger resource {}: {}", .path.display(), .source)]
    TriggerResource {
        /// Path of the resource that failed to load.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A trigger phrase or target term did not compile as a pattern.
    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        /// The offending phrase or term.
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
