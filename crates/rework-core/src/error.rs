//! Error types for configuration resolution

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Tool;

/// Fatal problems with a configuration. Resolution stops before any work
/// item is produced.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Empty {kind} pattern")]
    EmptyPattern { kind: &'static str },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Empty rule set identifier")]
    EmptySetId,

    #[error("Empty rule identifier")]
    EmptyRuleId,

    #[error("Unknown override action '{action}' for rule '{rule}' (expected 'skip' or 'configure')")]
    UnknownAction { rule: String, action: String },

    #[error("Override for rule '{rule}' is contradictory: {reason}")]
    ConflictingOverride { rule: String, reason: String },

    #[error("Unknown rule '{rule}' for {tool}")]
    UnknownRule { tool: Tool, rule: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors raised while expanding a rule set through a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown rule set '{set}' for {tool}")]
    UnknownSet { tool: Tool, set: String },

    #[error("Rule set '{set}' includes itself (via {chain})")]
    Cycle { set: String, chain: String },
}

/// The applicability predicate could not answer for one (file, rule) pair.
/// The pair is skipped; the rest of the batch is unaffected.
#[derive(Debug, Error)]
pub enum ApplicabilityError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// A processing engine failed to apply one work item
#[derive(Debug, Error)]
pub enum EngineFailure {
    #[error("Failed to start engine: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine exited with {}: {stderr}", exit_status(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("{0}")]
    Other(String),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}
