use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("failed to read schema document {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{source_name}: schema document is not valid JSON")]
    Malformed {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Every structural rule a document violated, reported together.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source_name}: OpenAPI validation failed:\n{}", format_violations(.violations))]
pub struct ValidationError {
    pub source_name: String,
    pub violations: Vec<String>,
}

fn format_violations(violations: &[String]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
