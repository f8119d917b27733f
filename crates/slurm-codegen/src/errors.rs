use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config document {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{source_name}: config document is not valid YAML")]
    Malformed {
        source_name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("enum_type_overrides key '{0}' must have the form <type>.<field>")]
    InvalidEnumOverrideKey(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum CoverageError {
    #[error("field coverage {percent:.1}% is below the {threshold}% threshold")]
    BelowThreshold { percent: f64, threshold: f64 },
    #[error("{0} generated types are missing fields")]
    MissingFields(usize),
}
