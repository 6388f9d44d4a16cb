//! Error types for fetching, rule loading, date filtering and export.
//!
//! Every analyzer has a strict variant returning one of these errors and a
//! lenient variant that logs the error and degrades to an empty value, so the
//! pipeline as a whole never aborts on a single failed stage.

use std::path::PathBuf;

use reqwest::StatusCode;

/// Failure of a single HTTP GET.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connection refused, timeout, body read).
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered but signalled an unsuccessful request.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    pub fn is_http_status(&self) -> bool {
        matches!(self, FetchError::HttpStatus { .. })
    }

    /// Status code of an `HttpStatus` failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status(),
        }
    }
}

/// Why a record was dropped by the date filter.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("missing value for date field `{field}`")]
    MissingField { field: String },
    #[error("cannot parse `{value}` in field `{field}` with format `{format}`: {source}")]
    DateParse {
        field: String,
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no records to export")]
    EmptyInput,
    #[error("i/o error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Problems with a selector rule set or the file it was loaded from.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rules YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("rules file must be a mapping of field name to selector")]
    NotAMapping,
    #[error("rule for `{field}` must be a selector string or a {{selector, attrs, prefer_attrs}} mapping")]
    InvalidRule { field: String },
    #[error("invalid selector for `{field}` (`{selector}`): {message}")]
    InvalidSelector {
        field: String,
        selector: String,
        message: String,
    },
    #[error("duplicate field `{0}` in selector rules")]
    DuplicateField(String),
    #[error("expected FIELD=SELECTOR, got `{0}`")]
    MalformedOverride(String),
}
