use thiserror::Error;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// No registry title cleared the fuzzy threshold, and none contained the query.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("CIK not found (best fuzzy score {best_score:.1})")]
    NotFound { best_score: f64 },
}

/// A required, or malformed, environment setting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {key} is not a number of milliseconds: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Per-entity failures raised by the spider stages.
#[derive(Debug, Error)]
pub enum SpiderError {
    /// Network, HTTP status, or payload failure from any upstream API.
    #[error("failed to fetch {what}, error({source})")]
    Upstream {
        what: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("company name {0:?} is empty once normalized")]
    EmptyName(String),
}

impl SpiderError {
    pub fn upstream(what: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Upstream {
            what: what.into(),
            source: source.into(),
        }
    }
}

/// A row of the Fortune 100 page that could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("row {row} has no {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row} has a non-numeric rank {rank:?}")]
    BadRank { row: usize, rank: String },
}

/// A CIK that is not a string of at most ten digits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid CIK {0:?}")]
pub struct CikError(pub String);
