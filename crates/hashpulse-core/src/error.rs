use serde_json::Value;
use thiserror::Error;

/// Coarse failure classification used for exhaustive handling and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Api,
    Validation,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Api => "api",
            Self::Validation => "validation",
        }
    }
}

/// Failure taxonomy for every upstream fetch.
///
/// Every layer above the transport translates foreign failures into one of
/// these three variants before propagating. Client-side throttle denials and
/// open-circuit short-circuits deliberately surface as [`FetchError::Network`]
/// so self-imposed backpressure flows through the same path as a genuine
/// outage.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("network failure: {message}")]
    Network {
        message: String,
        cause: Option<String>,
    },

    #[error("upstream returned status {status} for {endpoint}")]
    Api { status: u16, endpoint: String },

    #[error("response shape mismatch: {message}")]
    Validation { message: String, raw: Value },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            cause: None,
        }
    }

    pub fn network_caused_by(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn api(status: u16, endpoint: impl Into<String>) -> Self {
        Self::Api {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn validation(message: impl Into<String>, raw: Value) -> Self {
        Self::Validation {
            message: message.into(),
            raw,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Transient failures are worth retrying once conditions change.
    pub const fn retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Validation { .. } => false,
        }
    }

    /// Short human-readable reason used in aggregation reports.
    pub fn reason(&self) -> String {
        match self {
            Self::Network { message, .. } => message.clone(),
            Self::Api { status, endpoint } => format!("status {status} from {endpoint}"),
            Self::Validation { message, .. } => message.clone(),
        }
    }
}
