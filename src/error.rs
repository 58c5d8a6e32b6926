use std::fmt;

/// The streaming service a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Tidal,
    Spotify,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Tidal => write!(f, "TIDAL"),
            Service::Spotify => write!(f, "Spotify"),
        }
    }
}

/// Failures of the raw HTTP API modules.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failures of the OAuth refresh-token exchange, shared by both services.
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("Invalid refresh token: {reason}")]
    InvalidRefreshToken { reason: String },
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
}

/// Failures surfaced by the catalog ports.
///
/// The migration never recovers from these; they bubble up to `main`, which
/// turns them into an exit code.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Could not connect to {service}: {reason}")]
    Authentication { service: Service, reason: String },
    #[error("{service} request failed while trying to {operation}: {reason}")]
    Transient {
        service: Service,
        operation: &'static str,
        reason: String,
    },
    #[error("{service} returned an unexpected response while trying to {operation}: {reason}")]
    InvalidResponse {
        service: Service,
        operation: &'static str,
        reason: String,
    },
}

impl CatalogError {
    pub fn authentication(service: Service, reason: impl fmt::Display) -> Self {
        Self::Authentication {
            service,
            reason: reason.to_string(),
        }
    }

    pub fn transient(service: Service, operation: &'static str, reason: impl fmt::Display) -> Self {
        Self::Transient {
            service,
            operation,
            reason: reason.to_string(),
        }
    }

    /// Classifies an HTTP failure made after the session was established.
    /// Undecodable bodies and bad links become `InvalidResponse`, everything
    /// else `Transient`.
    pub fn from_api(service: Service, operation: &'static str, error: ApiError) -> Self {
        match error {
            ApiError::Http(error) if !error.is_decode() => {
                Self::transient(service, operation, error)
            }
            error => Self::InvalidResponse {
                service,
                operation,
                reason: error.to_string(),
            },
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, CatalogError::Authentication { .. })
    }
}
