use std::fmt;

/// Failure shape shared by every call through the API client. Messages are
/// user-facing; `Display` for `Http` is the message alone so callers can
/// compose operation-specific errors around the server-supplied text.
#[derive(Clone, Debug)]
pub enum ClientError {
    Validation(String),
    Network(String),
    Http { status: u16, message: String },
    Parse(String),
}

impl ClientError {
    /// HTTP status code, when the failure came from a non-success response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) | Self::Network(message) | Self::Parse(message) => {
                write!(formatter, "{message}")
            }
            Self::Http { message, .. } => write!(formatter, "{message}"),
        }
    }
}

impl std::error::Error for ClientError {}
