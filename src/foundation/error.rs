/// Convenience result type used across photoplaque.
pub type PlaqueResult<T> = Result<T, PlaqueError>;

/// Fallback text when a failure carries no usable message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Top-level error taxonomy used by the layout, capture and upload APIs.
#[derive(thiserror::Error, Debug)]
pub enum PlaqueError {
    /// Invalid user input (file selection, message, aspect ratio, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// The selected composition could not be rasterized.
    #[error("capture error: {0}")]
    Capture(String),

    /// The generation request was rejected or answered with a non-2xx status.
    #[error("network error: {message}")]
    Network {
        /// HTTP status when the server answered at all.
        status: Option<u16>,
        /// Server-provided or transport-level message.
        message: String,
    },

    /// An upload is already in flight for this pipeline.
    #[error("busy: {0}")]
    Busy(String),

    /// Catch-all for failures that fit no other bucket.
    #[error("unknown error: {0}")]
    Unknown(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse error classification used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    /// See [`PlaqueError::Validation`].
    Validation,
    /// See [`PlaqueError::Capture`].
    Capture,
    /// See [`PlaqueError::Network`].
    Network,
    /// See [`PlaqueError::Busy`].
    Busy,
    /// Everything else.
    Unknown,
}

impl PlaqueError {
    /// Build a [`PlaqueError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlaqueError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`PlaqueError::Network`] value.
    pub fn network(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: msg.into(),
        }
    }

    /// Build a [`PlaqueError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Build a [`PlaqueError::Unknown`] value.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Capture(_) => ErrorKind::Capture,
            Self::Network { .. } => ErrorKind::Network,
            Self::Busy(_) => ErrorKind::Busy,
            Self::Unknown(_) | Self::Other(_) => ErrorKind::Unknown,
        }
    }

    /// Message shown to the user, without the taxonomy prefix.
    pub fn user_message(&self) -> String {
        let msg = match self {
            Self::Validation(m) | Self::Capture(m) | Self::Busy(m) | Self::Unknown(m) => m.clone(),
            Self::Network { message, .. } => message.clone(),
            Self::Other(e) => e.to_string(),
        };
        if msg.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            msg
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
