/// Errors surfaced at the request and storage boundaries.
///
/// The matcher itself never fails; everything here comes from decoding
/// requests or talking to a store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("invalid rectangle at {position}: negative width or height")]
    InvalidRectangle { position: String },

    #[error("storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("batch write failed at row {row} of {total}; nothing was stored: {message}")]
    PartialWriteFailure {
        row: usize,
        total: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn storage(message: impl ToString) -> Self {
        Self::StorageUnavailable {
            message: message.to_string(),
        }
    }

    /// HTTP status code a client sees for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedInput { .. } | Self::InvalidRectangle { .. } => 400,
            Self::StorageUnavailable { .. } => 503,
            Self::PartialWriteFailure { .. } | Self::Io(_) | Self::Json(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
