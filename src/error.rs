use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartDataError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Payload does not match any known statement structure")]
    UnrecognizedPayload,

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("Unsupported session schema version {found}: expected {expected}")]
    UnsupportedSchemaVersion { found: u32, expected: u32 },

    #[error("No session stored under id: {0}")]
    SessionNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "backend")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "backend")]
    #[error("Backend error: {0}")]
    Backend(String),

    #[cfg(feature = "backend")]
    #[error("Backend did not become ready after {attempts} polling attempts")]
    PollTimeout { attempts: u32 },
}

impl ChartDataError {
    /// Text shown in place of a chart when loading its data failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPayload(_) | Self::Serialization(_) => {
                "Failed to parse financial data. The results could not be displayed.".to_string()
            }
            Self::UnrecognizedPayload => {
                "Data format does not match any expected statement structure.".to_string()
            }
            Self::SessionNotFound(_) | Self::UnsupportedSchemaVersion { .. } => {
                "No processing results found. Please upload your documents again.".to_string()
            }
            _ => format!("Financial data is unavailable: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartDataError>;
