use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Host command '/{command}' is not available")]
    CommandUnavailable { command: String },

    #[error("Host collaborator failed: {message}")]
    Collaborator { message: String },
}

impl ConnectorError {
    pub fn unavailable(command: impl Into<String>) -> Self {
        Self::CommandUnavailable { command: command.into() }
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator { message: message.into() }
    }

    /// True when the host lacks the command entirely, as opposed to the
    /// command failing while it ran.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::CommandUnavailable { .. })
    }
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;
