use thiserror::Error;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Index is not a non-zero unsigned integer: '{0}'")]
    InvalidIndex(String),

    #[error("Invalid command format!\n{usage}")]
    InvalidCommandFormat {
        usage: String,
        #[source]
        source: Option<Box<TutorError>>,
    },

    #[error("The person index provided is invalid: {index} (list has {size})")]
    OutOfRange { index: usize, size: usize },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("Unknown command: {0}. Type 'help' for commands.")]
    UnknownCommand(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TutorError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        TutorError::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Wraps a parse failure with the usage text of the command being parsed.
    pub fn command_format(usage: &str, source: TutorError) -> Self {
        TutorError::InvalidCommandFormat {
            usage: usage.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn usage(usage: &str) -> Self {
        TutorError::InvalidCommandFormat {
            usage: usage.to_string(),
            source: None,
        }
    }
}

pub type TutorResult<T> = Result<T, TutorError>;
