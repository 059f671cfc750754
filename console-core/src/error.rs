use thiserror::Error;

/// Unified error type for Ando Console.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Admin key not configured, run `settings set` first")]
    NotConfigured,

    #[error("Unauthorized: admin key rejected")]
    Unauthorized,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Internal: {0}")]
    Internal(String),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Fallback shown when neither the response nor the transport says anything useful.
pub const DEFAULT_ERROR_MESSAGE: &str = "operation failed";

impl ConsoleError {
    /// HTTP status code carried by the error, if it came from the admin API.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConsoleError::Unauthorized => Some(401),
            ConsoleError::NotFound(_) => Some(404),
            ConsoleError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an API error from a status code and a response body.
    ///
    /// The message is taken from `error_msg`, then `message`, then `error`,
    /// then the body itself when it is a plain string.
    pub fn from_response(status: u16, body: &serde_json::Value) -> Self {
        if status == 401 {
            return ConsoleError::Unauthorized;
        }
        let message = extract_error_message(body)
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        if status == 404 {
            return ConsoleError::NotFound(message);
        }
        ConsoleError::Api { status, message }
    }

    /// Human-readable message, preferring what the gateway reported.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Api { message, .. } | ConsoleError::NotFound(message) => message.clone(),
            ConsoleError::Transport(msg) if !msg.is_empty() => msg.clone(),
            ConsoleError::Transport(_) => DEFAULT_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Pull the most specific error message out of an admin API error body.
pub fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    if let Some(s) = body.as_str() {
        return (!s.is_empty()).then(|| s.to_string());
    }
    ["error_msg", "message", "error"].iter().find_map(|key| {
        body.get(*key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
