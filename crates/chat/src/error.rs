//! Errors returned by the chat backend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    /// No API key was configured.
    #[error(
        "Cerebras API Key is missing. Please set CEREBRAS_API_KEY in your environment or a .env file."
    )]
    MissingApiKey,

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured model does not exist on the backend.
    #[error("Model not found (404): '{0}'")]
    ModelNotFound(String),

    /// The backend answered with a non-success status.
    #[error("Chat API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The backend returned no completion text.
    #[error("Received an empty response from the chat API.")]
    EmptyResponse,
}
