//! Error types shared by the social integration and rendering layers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialError {
    #[error("user '{user_id}' has no {provider_id} connection")]
    NotConnected {
        provider_id: String,
        user_id: String,
    },

    #[error("authorization expired or revoked: {message}")]
    ExpiredAuthorization { message: String },

    #[error("rate limit exceeded (resets at {reset:?})")]
    RateLimitExceeded { reset: Option<i64> },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SocialError>;
