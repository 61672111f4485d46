use thiserror::Error;

#[derive(Error, Debug)]
pub enum SphereError {
    #[error("event {0} not found in catalog")]
    NotFound(u32),

    #[error("event {0} is already in the cart")]
    AlreadyInCart(u32),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("invalid {what}: '{value}'")]
    Invalid { what: &'static str, value: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SphereError {
    /// True for the one lookup failure callers are expected to recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SphereError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, SphereError>;
