/// Result alias used across the crate.
pub type TwibbonResult<T> = Result<T, TwibbonError>;

/// Error taxonomy for the editor and its collaborators.
///
/// Form validation is not represented here: field-level problems are returned as
/// [`crate::FieldErrors`] values so the caller can render them inline.
#[derive(thiserror::Error, Debug)]
pub enum TwibbonError {
    /// Invalid argument or configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes could not be decoded into a layer.
    #[error("decode error: {0}")]
    Decode(String),

    /// The compositor could not produce or read back a surface.
    #[error("render error: {0}")]
    Render(String),

    /// A requested record or page does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator (message store, download log) failed.
    #[error("store error: {0}")]
    Store(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, usually an I/O or codec failure with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TwibbonError {
    /// Build a [`TwibbonError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TwibbonError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TwibbonError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TwibbonError::NotFound`].
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`TwibbonError::Store`].
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`TwibbonError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
