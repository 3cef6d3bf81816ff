pub type PortraResult<T> = Result<T, PortraError>;

#[derive(thiserror::Error, Debug)]
pub enum PortraError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unknown adjustment: {0}")]
    UnknownAdjustment(String),

    #[error("unknown blend mode: {0}")]
    UnknownBlendMode(String),

    #[error("remote generation failed: {0}")]
    RemoteGeneration(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PortraError {
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn unknown_adjustment(msg: impl Into<String>) -> Self {
        Self::UnknownAdjustment(msg.into())
    }

    pub fn unknown_blend_mode(msg: impl Into<String>) -> Self {
        Self::UnknownBlendMode(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteGeneration(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
