/// Convenience result type used across slidepress.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy.
///
/// `Load` and `Encode` are fatal for a run. `Command` and `Asset` are recoverable:
/// the interpreter reports them and skips the single command that raised them.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// The show description could not be read.
    #[error("load error: {0}")]
    Load(String),

    /// Unknown verb, wrong argument count, or an unresolved font/template/image name.
    #[error("command error: {0}")]
    Command(String),

    /// A font or image failed to read, decode, rasterize or resample.
    #[error("asset error: {0}")]
    Asset(String),

    /// Function table registration misuse.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// A rendered slide could not be written.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`SlideError::Command`] value.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Build a [`SlideError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`SlideError::Dispatch`] value.
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    /// Build a [`SlideError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// True for errors that must stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Encode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
