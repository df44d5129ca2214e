use crate::entity::DecodeError;
use crate::message::ResolveError;
use crate::parse::ParseError;
use crate::roll::RollError;
use crate::systems::SystemError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Roll(#[from] RollError),
    #[error(transparent)]
    System(#[from] SystemError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Roll(e.into())
    }
}

impl Error {
    /// Stable code for localized messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Roll(e) => e.kind().as_str(),
            Self::System(e) => e.code(),
            Self::Resolve(ResolveError::PlayerNotFound { .. }) => "PLAYER_NOT_FOUND",
            Self::Resolve(ResolveError::EmptyMessage) => "EMPTY_MESSAGE",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
