use crate::parse::ParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollError {
    #[error("roll syntax error: {0}")]
    Syntax(#[from] ParseError),
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("roll result is too large")]
    Overflow,
}

/// Fieldless mirror of [`RollError`] for callers that pick a localized message.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RollErrorKind {
    RollSyntaxError,
    ZeroDivision,
    Overflow,
}

impl RollError {
    pub fn kind(&self) -> RollErrorKind {
        match self {
            Self::Syntax(_) => RollErrorKind::RollSyntaxError,
            Self::ZeroDivision => RollErrorKind::ZeroDivision,
            Self::Overflow => RollErrorKind::Overflow,
        }
    }
}

impl RollErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RollSyntaxError => "ROLL_SYNTAX_ERROR",
            Self::ZeroDivision => "ZERO_DIVISION",
            Self::Overflow => "OVERFLOW",
        }
    }
}
