//! Game-specific roll formulas built on [`crate::roll::draw`].

pub mod coc;
pub mod pool;

use crate::common::UInt;
use thiserror::Error;

pub use coc::{CocCheck, CocOutcome, Modifier, SuccessLevel};
pub use pool::{LoopOutcome, LoopRoll};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    #[error("a skill value is required")]
    NeedSkillValue,
    #[error("expected a number of dice first")]
    LoopSyntax,
    #[error("cannot roll zero dice")]
    LoopZeroDice,
    #[error("cannot roll more than {max} dice")]
    LoopTooManyDice { max: UInt },
}

impl SystemError {
    /// Stable code for localized messages.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NeedSkillValue => "COC_NEED_SKILL_VALUE",
            Self::LoopSyntax => "LOOP_SYNTAX_ERROR",
            Self::LoopZeroDice => "LOOP_ZERO_DICE",
            Self::LoopTooManyDice { .. } => "LOOP_TOO_MANY_DICE",
        }
    }
}
