use super::SystemError;
use crate::common::{Int, UInt};
use crate::entity::{Entities, Entity};
use crate::roll::{draw, Roller};
use regex::Regex;
use std::sync::OnceLock;

/// Largest pool; the count is at most two digits.
pub const MAX_POOL: UInt = 99;

static COUNT: OnceLock<Regex> = OnceLock::new();

fn count_regex() -> &'static Regex {
    COUNT.get_or_init(|| Regex::new(r"^\s*([0-9]+)\s*").expect("valid pattern"))
}

/// A pool of d6 where every six is a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopRoll {
    pub count: UInt,
    pub description: String,
}

impl LoopRoll {
    /// `"3 climb the tower"` is three dice described as "climb the tower".
    pub fn parse(text: &str) -> Result<Self, SystemError> {
        let caps = count_regex().captures(text).ok_or(SystemError::LoopSyntax)?;
        let (whole, digits) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(digits)) => (whole, digits.as_str()),
            _ => return Err(SystemError::LoopSyntax),
        };
        if digits.len() > 2 {
            return Err(SystemError::LoopTooManyDice { max: MAX_POOL });
        }
        let count: UInt = digits.parse().map_err(|_| SystemError::LoopSyntax)?;
        if count == 0 {
            return Err(SystemError::LoopZeroDice);
        }
        Ok(Self {
            count,
            description: text[whole.end()..].to_owned(),
        })
    }

    pub fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> LoopOutcome {
        let rolled = draw(roller, self.count, 6).into_vec();
        let outcome = LoopOutcome {
            rolled,
            description: self.description.clone(),
        };
        tracing::debug!(count = self.count, hits = outcome.hits(), "loop roll");
        outcome
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub rolled: Vec<Int>,
    pub description: String,
}

impl LoopOutcome {
    pub fn hits(&self) -> usize {
        self.rolled.iter().filter(|&&v| v == 6).count()
    }

    /// The pool result, followed by the description when there is one.
    pub fn to_entities(&self) -> Entities {
        let mut entities = Entities::new();
        entities.push(Entity::loop_roll(self.rolled.clone()));
        if !self.description.is_empty() {
            entities.push(Entity::span(format!(" {}", self.description)));
        }
        entities
    }
}
