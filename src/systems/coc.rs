use super::SystemError;
use crate::common::{Int, UInt};
use crate::entity::{CocRoll, Entity};
use crate::roll::{draw, Roller};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static NUMBER: OnceLock<Regex> = OnceLock::new();

fn number_regex() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"[0-9]{1,2}").expect("valid pattern"))
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Modifier {
    /// Keep the lowest of the drawn dice.
    Bonus,
    /// Keep the highest.
    Penalty,
}

impl Modifier {
    /// `+` is a bonus die and `-` a penalty die.
    pub fn from_sign(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Bonus),
            '-' => Some(Self::Penalty),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bonus => "Bonus die",
            Self::Penalty => "Penalty die",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SuccessLevel {
    Critical,
    Extreme,
    Hard,
    Regular,
    Fail,
    Fumble,
}

impl SuccessLevel {
    pub fn of(rolled: Int, skill: Int) -> Self {
        if rolled == 1 {
            Self::Critical
        } else if rolled <= skill / 5 {
            Self::Extreme
        } else if rolled <= skill / 2 {
            Self::Hard
        } else if rolled <= skill {
            Self::Regular
        } else if rolled == 100 || (rolled >= 95 && skill < 50) {
            Self::Fumble
        } else {
            Self::Fail
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Extreme => "EXTREME SUCCESS",
            Self::Hard => "HARD SUCCESS",
            Self::Regular => "SUCCESS",
            Self::Fail => "FAIL",
            Self::Fumble => "FUMBLE",
        }
    }

    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Fail | Self::Fumble)
    }
}

impl fmt::Display for SuccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A percentile skill check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocCheck {
    pub skill: Int,
    pub modifier: Option<Modifier>,
    /// Dice drawn in addition to the first one when a modifier applies.
    pub extra: UInt,
}

impl CocCheck {
    /// Reads the skill value from the first one- or two-digit number in
    /// `text`. With a modifier and two numbers, the first is the number of
    /// extra dice and the second the skill.
    pub fn parse(text: &str, modifier: Option<Modifier>) -> Result<Self, SystemError> {
        let numbers: Vec<UInt> = number_regex()
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        let (extra, skill) = match (modifier, numbers.as_slice()) {
            (_, []) => return Err(SystemError::NeedSkillValue),
            (Some(_), [extra, skill, ..]) => (*extra, *skill),
            (Some(_), [skill]) => (1, *skill),
            (None, [skill, ..]) => (0, *skill),
        };
        Ok(Self {
            skill: Int::from(skill),
            modifier,
            extra,
        })
    }

    pub fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> CocOutcome {
        let extra = if self.modifier.is_some() { self.extra } else { 0 };
        let candidates = draw(roller, 1 + extra, 100);
        let rolled = match self.modifier {
            None => *candidates.first(),
            Some(Modifier::Bonus) => candidates.iter().copied().fold(*candidates.first(), Int::min),
            Some(Modifier::Penalty) => candidates.iter().copied().fold(*candidates.first(), Int::max),
        };
        let level = SuccessLevel::of(rolled, self.skill);
        tracing::debug!(skill = self.skill, rolled, ?level, "coc check");
        CocOutcome {
            rolled,
            level,
            modifier: self.modifier,
            candidates: candidates.into_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocOutcome {
    pub rolled: Int,
    pub level: SuccessLevel,
    pub modifier: Option<Modifier>,
    pub candidates: Vec<Int>,
}

impl CocOutcome {
    pub fn to_entity(&self) -> Entity {
        Entity::from(CocRoll {
            rolled: self.rolled,
            level: self.level.label().to_owned(),
            modifier: self.modifier.map(|m| m.label().to_owned()),
            candidates: self.candidates.clone(),
        })
    }
}
