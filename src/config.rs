//! Per-chat roll settings.

use crate::common::{Int, UInt};
use crate::roll::{self, RollError};
use serde::{Deserialize, Serialize};

/// Largest face a chat can choose; faces are at most four digits.
pub const MAX_FACE: UInt = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    /// Face used by `d`, `3d` and the implicit die.
    pub default_face: UInt,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self { default_face: 100 }
    }
}

impl RollConfig {
    /// Set the default face (clamped to 1-9999).
    pub fn with_face(mut self, face: UInt) -> Self {
        self.default_face = face.clamp(1, MAX_FACE);
        self
    }

    pub fn roll(&self, expression: &str) -> Result<(Int, String), RollError> {
        roll::roll(expression, self.default_face)
    }
}
