//! Structured message content: an ordered sequence of typed entities that is
//! persisted as JSON and rendered for the chat transport or the archive.

mod legacy;
pub mod render;

use crate::common::Int;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use render::{ArchiveHtml, PlainText, Render, TransportHtml};

/// Reference to a player's character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRef {
    #[serde(rename = "value")]
    pub name: String,
    pub player_id: i64,
    pub full_name: String,
}

impl CharacterRef {
    pub fn new(name: impl Into<String>, player_id: i64, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_id,
            full_name: full_name.into(),
        }
    }
}

/// Outcome of a Call of Cthulhu percentile check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CocRoll {
    pub rolled: Int,
    pub level: String,
    /// Label of the bonus or penalty die, when one was applied.
    #[serde(rename = "modifier_name")]
    pub modifier: Option<String>,
    /// Every d100 drawn; `rolled` is picked from these.
    #[serde(rename = "rolled_list")]
    pub candidates: Vec<Int>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Entity {
    Span {
        #[serde(rename = "value")]
        text: String,
    },
    Bold {
        #[serde(rename = "value")]
        text: String,
    },
    Code {
        #[serde(rename = "value")]
        text: String,
    },
    Character(CharacterRef),
    /// The speaking player's own character.
    Me(CharacterRef),
    #[serde(rename = "roll")]
    RollResult {
        #[serde(rename = "value")]
        text: String,
        #[serde(rename = "result", default)]
        value: Option<Int>,
    },
    #[serde(rename = "loop-roll")]
    LoopResult { rolled: Vec<Int> },
    #[serde(rename = "coc-roll")]
    CocResult(CocRoll),
}

impl Entity {
    pub fn span(text: impl Into<String>) -> Self {
        Entity::Span { text: text.into() }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Entity::Bold { text: text.into() }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Entity::Code { text: text.into() }
    }

    pub fn roll(text: impl Into<String>, value: Int) -> Self {
        Entity::RollResult {
            text: text.into(),
            value: Some(value),
        }
    }

    pub fn loop_roll(rolled: Vec<Int>) -> Self {
        Entity::LoopResult { rolled }
    }

    /// Wire name of the kind, as stored in the `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Span { .. } => "span",
            Entity::Bold { .. } => "bold",
            Entity::Code { .. } => "code",
            Entity::Character(_) => "character",
            Entity::Me(_) => "me",
            Entity::RollResult { .. } => "roll",
            Entity::LoopResult { .. } => "loop-roll",
            Entity::CocResult(_) => "coc-roll",
        }
    }

    pub fn is_me(&self) -> bool {
        matches!(self, Entity::Me(_))
    }

    pub fn render_with<T: Render + ?Sized>(&self, target: &T) -> String {
        target.render(self)
    }
}

impl From<CocRoll> for Entity {
    fn from(coc: CocRoll) -> Self {
        Entity::CocResult(coc)
    }
}

#[derive(Error, Debug)]
#[error("cannot decode entities: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entities(Vec<Entity>);

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.0.push(entity);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.0
    }

    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<Entity> {
        &mut self.0
    }

    pub fn has_me(&self) -> bool {
        self.0.iter().any(Entity::is_me)
    }

    /// Markup for the chat transport.
    pub fn render(&self) -> String {
        self.render_with(&TransportHtml)
    }

    /// Concatenates every entity's rendering, trimming only the ends of the whole.
    pub fn render_with<T: Render + ?Sized>(&self, target: &T) -> String {
        let joined: String = self.0.iter().map(|e| target.render(e)).collect();
        joined.trim().to_owned()
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Decodes a persisted array, skipping elements that do not decode.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let elements: Vec<Value> = serde_json::from_value(value)?;
        let mut entities = Entities::new();
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value(element) {
                Ok(entity) => entities.push(entity),
                Err(error) => tracing::warn!(index, %error, "skipping undecodable entity"),
            }
        }
        Ok(entities)
    }

    pub fn from_json(s: &str) -> Result<Self, DecodeError> {
        Self::from_value(serde_json::from_str(s)?)
    }

    /// Rebuilds entities from markup persisted before entities were stored.
    pub fn from_html(html: &str) -> Self {
        legacy::from_html(html)
    }
}

impl From<Vec<Entity>> for Entities {
    fn from(v: Vec<Entity>) -> Self {
        Self(v)
    }
}

impl FromIterator<Entity> for Entities {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Entity> for Entities {
    fn extend<I: IntoIterator<Item = Entity>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for Entities {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Entities {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
