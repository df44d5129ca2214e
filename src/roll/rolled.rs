use super::ctx::Evaluated;
use crate::common::Int;
use crate::entity::{Entities, Entity};

/// One piece of an evaluated roll, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A word that was not an expression, kept verbatim.
    Literal(String),
    Computed { text: String, value: Int },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal(text) | Segment::Computed { text, .. } => text,
        }
    }
}

impl From<Evaluated> for Segment {
    fn from(ev: Evaluated) -> Self {
        Segment::Computed {
            text: ev.trace,
            value: ev.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rolled {
    /// Value of the last expression, or of the implicit die.
    pub value: Int,
    pub segments: Vec<Segment>,
}

impl Rolled {
    pub fn new(value: Int, segments: Vec<Segment>) -> Self {
        Self { value, segments }
    }

    pub fn display(&self) -> String {
        self.segments
            .iter()
            .map(Segment::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Literal runs become spans (keeping the separating spaces) and every
    /// computed segment becomes a roll result.
    pub fn to_entities(&self) -> Entities {
        segments_to_entities(&self.segments)
    }
}

pub(crate) fn segments_to_entities(segments: &[Segment]) -> Entities {
    let mut entities = Entities::new();
    let mut pending = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            pending.push(' ');
        }
        match segment {
            Segment::Literal(text) => pending.push_str(text),
            Segment::Computed { text, value } => {
                if !pending.is_empty() {
                    entities.push(Entity::span(std::mem::take(&mut pending)));
                }
                entities.push(Entity::roll(text.clone(), *value));
            }
        }
    }
    if !pending.is_empty() {
        entities.push(Entity::span(pending));
    }
    entities
}
