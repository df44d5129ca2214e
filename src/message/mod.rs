//! Turns one incoming chat message into entities.

mod annotation;
mod directory;
pub mod variables;

use crate::common::{Int, UInt};
use crate::entity::{CharacterRef, Entities, Entity};
use crate::parse;
use crate::roll::{segments_to_entities, RollContext, RollError, Roller};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub use annotation::{Annotation, AnnotationKind};
pub use directory::{Directory, MemoryDirectory, Player, Snapshot};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("user {user_id} has no player in chat {chat_id}")]
    PlayerNotFound { chat_id: i64, user_id: i64 },
    #[error("message is empty")]
    EmptyMessage,
}

static ME: OnceLock<Regex> = OnceLock::new();

fn me_regex() -> &'static Regex {
    ME.get_or_init(|| Regex::new(r"[.。]me").expect("valid pattern"))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Builds an [`RpgMessage`] from a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct Resolver {
    snapshot: Snapshot,
    temp_name: Option<String>,
}

impl Resolver {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            temp_name: None,
        }
    }

    /// Speak as `name` instead of the player's character name.
    pub fn with_temp_name(mut self, name: impl Into<String>) -> Self {
        self.temp_name = Some(name.into());
        self
    }

    fn me(&self) -> CharacterRef {
        let mut me = self.snapshot.speaker().to_character();
        if let Some(name) = &self.temp_name {
            me.name = name.clone();
        }
        me
    }

    /// Walks `annotations` (ascending by offset) over `text`, then drops
    /// `start` chars from the front of the result.
    pub fn resolve(&self, text: &str, annotations: &[Annotation], start: usize) -> RpgMessage {
        let text = CharText::new(text);
        let mut msg = RpgMessage {
            entities: Entities::new(),
            tags: Vec::new(),
        };

        let mut cursor = 0;
        for annotation in annotations {
            if annotation.offset < cursor || annotation.offset >= text.len() {
                tracing::warn!(
                    offset = annotation.offset,
                    cursor,
                    "skipping annotation outside the remaining text"
                );
                continue;
            }
            let end = annotation.end().min(text.len());
            if end < annotation.end() {
                tracing::warn!(offset = annotation.offset, end, "clamping annotation to the text");
            }

            self.push_literal(&mut msg, text.slice(cursor, annotation.offset));
            let inner = text.slice(annotation.offset, end);
            self.push_annotated(&mut msg, &annotation.kind, inner);
            cursor = end;
        }
        self.push_literal(&mut msg, text.slice(cursor, text.len()));

        if start > 0 {
            msg.trim_start(start);
        }
        tracing::debug!(
            entities = msg.entities.len(),
            tags = msg.tags.len(),
            has_me = msg.has_me(),
            "resolved message"
        );
        msg
    }

    fn push_annotated(&self, msg: &mut RpgMessage, kind: &AnnotationKind, inner: &str) {
        tracing::trace!(?kind, inner, "annotation");
        match kind {
            AnnotationKind::Mention => {
                let username = inner.trim_start_matches('@');
                match self.snapshot.by_username(username) {
                    Some(player) => msg.entities.push(Entity::Character(player.to_character())),
                    None => msg.entities.push(Entity::span(inner)),
                }
            }
            AnnotationKind::ResolvedMention { user_id } => {
                if let Some(player) = self.snapshot.by_user_id(*user_id) {
                    msg.entities.push(Entity::Character(player.to_character()));
                }
            }
            AnnotationKind::Hashtag => {
                let tag = inner.trim_start_matches('#');
                if !tag.is_empty() && !msg.tags.iter().any(|t| t == tag) {
                    msg.tags.push(tag.to_owned());
                }
            }
            AnnotationKind::Bold => msg.entities.push(Entity::bold(inner)),
        }
    }

    /// Splits on `.me` markers and substitutes variables in the pieces between.
    fn push_literal(&self, msg: &mut RpgMessage, text: &str) {
        let mut last = 0;
        for marker in me_regex().find_iter(text) {
            if text[marker.end()..].chars().next().map_or(false, is_name_char) {
                continue;
            }
            self.push_substituted(msg, &text[last..marker.start()]);
            msg.entities.push(Entity::Me(self.me()));
            last = marker.end();
        }
        self.push_substituted(msg, &text[last..]);
    }

    fn push_substituted(&self, msg: &mut RpgMessage, text: &str) {
        if text.is_empty() {
            return;
        }
        let text = variables::substitute(text, self.snapshot.variables());
        if !text.is_empty() {
            msg.entities.push(Entity::span(text));
        }
    }
}

/// Text addressed by char offsets.
struct CharText<'a> {
    text: &'a str,
    /// Byte offset of every char, plus the text length.
    bounds: Vec<usize>,
}

impl<'a> CharText<'a> {
    fn new(text: &'a str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bounds }
    }

    fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.text[self.bounds[start]..self.bounds[end]]
    }
}

/// A resolved message: its entities and the hashtags found in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpgMessage {
    entities: Entities,
    tags: Vec<String>,
}

impl RpgMessage {
    pub fn resolve(snapshot: Snapshot, text: &str, annotations: &[Annotation], start: usize) -> Self {
        Resolver::new(snapshot).resolve(text, annotations, start)
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// Hashtags without the `#`, in first-seen order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_me(&self) -> bool {
        self.entities.has_me()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Fails when nothing was produced and no media accompanies the message.
    pub fn ensure_content(&self, has_media: bool) -> Result<(), ResolveError> {
        if self.is_empty() && !has_media {
            Err(ResolveError::EmptyMessage)
        } else {
            Ok(())
        }
    }

    pub fn into_parts(self) -> (Entities, Vec<String>) {
        (self.entities, self.tags)
    }

    fn trim_start(&mut self, start: usize) {
        let entities = self.entities.as_mut_vec();
        let long_span = matches!(
            entities.first(),
            Some(Entity::Span { text }) if text.chars().count() > start
        );
        if long_span {
            if let Some(Entity::Span { text }) = entities.first_mut() {
                let byte = text.char_indices().nth(start).map_or(text.len(), |(i, _)| i);
                text.replace_range(..byte, "");
            }
        } else if !entities.is_empty() {
            entities.remove(0);
        }
    }

    /// Rolls the dice expressions found in text spans, replacing each such
    /// span with its words and roll results. Without any expression an
    /// implicit `1d<default_face>` result is put first.
    ///
    /// Returns the value of the last expression. On error the message is
    /// left unchanged.
    pub fn evaluate_rolls<R: Roller + ?Sized>(
        &mut self,
        default_face: UInt,
        roller: &mut R,
    ) -> Result<Int, RollError> {
        let mut ctx = RollContext::new(default_face, roller);
        let mut resolved = Vec::with_capacity(self.entities.len());
        let mut last = None;
        for entity in self.entities.iter() {
            let text = match entity {
                Entity::Span { text } => text,
                other => {
                    resolved.push(other.clone());
                    continue;
                }
            };
            let roll = parse::parse(text)?;
            if !roll.has_expression() {
                resolved.push(entity.clone());
                continue;
            }
            let (segments, value) = ctx.eval_segments(&roll)?;
            last = value.or(last);
            resolved.extend(padded(text, segments_to_entities(&segments).into_vec()));
        }

        let value = match last {
            Some(value) => value,
            None => {
                let implicit = ctx.implicit()?;
                let mut head = vec![Entity::roll(implicit.trace, implicit.value)];
                if !resolved.is_empty() {
                    head.push(Entity::span(" "));
                }
                head.append(&mut resolved);
                resolved = head;
                implicit.value
            }
        };
        self.entities = Entities::from(resolved);
        tracing::debug!(value, "rolled message");
        Ok(value)
    }
}

/// Restores the whitespace around `source` that word splitting dropped.
fn padded(source: &str, mut entities: Vec<Entity>) -> Vec<Entity> {
    let leading = &source[..source.len() - source.trim_start().len()];
    let trailing = &source[source.trim_end().len()..];
    if !leading.is_empty() {
        match entities.first_mut() {
            Some(Entity::Span { text }) => text.insert_str(0, leading),
            _ => entities.insert(0, Entity::span(leading)),
        }
    }
    if !trailing.is_empty() {
        match entities.last_mut() {
            Some(Entity::Span { text }) => text.push_str(trailing),
            _ => entities.push(Entity::span(trailing)),
        }
    }
    entities
}
