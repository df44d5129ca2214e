//! Rendering targets for entities.
//!
//! Every target carries the same content; only the markup differs. A target
//! overrides the per-kind methods it needs and inherits the rest.

use super::{CharacterRef, CocRoll, Entity};
use crate::common::{join_values, Int};

pub trait Render {
    fn render(&self, entity: &Entity) -> String {
        match entity {
            Entity::Span { text } => self.span(text),
            Entity::Bold { text } => self.bold(text),
            Entity::Code { text } => self.code(text),
            Entity::Character(c) => self.character(c),
            Entity::Me(c) => self.me(c),
            Entity::RollResult { text, value } => self.roll_result(text, *value),
            Entity::LoopResult { rolled } => self.loop_result(rolled),
            Entity::CocResult(coc) => self.coc_result(coc),
        }
    }

    fn span(&self, text: &str) -> String {
        text.to_owned()
    }

    fn bold(&self, text: &str) -> String {
        format!("<b>{}</b>", text)
    }

    fn code(&self, text: &str) -> String {
        format!("<code>{}</code>", text)
    }

    fn line_break(&self) -> String {
        "\n".to_owned()
    }

    fn character(&self, c: &CharacterRef) -> String {
        self.bold(&c.name)
    }

    fn me(&self, c: &CharacterRef) -> String {
        self.character(c)
    }

    fn roll_result(&self, text: &str, _value: Option<Int>) -> String {
        self.code(text)
    }

    fn loop_result(&self, rolled: &[Int]) -> String {
        self.code(&loop_summary(rolled))
    }

    fn coc_result(&self, coc: &CocRoll) -> String {
        let mut out = format!("{} {}", self.code(&coc.rolled.to_string()), self.span(&coc.level));
        if let Some(modifier) = &coc.modifier {
            let candidates = format!("[{}]", join_values(&coc.candidates));
            out.push_str(&self.line_break());
            out.push_str(&format!("{}: {}", self.span(modifier), self.code(&candidates)));
        }
        out
    }
}

/// `(hits/total) [v1, v2, ...]`, where a hit is a six.
pub fn loop_summary(rolled: &[Int]) -> String {
    let hits = rolled.iter().filter(|&&v| v == 6).count();
    format!("({}/{}) [{}]", hits, rolled.len(), join_values(rolled))
}

/// The restricted markup accepted by the chat transport.
#[derive(Debug, Default, Copy, Clone)]
pub struct TransportHtml;

impl Render for TransportHtml {}

/// Escaped HTML for the web archive, with a CSS class per entity kind.
#[derive(Debug, Default, Copy, Clone)]
pub struct ArchiveHtml;

impl ArchiveHtml {
    fn tagged(&self, tag: &str, class: &str, text: &str) -> String {
        format!("<{tag} class=\"entity-{class}\">{}</{tag}>", escape(text))
    }

    fn character_of(&self, class: &str, c: &CharacterRef) -> String {
        format!(
            "<b class=\"entity-{}\" title=\"{}\">{}</b>",
            class,
            escape(&c.full_name),
            escape(&c.name)
        )
    }
}

impl Render for ArchiveHtml {
    fn span(&self, text: &str) -> String {
        escape(text).replace('\n', "<br>")
    }

    fn bold(&self, text: &str) -> String {
        self.tagged("b", "bold", text)
    }

    fn code(&self, text: &str) -> String {
        self.tagged("code", "code", text)
    }

    fn line_break(&self) -> String {
        "<br>".to_owned()
    }

    fn character(&self, c: &CharacterRef) -> String {
        self.character_of("character", c)
    }

    fn me(&self, c: &CharacterRef) -> String {
        self.character_of("me", c)
    }

    fn roll_result(&self, text: &str, _value: Option<Int>) -> String {
        self.tagged("code", "roll", text)
    }

    fn loop_result(&self, rolled: &[Int]) -> String {
        self.tagged("code", "loop-roll", &loop_summary(rolled))
    }
}

/// Bare text, for exports and logs.
#[derive(Debug, Default, Copy, Clone)]
pub struct PlainText;

impl Render for PlainText {
    fn bold(&self, text: &str) -> String {
        text.to_owned()
    }

    fn code(&self, text: &str) -> String {
        text.to_owned()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
