use super::{Entities, Entity};
use regex::Regex;
use std::sync::OnceLock;

static CODE: OnceLock<Regex> = OnceLock::new();
static BOLD: OnceLock<Regex> = OnceLock::new();

fn code_regex() -> &'static Regex {
    CODE.get_or_init(|| Regex::new(r"<code>(.+?)</code>").expect("valid pattern"))
}

fn bold_regex() -> &'static Regex {
    BOLD.get_or_init(|| Regex::new(r"<b>(.+?)</b>").expect("valid pattern"))
}

#[derive(Copy, Clone)]
enum Tag {
    Code,
    Bold,
}

/// Scans for `<code>` and `<b>` runs in text order; everything around them
/// becomes spans. A match overlapping an earlier one is ignored.
pub(super) fn from_html(html: &str) -> Entities {
    let mut matches = Vec::new();
    for (regex, tag) in [(code_regex(), Tag::Code), (bold_regex(), Tag::Bold)] {
        for caps in regex.captures_iter(html) {
            if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
                matches.push((whole.range(), inner.as_str(), tag));
            }
        }
    }
    matches.sort_by_key(|(range, ..)| range.start);

    let mut entities = Entities::new();
    let mut last = 0;
    for (range, inner, tag) in matches {
        if range.start < last {
            continue;
        }
        if range.start > last {
            entities.push(Entity::span(&html[last..range.start]));
        }
        entities.push(match tag {
            Tag::Code => Entity::code(inner),
            Tag::Bold => Entity::bold(inner),
        });
        last = range.end;
    }
    if last < html.len() {
        entities.push(Entity::span(&html[last..]));
    }
    entities
}
