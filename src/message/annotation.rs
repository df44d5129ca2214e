use regex::Regex;
use std::sync::OnceLock;

static MENTION: OnceLock<Regex> = OnceLock::new();
static HASHTAG: OnceLock<Regex> = OnceLock::new();

fn mention_regex() -> &'static Regex {
    MENTION.get_or_init(|| Regex::new(r"@[A-Za-z0-9_]{5,}").expect("valid pattern"))
}

fn hashtag_regex() -> &'static Regex {
    HASHTAG.get_or_init(|| Regex::new(r"#\w+").expect("valid pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// `@username`, matched against the roster by username.
    Mention,
    /// A mention the transport already resolved to a user.
    ResolvedMention { user_id: i64 },
    Hashtag,
    Bold,
}

/// A structural marker over part of a message.
///
/// `offset` and `length` count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub offset: usize,
    pub length: usize,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    pub fn mention(offset: usize, length: usize) -> Self {
        Self::new(AnnotationKind::Mention, offset, length)
    }

    pub fn resolved_mention(user_id: i64, offset: usize, length: usize) -> Self {
        Self::new(AnnotationKind::ResolvedMention { user_id }, offset, length)
    }

    pub fn hashtag(offset: usize, length: usize) -> Self {
        Self::new(AnnotationKind::Hashtag, offset, length)
    }

    pub fn bold(offset: usize, length: usize) -> Self {
        Self::new(AnnotationKind::Bold, offset, length)
    }

    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Finds `@username` mentions and `#hashtags` in plain text, for
    /// messages that arrive without transport annotations.
    pub fn scan(text: &str) -> Vec<Annotation> {
        let to_chars = |byte: usize| text[..byte].chars().count();
        let mut found: Vec<Annotation> = mention_regex()
            .find_iter(text)
            .map(|m| (AnnotationKind::Mention, m))
            .chain(hashtag_regex().find_iter(text).map(|m| (AnnotationKind::Hashtag, m)))
            .map(|(kind, m)| {
                let offset = to_chars(m.start());
                Annotation::new(kind, offset, m.as_str().chars().count())
            })
            .collect();
        found.sort_by_key(|a| a.offset);
        found
    }
}
