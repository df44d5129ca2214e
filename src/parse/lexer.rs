use super::ast::DiceSpec;
use crate::common::*;
use logos::Logos;
use std::ops::Range;

pub type Spanned = (TokenKind, Range<usize>);

/// Lexes the whole input once. Whitespace never appears inside a token, so the
/// parser can resume at any word boundary without lexing again.
pub fn tokens(s: &str) -> Vec<Spanned> {
    TokenKind::lexer(s).spanned().collect()
}

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[0-9]*d[0-9]*", |lex| parse_dice(lex.slice()))]
    Dice(DiceSpec),
    #[regex(r"[0-9]+", |lex| parse_number(lex.slice()))]
    Number(UInt),

    #[token("max")]
    Max,
    #[token("min")]
    Min,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    #[token("×")]
    Star,
    #[token("/")]
    #[token("÷")]
    Slash,

    #[regex(r"\s+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_operator(&self) -> Option<Operator> {
        use Operator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            _ => return None,
        })
    }
}

// Digit runs longer than four lex as an error, which turns the word into literal text.
fn parse_digits(s: &str) -> Option<Option<UInt>> {
    if s.is_empty() {
        Some(None)
    } else if s.len() > MAX_DIGITS {
        None
    } else {
        s.parse().ok().map(Some)
    }
}

fn parse_number(s: &str) -> Option<UInt> {
    parse_digits(s).flatten()
}

fn parse_dice(s: &str) -> Option<DiceSpec> {
    let (count, face) = s.split_once('d')?;
    Some(DiceSpec {
        count: parse_digits(count)?,
        face: parse_digits(face)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        tokens(s).into_iter().map(|(kind, _)| kind).collect()
    }

    fn dice(count: Option<UInt>, face: Option<UInt>) -> TokenKind {
        TokenKind::Dice(DiceSpec { count, face })
    }

    #[test]
    fn test_lex_dice() {
        assert_eq!(kinds("3d6"), vec![dice(Some(3), Some(6))]);
        assert_eq!(kinds("d20"), vec![dice(None, Some(20))]);
        assert_eq!(kinds("4d"), vec![dice(Some(4), None)]);
        assert_eq!(kinds("d"), vec![dice(None, None)]);
        assert_eq!(kinds("0d0"), vec![dice(Some(0), Some(0))]);
    }

    #[test]
    fn test_lex_long_digit_runs() {
        use TokenKind::*;
        assert_eq!(kinds("9999"), vec![Number(9999)]);
        assert_eq!(kinds("12345"), vec![Error]);
        assert_eq!(kinds("1d10000"), vec![Error]);
        assert_eq!(kinds("10000d6"), vec![Error]);
    }

    #[test]
    fn test_lex_expression() {
        use TokenKind::*;
        assert_eq!(
            kinds("max(2d6) + 3 × (1 ÷ 2) - 4*5/6"),
            vec![
                Max,
                LeftParen,
                dice(Some(2), Some(6)),
                RightParen,
                Plus,
                Number(3),
                Star,
                LeftParen,
                Number(1),
                Slash,
                Number(2),
                RightParen,
                Minus,
                Number(4),
                Star,
                Number(5),
                Slash,
                Number(6),
            ]
        );
    }

    #[test]
    fn test_lex_too_many_digits() {
        assert_eq!(kinds("12345"), vec![TokenKind::Error]);
        assert_eq!(kinds("1d10000"), vec![TokenKind::Error]);
        assert_eq!(kinds("9999d9999"), vec![dice(Some(9999), Some(9999))]);
    }

    #[test]
    fn test_spans_skip_whitespace() {
        let spans: Vec<_> = tokens("1  +\t2").into_iter().map(|(_, span)| span).collect();
        assert_eq!(spans, vec![0..1, 3..4, 5..6]);
    }
}
