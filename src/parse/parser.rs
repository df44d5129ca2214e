use super::ast::*;
use super::error::{ParseError, ParseErrorKind};
use super::lexer::{tokens, Spanned, TokenKind};

type PResult<T> = Result<T, ParseError>;

/// Parentheses deeper than this abort the parse instead of recursing further.
pub const MAX_NESTING: usize = 32;

/// Recursive-descent parser with PEG semantics: every alternative either
/// matches or leaves the cursor where it started.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokens(source),
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> PResult<Roll> {
        self.parse_roll()
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|(kind, _)| *kind)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let kind = self.peek()?;
        self.pos += 1;
        Some(kind)
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn error_at<T>(&self, index: usize, kind: ParseErrorKind) -> PResult<T> {
        let span = match self.tokens.get(index) {
            Some((_, span)) => span.clone(),
            None => self.source.len()..self.source.len(),
        };
        Err(ParseError {
            kind,
            slice: self.source.get(span.clone()).unwrap_or_default().to_string(),
            span,
        })
    }

    /// Byte offset just past the last consumed token.
    fn consumed_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |(_, span)| span.end)
    }

    /// Moves the token cursor to the first token at or after `offset`.
    fn seek(&mut self, offset: usize) {
        self.pos = self.tokens.partition_point(|(_, span)| span.start < offset);
    }

    fn parse_roll(&mut self) -> PResult<Roll> {
        let mut items = Vec::new();
        let mut cursor = 0;

        loop {
            cursor = skip_whitespace(self.source, cursor);
            if cursor >= self.source.len() {
                break;
            }

            self.seek(cursor);
            let starts_here = self
                .tokens
                .get(self.pos)
                .map_or(false, |(_, span)| span.start == cursor);

            if starts_here {
                if let Some(expr) = self.parse_expr()? {
                    items.push(Item::Expr(expr));
                    cursor = self.consumed_end();
                    continue;
                }
            }

            let end = word_end(self.source, cursor);
            items.push(Item::Word(self.source[cursor..end].to_string()));
            cursor = end;
        }

        Ok(Roll::new(items))
    }

    fn parse_expr(&mut self) -> PResult<Option<Expr>> {
        let first = match self.parse_operand()? {
            Some(operand) => operand,
            None => return Ok(None),
        };
        let mut expr = Expr::new(first);

        while let Some(op) = self.peek().as_ref().and_then(TokenKind::as_operator) {
            let checkpoint = self.pos;
            self.advance();
            match self.parse_operand()? {
                Some(operand) => expr.push(op, operand),
                None => {
                    // A dangling operator is not part of the expression.
                    self.pos = checkpoint;
                    break;
                }
            }
        }

        Ok(Some(expr))
    }

    fn parse_operand(&mut self) -> PResult<Option<Operand>> {
        let start = self.pos;
        let operand = match self.advance() {
            Some(TokenKind::Dice(spec)) => Some(Operand::from(Dice::from(spec))),
            Some(TokenKind::Number(n)) => Some(Operand::from(Number(n))),
            Some(TokenKind::Max) => self.parse_extreme()?.map(|d| Operand::from(Max(d))),
            Some(TokenKind::Min) => self.parse_extreme()?.map(|d| Operand::from(Min(d))),
            Some(TokenKind::LeftParen) => self.parse_group()?,
            _ => None,
        };
        if operand.is_none() {
            self.pos = start;
        }
        Ok(operand)
    }

    /// The `(NdF)` part of `max(NdF)` and `min(NdF)`.
    fn parse_extreme(&mut self) -> PResult<Option<Dice>> {
        if !self.matches(TokenKind::LeftParen) {
            return Ok(None);
        }
        self.advance();
        let dice = match self.advance() {
            Some(TokenKind::Dice(spec)) => Dice::from(spec),
            _ => return Ok(None),
        };
        if !self.matches(TokenKind::RightParen) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(dice))
    }

    fn parse_group(&mut self) -> PResult<Option<Operand>> {
        if self.depth >= MAX_NESTING {
            // Report the parenthesis that was just consumed.
            return self.error_at(
                self.pos.saturating_sub(1),
                ParseErrorKind::NestingTooDeep { limit: MAX_NESTING },
            );
        }
        self.depth += 1;
        let inner = self.parse_expr();
        self.depth -= 1;

        let expr = match inner? {
            Some(expr) => expr,
            None => return Ok(None),
        };
        if !self.matches(TokenKind::RightParen) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(Operand::from(Group::new(expr))))
    }
}

fn skip_whitespace(s: &str, from: usize) -> usize {
    s[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(s.len(), |(i, _)| from + i)
}

fn word_end(s: &str, from: usize) -> usize {
    s[from..]
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map_or(s.len(), |(i, _)| from + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Operator::*;

    fn parse(s: &str) -> PResult<Roll> {
        Parser::new(s).parse()
    }

    fn check(s: &str, expected: Vec<Item>) {
        let parsed = parse(s).unwrap();
        assert_eq!(parsed.items, expected);
    }

    fn expr(e: Expr) -> Item {
        Item::Expr(e)
    }

    fn word(w: &str) -> Item {
        Item::Word(w.to_string())
    }

    fn dice(count: u32, face: u32) -> Dice {
        Dice::new(Some(count), Some(face))
    }

    #[test]
    fn test_parse_operands() {
        check("42", vec![expr(Expr::new(Number(42)))]);
        check("3d6", vec![expr(Expr::new(dice(3, 6)))]);
        check("d", vec![expr(Expr::new(Dice::new(None, None)))]);
        check("max(4d6)", vec![expr(Expr::new(Max(dice(4, 6))))]);
        check("min( 2d20 )", vec![expr(Expr::new(Min(dice(2, 20))))]);
    }

    #[test]
    fn test_parse_binary() {
        check(
            "3d6+2",
            vec![expr(Expr::new(dice(3, 6)).with(Add, Number(2)))],
        );
        check(
            "1 + 2 * 3 ÷ 4",
            vec![expr(
                Expr::new(Number(1))
                    .with(Add, Number(2))
                    .with(Mul, Number(3))
                    .with(Div, Number(4)),
            )],
        );
        check(
            "(1d4 - 1) × 2",
            vec![expr(
                Expr::new(Group::new(Expr::new(dice(1, 4)).with(Sub, Number(1))))
                    .with(Mul, Number(2)),
            )],
        );
    }

    #[test]
    fn test_parse_words() {
        check(
            "attack 1d20+5 with sword",
            vec![
                word("attack"),
                expr(Expr::new(dice(1, 20)).with(Add, Number(5))),
                word("with"),
                word("sword"),
            ],
        );
        check("", vec![]);
        check("   ", vec![]);
    }

    #[test]
    fn test_parse_expression_then_word_tail() {
        check("3d6abc", vec![expr(Expr::new(dice(3, 6))), word("abc")]);
        check("dog", vec![expr(Expr::new(Dice::new(None, None))), word("og")]);
    }

    #[test]
    fn test_parse_dangling_operator() {
        check("3d6+", vec![expr(Expr::new(dice(3, 6))), word("+")]);
        check("2 * x", vec![expr(Expr::new(Number(2))), word("*"), word("x")]);
    }

    #[test]
    fn test_parse_unmatched_fallback() {
        check("(3d6", vec![word("(3d6")]);
        check("max(3)", vec![word("max(3)")]);
        check("maximum", vec![word("maximum")]);
        check("12345", vec![word("12345")]);
    }

    #[test]
    fn test_parse_unicode_words() {
        check(
            "攻击 d20 。",
            vec![word("攻击"), expr(Expr::new(Dice::new(None, Some(20)))), word("。")],
        );
    }

    #[test]
    fn test_parse_too_deep() {
        let input = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        let err = parse(&input).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::NestingTooDeep { limit: MAX_NESTING }
        );
        assert_eq!(err.span.start, MAX_NESTING);
    }

    #[test]
    fn test_parse_nested_within_limit() {
        let input = format!("{}1{}", "(".repeat(5), ")".repeat(5));
        let roll = parse(&input).unwrap();
        assert_eq!(roll.expressions().count(), 1);
    }
}
