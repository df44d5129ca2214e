use crate::common::*;

/// A whole roll input: expressions interleaved with words that are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roll {
    pub items: Vec<Item>,
}

impl Roll {
    pub(crate) fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        self.items.iter().filter_map(|item| match item {
            Item::Expr(e) => Some(e),
            Item::Word(_) => None,
        })
    }

    pub fn has_expression(&self) -> bool {
        self.expressions().next().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Expr(Expr),
    Word(String),
}

/// An operand followed by any number of `(operator, operand)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub first: Operand,
    pub rest: Vec<(Operator, Operand)>,
}

impl Expr {
    pub fn new(first: impl Into<Operand>) -> Self {
        Self {
            first: first.into(),
            rest: Vec::new(),
        }
    }

    pub fn push(&mut self, op: Operator, operand: impl Into<Operand>) {
        self.rest.push((op, operand.into()));
    }

    pub fn with(mut self, op: Operator, operand: impl Into<Operand>) -> Self {
        self.push(op, operand);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[enum_dispatch::enum_dispatch(Evaluate)]
pub enum Operand {
    Number(Number),
    Dice(Dice),
    Max(Max),
    Min(Min),
    Group(Group),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Number(pub UInt);

/// Dice as written; missing parts are filled in at evaluation time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct DiceSpec {
    pub count: Option<UInt>,
    pub face: Option<UInt>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Dice(pub DiceSpec);

impl Dice {
    pub fn new(count: Option<UInt>, face: Option<UInt>) -> Self {
        Self(DiceSpec { count, face })
    }

    /// `1d<default face>`, rolled when an input holds no expression at all.
    pub fn implicit() -> Self {
        Self::default()
    }

    pub fn count(&self) -> UInt {
        self.0.count.unwrap_or(1)
    }

    pub fn face_or(&self, default_face: UInt) -> UInt {
        self.0.face.unwrap_or(default_face)
    }
}

impl From<DiceSpec> for Dice {
    fn from(spec: DiceSpec) -> Self {
        Self(spec)
    }
}

/// `max(NdF)`: the single highest draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Max(pub Dice);

/// `min(NdF)`: the single lowest draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Min(pub Dice);

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group(pub Box<Expr>);

impl Group {
    pub fn new(expr: Expr) -> Self {
        Self(Box::new(expr))
    }
}
