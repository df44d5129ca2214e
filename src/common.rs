use std::fmt::{self, Write};
pub use vec1::vec1;

/// Signed type of every evaluated value.
pub type Int = i64;

/// Type used for dice counts, dice faces and number literals.
pub type UInt = u32;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Count, face and number literals are at most this many digits long.
pub const MAX_DIGITS: usize = 4;

/// Above this many results a dice trace shows `{...}` instead of every value.
pub const ELIDE_ABOVE: usize = 16;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// `*` and `/` are collapsed in the first evaluation pass.
    pub const fn is_multiplicative(self) -> bool {
        matches!(self, Self::Mul | Self::Div)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '×',
            Self::Div => '÷',
        };
        f.write_char(c)
    }
}

/// Joins values as `a, b, c`.
pub(crate) fn join_values(values: &[Int]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(Operator::Add.to_string(), "+");
        assert_eq!(Operator::Sub.to_string(), "-");
        assert_eq!(Operator::Mul.to_string(), "×");
        assert_eq!(Operator::Div.to_string(), "÷");
    }

    #[test]
    fn test_join_values() {
        assert_eq!(join_values(&[]), "");
        assert_eq!(join_values(&[4]), "4");
        assert_eq!(join_values(&[1, 2, 3]), "1, 2, 3");
    }
}
