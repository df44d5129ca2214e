mod ctx;
mod error;
mod rolled;
mod roller;
pub(crate) mod trace;

use crate::common::{Int, UInt};

type RResult<T> = Result<T, RollError>;

pub use ctx::{Evaluate, Evaluated, RollContext};
pub use error::{RollError, RollErrorKind};
pub use rolled::{Rolled, Segment};
pub use roller::{draw, DefaultRoller, Roller};

pub(crate) use rolled::segments_to_entities;

#[cfg(test)]
pub(crate) use roller::{ScriptedRoller, StepRoller};

/// Rolls every expression in `expression` with the system random source.
///
/// Returns the value of the last expression and the display text, in which
/// every word that is not an expression is kept verbatim.
pub fn roll(expression: &str, default_face: UInt) -> RResult<(Int, String)> {
    let rolled = roll_with(expression, default_face, &mut DefaultRoller::default())?;
    Ok((rolled.value, rolled.display()))
}

pub fn roll_with<R: Roller + ?Sized>(
    expression: &str,
    default_face: UInt,
    roller: &mut R,
) -> RResult<Rolled> {
    let ast = crate::parse::parse(expression)?;
    RollContext::new(default_face, roller).eval(&ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Splits `[NdF={a, b}=s]=v` into the listed values and the sum.
    fn listed(trace: &str) -> (Vec<Int>, Int) {
        let open = trace.find('{').unwrap();
        let close = trace.find('}').unwrap();
        let values = trace[open + 1..close]
            .split(", ")
            .map(|v| v.parse().unwrap())
            .collect();
        let rest = &trace[close + 2..];
        let end = rest.find(|c| c == ' ' || c == ']').unwrap();
        (values, rest[..end].parse().unwrap())
    }

    #[test]
    fn test_roll_scenario() {
        let (value, text) = roll("3d6+2", 20).unwrap();
        assert!((5..=20).contains(&value));
        assert!(text.starts_with("[3d6={"));
        assert!(text.ends_with(&format!(" + 2]={}", value)));
        let (values, sum) = listed(&text);
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| (1..=6).contains(v)));
        assert_eq!(values.iter().sum::<Int>(), sum);
        assert_eq!(sum + 2, value);
    }

    #[test]
    fn test_roll_default_face_shape() {
        for _ in 0..20 {
            let (value, text) = roll("d", 8).unwrap();
            assert!((1..=8).contains(&value));
            assert_eq!(text, format!("[1d8={}]={}", value, value));
        }
        let mut a = StepRoller::new(3, 0);
        let mut b = StepRoller::new(3, 0);
        assert_eq!(
            roll_with("d", 8, &mut a).unwrap(),
            roll_with("1d8", 8, &mut b).unwrap()
        );
    }

    #[test]
    fn test_roll_zero_division() {
        for _ in 0..20 {
            let err = roll("1d6/0", 20).unwrap_err();
            assert_eq!(err.kind(), RollErrorKind::ZeroDivision);
            assert_eq!(err.kind().as_str(), "ZERO_DIVISION");
        }
    }

    #[test]
    fn test_roll_syntax_error() {
        let deep = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        let err = roll(&deep, 20).unwrap_err();
        assert_eq!(err.kind().as_str(), "ROLL_SYNTAX_ERROR");
    }

    proptest! {
        #[test]
        fn prop_dice_trace_lists_every_draw(count in 2u32..=16, face in 2u32..=9999) {
            let (value, text) = roll(&format!("{}d{}", count, face), 20).unwrap();
            let (values, sum) = listed(&text);
            prop_assert_eq!(values.len(), count as usize);
            prop_assert!(values.iter().all(|v| (1..=Int::from(face)).contains(v)));
            prop_assert_eq!(values.iter().sum::<Int>(), sum);
            prop_assert_eq!(sum, value);
        }

        #[test]
        fn prop_large_dice_elide(count in 17u32..=200, face in 1u32..=9999) {
            let (value, text) = roll(&format!("{}d{}", count, face), 20).unwrap();
            prop_assert_eq!(text, format!("[{}d{}={{...}}={}]={}", count, face, value, value));
        }
    }
}
