use super::{
    error::RollError,
    roller::{draw, Roller},
    trace, RResult, Rolled, Segment,
};
use crate::common::*;
use crate::parse::ast::{self, Dice, Group, Item, Max, Min, Number, Operand};

/// The value of one evaluated operand together with its trace text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluated {
    pub value: Int,
    pub trace: String,
}

#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn evaluate<R: Roller + ?Sized>(&self, ctx: &mut RollContext<R>) -> RResult<Evaluated>;
}

pub struct RollContext<'r, R: ?Sized> {
    default_face: UInt,
    roller: &'r mut R,
}

impl<'r, R: Roller + ?Sized> RollContext<'r, R> {
    pub fn new(default_face: UInt, roller: &'r mut R) -> Self {
        Self {
            default_face,
            roller,
        }
    }

    pub fn default_face(&self) -> UInt {
        self.default_face
    }

    pub fn draw(&mut self, count: UInt, face: UInt) -> NonEmpty<Int> {
        draw(&mut *self.roller, count, face)
    }

    /// Evaluates every expression in order; the value is that of the last one.
    pub fn eval(&mut self, roll: &ast::Roll) -> RResult<Rolled> {
        let (mut segments, last) = self.eval_segments(roll)?;
        let value = match last {
            Some(value) => value,
            None => {
                let implicit = self.implicit()?;
                let value = implicit.value;
                segments.insert(0, implicit.into());
                value
            }
        };

        let rolled = Rolled::new(value, segments);
        tracing::debug!(value, trace = %rolled.display(), "evaluated roll");
        Ok(rolled)
    }

    /// Evaluates without adding an implicit die; also returns the last expression's value.
    pub fn eval_segments(&mut self, roll: &ast::Roll) -> RResult<(Vec<Segment>, Option<Int>)> {
        let mut segments = Vec::with_capacity(roll.items.len());
        let mut last = None;
        for item in &roll.items {
            match item {
                Item::Word(word) => segments.push(Segment::Literal(word.clone())),
                Item::Expr(expr) => {
                    let evaluated = expr.evaluate(self)?;
                    last = Some(evaluated.value);
                    segments.push(evaluated.into());
                }
            }
        }
        Ok((segments, last))
    }

    /// Rolls `1d<default face>`, used when the input holds no expression.
    pub fn implicit(&mut self) -> RResult<Evaluated> {
        Dice::implicit().evaluate(self)
    }
}

impl Evaluate for Number {
    fn evaluate<R: Roller + ?Sized>(&self, _: &mut RollContext<R>) -> RResult<Evaluated> {
        Ok(Evaluated {
            value: Int::from(self.0),
            trace: self.0.to_string(),
        })
    }
}

impl Evaluate for Dice {
    fn evaluate<R: Roller + ?Sized>(&self, ctx: &mut RollContext<R>) -> RResult<Evaluated> {
        let count = self.count();
        let face = self.face_or(ctx.default_face());
        let results = ctx.draw(count, face);
        let sum: Int = results.iter().sum();
        Ok(Evaluated {
            value: sum,
            trace: trace::dice_sum(count, face, &results, sum),
        })
    }
}

fn evaluate_extreme<R: Roller + ?Sized>(
    ctx: &mut RollContext<R>,
    dice: &Dice,
    name: &str,
    pick: fn(Int, Int) -> Int,
) -> Evaluated {
    let count = dice.count();
    let face = dice.face_or(ctx.default_face());
    let results = ctx.draw(count, face);
    let value = results.iter().copied().fold(*results.first(), pick);
    Evaluated {
        value,
        trace: trace::extreme(name, count, face, &results, value),
    }
}

impl Evaluate for Max {
    fn evaluate<R: Roller + ?Sized>(&self, ctx: &mut RollContext<R>) -> RResult<Evaluated> {
        Ok(evaluate_extreme(ctx, &self.0, "max", Int::max))
    }
}

impl Evaluate for Min {
    fn evaluate<R: Roller + ?Sized>(&self, ctx: &mut RollContext<R>) -> RResult<Evaluated> {
        Ok(evaluate_extreme(ctx, &self.0, "min", Int::min))
    }
}

impl Evaluate for Group {
    fn evaluate<R: Roller + ?Sized>(&self, ctx: &mut RollContext<R>) -> RResult<Evaluated> {
        self.0.evaluate(ctx)
    }
}

impl Evaluate for ast::Expr {
    fn evaluate<R: Roller + ?Sized>(&self, ctx: &mut RollContext<R>) -> RResult<Evaluated> {
        let first = self.first.evaluate(ctx)?;
        let mut parts = Vec::with_capacity(self.rest.len() * 2 + 1);
        parts.push(first.trace);

        // Every operand is rolled before any operator is applied.
        let mut rest = Vec::with_capacity(self.rest.len());
        for (op, operand) in &self.rest {
            let evaluated = operand.evaluate(ctx)?;
            parts.push(op.to_string());
            parts.push(evaluated.trace);
            rest.push((*op, evaluated.value));
        }

        let value = fold(first.value, &rest)?;
        Ok(Evaluated {
            value,
            trace: trace::expr(&parts, value),
        })
    }
}

/// Collapses every `*` and `/` into its left neighbour in one left-to-right
/// pass, then folds the remaining `+` and `-` left to right.
pub(crate) fn fold(first: Int, rest: &[(Operator, Int)]) -> RResult<Int> {
    let mut terms = Vec::with_capacity(rest.len() + 1);
    let mut lead = Operator::Add;
    let mut current = first;
    for &(op, value) in rest {
        if op.is_multiplicative() {
            current = apply(op, current, value)?;
        } else {
            terms.push((lead, current));
            lead = op;
            current = value;
        }
    }
    terms.push((lead, current));

    terms
        .into_iter()
        .try_fold(0, |acc, (op, value)| apply(op, acc, value))
}

fn apply(op: Operator, a: Int, b: Int) -> RResult<Int> {
    let result = match op {
        Operator::Add => a.checked_add(b),
        Operator::Sub => a.checked_sub(b),
        Operator::Mul => a.checked_mul(b),
        Operator::Div if b == 0 => return Err(RollError::ZeroDivision),
        Operator::Div => floor_div(a, b),
    };
    result.ok_or(RollError::Overflow)
}

fn floor_div(a: Int, b: Int) -> Option<Int> {
    let q = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::{ScriptedRoller, StepRoller};
    use Operator::*;

    fn mock_roller() -> StepRoller {
        StepRoller::new(1, 1)
    }

    fn eval(s: &str, face: UInt, roller: &mut impl Roller) -> RResult<Rolled> {
        let ast = crate::parse::parse(s)?;
        RollContext::new(face, roller).eval(&ast)
    }

    fn check(s: &str, expected_value: Int, expected_display: &str) {
        let rolled = eval(s, 20, &mut mock_roller()).unwrap();
        assert_eq!(rolled.value, expected_value);
        assert_eq!(rolled.display(), expected_display);
    }

    fn check_err(s: &str, expected: RollError) {
        let actual = eval(s, 20, &mut mock_roller());
        assert_eq!(actual.unwrap_err(), expected);
    }

    #[test]
    fn test_eval_number() {
        check("7", 7, "[7]=7");
    }

    #[test]
    fn test_eval_dice() {
        check("3d6", 6, "[3d6={1, 2, 3}=6]=6");
        check("1d20", 1, "[1d20=1]=1");
        check("d", 1, "[1d20=1]=1");
        check("2d", 3, "[2d20={1, 2}=3]=3");
        check("d8", 1, "[1d8=1]=1");
    }

    #[test]
    fn test_eval_scenario_dice_plus_number() {
        let mut roller = ScriptedRoller::new(&[4, 6, 1]);
        let rolled = eval("3d6+2", 20, &mut roller).unwrap();
        assert_eq!(rolled.value, 13);
        assert_eq!(rolled.display(), "[3d6={4, 6, 1}=11 + 2]=13");
    }

    #[test]
    fn test_eval_degenerate_dice() {
        check("0d6", 0, "[0d6=0]=0");
        check("3d0", 0, "[3d0={0}=0]=0");
        check("3d1", 3, "[3d1={1, 1, 1}=3]=3");
    }

    #[test]
    fn test_eval_elision() {
        let rolled = eval("17d1", 20, &mut mock_roller()).unwrap();
        assert_eq!(rolled.display(), "[17d1={...}=17]=17");
    }

    #[test]
    fn test_eval_extremes() {
        check("max(3d6)", 3, "[max(3d6={1, 2, 3})=3]=3");
        check("min(3d6)", 1, "[min(3d6={1, 2, 3})=1]=1");
        check("max(d6)", 1, "[max(1d6)=1]=1");
        check("max(0d6)", 0, "[max(0d6)=0]=0");
    }

    #[test]
    fn test_eval_operators() {
        check("1 + 2 * 3", 7, "[1 + 2 × 3]=7");
        check("10 - 2 - 3", 5, "[10 - 2 - 3]=5");
        check("7 / 2", 3, "[7 ÷ 2]=3");
        check("2 * 3 / 4", 1, "[2 × 3 ÷ 4]=1");
        check("1 - 8 / 3 * 3", -5, "[1 - 8 ÷ 3 × 3]=-5");
    }

    #[test]
    fn test_eval_floor_division() {
        check("(1 - 8) / 2", -4, "[[1 - 8]=-7 ÷ 2]=-4");
        check("(2 - 9) / (1 - 3)", 3, "[[2 - 9]=-7 ÷ [1 - 3]=-2]=3");
    }

    #[test]
    fn test_eval_words_and_last_value() {
        check(
            "hit 1d6 then 5 more",
            5,
            "hit [1d6=1]=1 then [5]=5 more",
        );
    }

    #[test]
    fn test_eval_implicit_dice() {
        check("", 1, "1d20=1");
        check("sneak attack", 1, "1d20=1 sneak attack");
    }

    #[test]
    fn test_eval_long_digit_runs_are_words() {
        check("12345", 1, "1d20=1 12345");
        check("1d10000", 1, "1d20=1 1d10000");
        check("roll 12345 now 3", 3, "roll 12345 now [3]=3");
    }

    #[test]
    fn test_err_zero_division() {
        check_err("1d6/0", RollError::ZeroDivision);
        check_err("4 / (1 - 1)", RollError::ZeroDivision);
        check_err("1 / 0d6", RollError::ZeroDivision);
    }

    #[test]
    fn test_zero_division_rolls_every_operand_first() {
        let mut roller = mock_roller();
        let _ = eval("1d6/0 + 2d6", 20, &mut roller);
        assert_eq!(roller.calls, 3);
    }

    #[test]
    fn test_err_overflow() {
        check_err("9999 * 9999 * 9999 * 9999 * 9999", RollError::Overflow);
    }

    #[test]
    fn test_fold_order() {
        assert_eq!(fold(2, &[(Add, 3), (Mul, 4)]), Ok(14));
        assert_eq!(fold(2, &[(Mul, 3), (Add, 4)]), Ok(10));
        assert_eq!(fold(20, &[(Div, 2), (Div, 5), (Sub, 1)]), Ok(1));
        assert_eq!(fold(5, &[]), Ok(5));
    }
}
