use crate::common::{vec1, Int, NonEmpty, UInt};
use rand::{CryptoRng, Rng, RngCore};

/// Source of die results.
///
/// Implemented for every cryptographically secure generator; tests provide
/// their own deterministic implementations.
pub trait Roller {
    /// A uniform value in `1..=face`. Callers never pass a face below 2.
    fn roll(&mut self, face: UInt) -> UInt;
}

impl<R: RngCore + CryptoRng> Roller for R {
    fn roll(&mut self, face: UInt) -> UInt {
        self.gen_range(1..=face)
    }
}

pub type DefaultRoller = rand::rngs::OsRng;

/// Draws `count` dice with `face` sides.
///
/// A zero count or zero face yields the single result `0`, and one-sided dice
/// always show `1` without consulting the roller.
pub fn draw<R: Roller + ?Sized>(roller: &mut R, count: UInt, face: UInt) -> NonEmpty<Int> {
    if count == 0 || face == 0 {
        return vec1![0];
    }
    let mut one = || match face {
        1 => 1,
        _ => Int::from(roller.roll(face)),
    };
    let mut results = NonEmpty::new(one());
    for _ in 1..count {
        results.push(one());
    }
    results
}

#[cfg(test)]
pub(crate) use step::{ScriptedRoller, StepRoller};

#[cfg(test)]
mod step {
    use super::*;

    /// Yields `initial`, `initial + step`, ... wrapped into `1..=face`.
    pub(crate) struct StepRoller {
        current: UInt,
        step: UInt,
        pub(crate) calls: usize,
    }

    impl StepRoller {
        pub fn new(initial: UInt, step: UInt) -> Self {
            Self {
                current: initial,
                step,
                calls: 0,
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, face: UInt) -> UInt {
            let ret = (self.current.max(1) - 1) % face + 1;
            self.current += self.step;
            self.calls += 1;
            ret
        }
    }

    /// Replays a fixed list of results, cycling when it runs out.
    pub(crate) struct ScriptedRoller {
        values: Vec<UInt>,
        next: usize,
    }

    impl ScriptedRoller {
        pub fn new(values: &[UInt]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl Roller for ScriptedRoller {
        fn roll(&mut self, face: UInt) -> UInt {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value.clamp(1, face)
        }
    }
}
