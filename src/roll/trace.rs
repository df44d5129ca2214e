//! Text traces of evaluated operands, shown to players next to the result.

use crate::common::*;

/// `3d6={1, 2, 3}`, `20d6={...}` or `1d20`; the sum is not included.
pub fn dice(count: UInt, face: UInt, results: &[Int]) -> String {
    let mut out = format!("{}d{}", count, face);
    if results.len() > ELIDE_ABOVE {
        out.push_str("={...}");
    } else if count >= 2 {
        out.push_str(&format!("={{{}}}", join_values(results)));
    }
    out
}

/// Dice trace followed by its sum: `3d6={1, 2, 3}=6`.
pub fn dice_sum(count: UInt, face: UInt, results: &[Int], sum: Int) -> String {
    format!("{}={}", dice(count, face, results), sum)
}

/// `max(3d6={1, 2, 3})=3`.
pub fn extreme(name: &str, count: UInt, face: UInt, results: &[Int], value: Int) -> String {
    format!("{}({})={}", name, dice(count, face, results), value)
}

/// `[3d6={1, 2, 3}=6 + 2]=8`.
pub fn expr(parts: &[String], value: Int) -> String {
    format!("[{}]={}", parts.join(" "), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_trace() {
        assert_eq!(dice(1, 20, &[7]), "1d20");
        assert_eq!(dice(3, 6, &[1, 2, 3]), "3d6={1, 2, 3}");
        assert_eq!(dice(0, 6, &[0]), "0d6");
        assert_eq!(dice_sum(3, 0, &[0], 0), "3d0={0}=0");
        assert_eq!(dice_sum(2, 4, &[4, 4], 8), "2d4={4, 4}=8");
    }

    #[test]
    fn test_dice_trace_elision() {
        let sixteen = vec![1; 16];
        assert_eq!(
            dice(16, 6, &sixteen),
            format!("16d6={{{}}}", join_values(&sixteen))
        );
        assert_eq!(dice(17, 6, &[1; 17]), "17d6={...}");
    }

    #[test]
    fn test_extreme_and_expr_trace() {
        assert_eq!(extreme("max", 3, 6, &[1, 5, 3], 5), "max(3d6={1, 5, 3})=5");
        assert_eq!(extreme("min", 1, 6, &[4], 4), "min(1d6)=4");
        assert_eq!(
            expr(&["3d6={1, 2, 3}=6".into(), "+".into(), "2".into()], 8),
            "[3d6={1, 2, 3}=6 + 2]=8"
        );
    }
}
