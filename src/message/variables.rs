//! `$NAME` and `¥NAME` substitution.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Passes always allowed.
pub const PASSES: usize = 16;
/// Passes allowed after [`PASSES`] while the text stays short.
pub const EXTRA_PASSES: usize = 3;
/// Longest text, in chars, that still gets extra passes.
pub const EXTRA_PASS_LIMIT: usize = 256;

static VARIABLE: OnceLock<Regex> = OnceLock::new();

fn variable_regex() -> &'static Regex {
    VARIABLE.get_or_init(|| Regex::new(r"[$¥](\w{1,32})").expect("valid pattern"))
}

/// Chars a message may grow by through substitution. A pass that would
/// overshoot is dropped and the previous text kept.
pub const MAX_EXPANSION: usize = 16 * EXTRA_PASS_LIMIT;

enum Pass {
    Unchanged,
    Replaced(String),
    TooLong,
}

/// Replaces references to known variables, repeating while values contain
/// further references. Unknown names are left as written.
///
/// `variables` is keyed by upper-cased name.
pub fn substitute(text: &str, variables: &HashMap<String, String>) -> String {
    let mut text = text.to_owned();
    if variables.is_empty() {
        return text;
    }
    let limit = text.chars().count() + MAX_EXPANSION;
    for pass in 0..PASSES + EXTRA_PASSES {
        if pass >= PASSES && text.chars().count() > EXTRA_PASS_LIMIT {
            break;
        }
        match substitute_once(&text, variables, limit) {
            Pass::Replaced(next) => {
                tracing::trace!(pass, len = next.len(), "substituted variables");
                text = next;
            }
            Pass::TooLong => {
                tracing::warn!(pass, limit, "variable expansion too long, stopped");
                break;
            }
            Pass::Unchanged => break,
        }
    }
    text
}

fn substitute_once(text: &str, variables: &HashMap<String, String>, limit: usize) -> Pass {
    let mut out = String::with_capacity(text.len());
    let mut len = 0;
    let mut last = 0;
    for caps in variable_regex().captures_iter(text) {
        let (Some(whole), Some(value)) = (caps.get(0), variables.get(&caps[1].to_uppercase()))
        else {
            continue;
        };
        let head = &text[last..whole.start()];
        len += head.chars().count() + value.chars().count();
        if len > limit {
            return Pass::TooLong;
        }
        out.push_str(head);
        out.push_str(value);
        last = whole.end();
    }
    if last == 0 {
        return Pass::Unchanged;
    }
    let tail = &text[last..];
    if len + tail.chars().count() > limit {
        return Pass::TooLong;
    }
    out.push_str(tail);
    Pass::Replaced(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_uppercase(), v.to_string()))
            .collect()
    }

    fn check(text: &str, pairs: &[(&str, &str)], expected: &str) {
        assert_eq!(substitute(text, &vars(pairs)), expected);
    }

    #[test]
    fn test_substitute() {
        check("HP $HP left", &[("hp", "42")], "HP 42 left");
        check("$hp/¥Hp", &[("HP", "42")], "42/42");
        check("$MP stays", &[("hp", "42")], "$MP stays");
        check("cost: $", &[("hp", "42")], "cost: $");
        check("no vars $HP", &[], "no vars $HP");
    }

    #[test]
    fn test_nested_references() {
        check("$A", &[("a", "$B+1"), ("b", "$C+2"), ("c", "3")], "3+2+1");
    }

    #[test]
    fn test_self_reference_is_bounded() {
        let out = substitute("$X", &vars(&[("x", "$X")]));
        assert_eq!(out, "$X");

        // Doubles every pass until the next pass would overshoot.
        let out = substitute("$X", &vars(&[("x", "$X$X")]));
        assert!(out.chars().count() <= 2 + MAX_EXPANSION);
        assert_eq!(out.matches("$X").count(), 1 << 11);
    }

    #[test]
    fn test_fan_out_is_capped() {
        let out = substitute("$X", &vars(&[("x", "$X$X$X$X")]));
        assert!(out.chars().count() <= 2 + MAX_EXPANSION);
        assert_eq!(out.matches("$X").count(), 4usize.pow(5));

        let out = substitute("say $X!", &vars(&[("x", "$X$X$X$X")]));
        assert!(out.starts_with("say $X"));
        assert!(out.ends_with("$X!"));
    }

    #[test]
    fn test_long_value_is_kept_whole_or_not_at_all() {
        let long = "a".repeat(MAX_EXPANSION + 10);
        check("hp $HP", &[("hp", long.as_str())], "hp $HP");
        let fits = "a".repeat(MAX_EXPANSION);
        assert_eq!(substitute("$HP", &vars(&[("hp", fits.as_str())])), fits);
    }

    #[test]
    fn test_extra_passes_while_short() {
        let chain: Vec<(String, String)> = (0..PASSES + EXTRA_PASSES + 1)
            .map(|i| (format!("V{}", i), format!("$V{}", i + 1)))
            .collect();
        let pairs: Vec<(&str, &str)> = chain.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let expected = format!("$V{}", PASSES + EXTRA_PASSES);
        check("$V0", &pairs, &expected);
    }
}
