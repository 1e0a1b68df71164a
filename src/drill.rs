use std::io::Write;
use std::time::Instant;

use crate::display::{self, BELL};
use crate::error::DrillError;
use crate::input::{KeySource, INTERRUPT_CHAR};
use crate::stats::SessionStats;

/// Result of drilling one line: whether the user completed it within the
/// failure budget, and the stats from every attempt made in the call.
#[derive(Debug)]
pub struct LineOutcome {
    pub succeeded: bool,
    pub stats: SessionStats,
}

/// Runs the character-matching state machine for a single target line.
///
/// The user must reproduce the line exactly. Any mismatch past the first
/// character resets the attempt to the start of the line and burns one unit
/// of the failure budget; mistyping the very first character only rings the
/// bell. Correctly typed characters are echoed to the output sink.
pub struct LineDrill<'a, K: KeySource, W: Write> {
    keys: &'a mut K,
    out: &'a mut W,
    track_chars: bool,
}

impl<'a, K: KeySource, W: Write> LineDrill<'a, K, W> {
    pub fn new(keys: &'a mut K, out: &'a mut W) -> Self {
        Self {
            keys,
            out,
            track_chars: false,
        }
    }

    /// Also collect the per-character accuracy breakdown.
    pub fn with_char_breakdown(mut self) -> Self {
        self.track_chars = true;
        self
    }

    /// Drill `target` until the user types it in full or the failure budget
    /// runs out. A negative `max_failures` disables the budget entirely.
    ///
    /// Returns [`DrillError::Interrupted`] the moment the interrupt
    /// character arrives; callers are expected to let that propagate.
    pub fn run(&mut self, target: &str, max_failures: i32) -> Result<LineOutcome, DrillError> {
        let expected: Vec<char> = target.chars().collect();

        writeln!(self.out, "{}", display::target_line(target))?;

        let mut stats = if self.track_chars {
            SessionStats::with_char_breakdown()
        } else {
            SessionStats::new()
        };
        let mut cursor = 0usize;
        let mut failures_remaining = max_failures;

        while cursor < expected.len() {
            let typed = self.keys.read_key()?;

            if typed == INTERRUPT_CHAR {
                return Err(DrillError::Interrupted);
            }

            let want = expected[cursor];

            if typed == want {
                write!(self.out, "{}", want)?;
                self.out.flush()?;

                stats.type_char(true, want, Instant::now());
                cursor += 1;
            } else if cursor > 0 {
                // A mistyped newline renders as nothing to keep output tidy.
                let shown = if typed == '\n' {
                    String::new()
                } else {
                    typed.to_string()
                };
                writeln!(self.out, "{}{}", BELL, display::miss(shown))?;

                stats.type_char(false, want, Instant::now());
                stats.end_attempt(false);

                // Saturating: a negative (disabled) budget must never wrap
                // back up toward zero, however long the drill runs.
                failures_remaining = failures_remaining.saturating_sub(1);
                if failures_remaining == 0 {
                    return Ok(LineOutcome {
                        succeeded: false,
                        stats,
                    });
                }

                cursor = 0;
            } else {
                // No penalty for mistyping before the line is underway.
                write!(self.out, "{}", BELL)?;
                self.out.flush()?;
            }
        }

        writeln!(self.out)?;
        stats.end_attempt(true);

        Ok(LineOutcome {
            succeeded: true,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedKeys;
    use assert_matches::assert_matches;

    fn run_drill(script: &str, target: &str, max_failures: i32) -> LineOutcome {
        let mut keys = ScriptedKeys::new(script);
        let mut out = Vec::new();
        LineDrill::new(&mut keys, &mut out)
            .run(target, max_failures)
            .unwrap()
    }

    #[test]
    fn test_clean_line_succeeds() {
        let outcome = run_drill("cat", "cat", 10);

        assert!(outcome.succeeded);
        assert_eq!(outcome.stats.total_line_wpm.chars, 3);
        assert_eq!(outcome.stats.correct_line_wpm.chars, 3);
        assert_eq!(outcome.stats.accuracy(), Some(1.0));
    }

    #[test]
    fn test_mismatch_resets_line_then_succeeds() {
        // "c a x" burns one failure and restarts; "c a t" then completes.
        let outcome = run_drill("caxcat", "cat", 10);

        assert!(outcome.succeeded);
        assert_eq!(outcome.stats.total_line_wpm.chars, 6);
        assert_eq!(outcome.stats.correct_line_wpm.chars, 3);
        assert_eq!(outcome.stats.total_acc.incorrect, 1);
    }

    #[test]
    fn test_budget_of_one_fails_on_first_mismatch() {
        let outcome = run_drill("ax", "ab", 1);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.stats.total_line_wpm.chars, 2);
        assert_eq!(outcome.stats.correct_line_wpm.chars, 0);
    }

    #[test]
    fn test_failure_returns_stats_across_attempts() {
        // Two failed attempts' keystrokes all land in the totals. Each
        // attempt must restart from 'a': a stray key at the start of the
        // retry would only ring the bell.
        let outcome = run_drill("axax", "ab", 2);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.stats.total_line_wpm.chars, 4);
        assert_eq!(outcome.stats.total_acc.correct, 2);
        assert_eq!(outcome.stats.total_acc.incorrect, 2);
    }

    #[test]
    fn test_first_char_mismatch_carries_no_penalty() {
        // Three stray keys before the line starts; budget of 1 still passes.
        let outcome = run_drill("xyzab", "ab", 1);

        assert!(outcome.succeeded);
        assert_eq!(outcome.stats.total_line_wpm.chars, 2);
        assert_eq!(outcome.stats.total_acc.incorrect, 0);
    }

    #[test]
    fn test_first_char_mismatch_rings_bell_only() {
        let mut keys = ScriptedKeys::new("xab");
        let mut out = Vec::new();
        LineDrill::new(&mut keys, &mut out).run("ab", 1).unwrap();

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains(BELL));
        // The stray 'x' is never echoed.
        assert!(!rendered.contains('x'));
    }

    #[test]
    fn test_negative_budget_never_fails() {
        let script = "ax".repeat(50) + "ab";
        let outcome = run_drill(&script, "ab", -1);

        assert!(outcome.succeeded);
        assert_eq!(outcome.stats.total_acc.incorrect, 50);
    }

    #[test]
    fn test_budget_saturates_at_i32_min() {
        // A disabled budget already at the integer floor must not wrap on
        // further mismatches; the drill keeps retrying as if unbounded.
        let script = "ax".repeat(10) + "ab";
        let outcome = run_drill(&script, "ab", i32::MIN);

        assert!(outcome.succeeded);
        assert_eq!(outcome.stats.total_acc.incorrect, 10);
    }

    #[test]
    fn test_interrupt_propagates_immediately() {
        let mut keys = ScriptedKeys::new("a\u{3}b");
        let mut out = Vec::new();
        let result = LineDrill::new(&mut keys, &mut out).run("ab", 10);

        assert_matches!(result, Err(DrillError::Interrupted));
    }

    #[test]
    fn test_mistyped_newline_echoes_nothing() {
        let mut keys = ScriptedKeys::new("a\nab");
        let mut out = Vec::new();
        let outcome = LineDrill::new(&mut keys, &mut out).run("ab", 10).unwrap();

        assert!(outcome.succeeded);
        assert_eq!(outcome.stats.total_acc.incorrect, 1);
    }

    #[test]
    fn test_correct_chars_echoed_in_order() {
        let mut keys = ScriptedKeys::new("hi");
        let mut out = Vec::new();
        LineDrill::new(&mut keys, &mut out).run("hi", 10).unwrap();

        let rendered = String::from_utf8(out).unwrap();
        let echoed: String = rendered
            .lines()
            .nth(1)
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        assert_eq!(echoed, "hi");
    }

    #[test]
    fn test_totals_never_below_correct() {
        for script in ["cat", "caxcat", "cxcxcat", "xxcat"] {
            let outcome = run_drill(script, "cat", -1);
            assert!(outcome.stats.total_line_wpm.chars >= outcome.stats.correct_line_wpm.chars);
        }
    }

    #[test]
    fn test_char_breakdown_keys_on_expected_char() {
        let mut keys = ScriptedKeys::new("caxcat");
        let mut out = Vec::new();
        let outcome = LineDrill::new(&mut keys, &mut out)
            .with_char_breakdown()
            .run("cat", 10)
            .unwrap();

        let breakdown = outcome.stats.per_char.expect("breakdown enabled");
        let sorted = breakdown.sorted();
        // The mismatch ('x' typed for 't') is charged to 't', not 'x'.
        let t_entry = sorted.iter().find(|(c, _)| *c == 't').unwrap();
        assert_eq!(t_entry.1.correct, 1);
        assert_eq!(t_entry.1.incorrect, 1);
    }
}
