use itertools::Itertools;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a gap between keys counts as typing rather than a break.
/// Longer intervals are excluded from speed calculations.
pub const MAX_KEY_INTERVAL: Duration = Duration::from_secs(10);

/// Characters typed and the time spent typing them, for deriving a
/// words-per-minute figure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Wpm {
    pub chars: u64,
    pub seconds: f64,
}

impl Wpm {
    /// Count one keystroke. `interval` is the gap since the previous key of
    /// the attempt, or `None` when no previous key exists.
    ///
    /// The keystroke always counts toward `chars`; its interval only counts
    /// toward `seconds` when it is present and within [`MAX_KEY_INTERVAL`].
    /// An over-threshold gap is a pause-and-resume boundary, not a slow key.
    pub fn add_char(&mut self, interval: Option<Duration>) {
        self.chars += 1;

        if let Some(gap) = interval {
            if gap <= MAX_KEY_INTERVAL {
                self.seconds += gap.as_secs_f64();
            }
        }
    }

    /// Words per minute under the 5-characters-per-word convention
    /// (`chars / seconds * 12`), or `None` when no time has accumulated.
    pub fn wpm(&self) -> Option<f64> {
        if self.seconds > 0.0 {
            Some(self.chars as f64 / self.seconds * 12.0)
        } else {
            None
        }
    }

    /// Field-wise sum; commutative and associative.
    pub fn merge(&mut self, other: &Wpm) {
        self.chars += other.chars;
        self.seconds += other.seconds;
    }

    pub fn reset(&mut self) {
        *self = Wpm::default();
    }
}

/// Correct/incorrect keystroke tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accuracy {
    pub correct: u64,
    pub incorrect: u64,
}

impl Accuracy {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    /// Fraction of keystrokes that were correct, or `None` before any input.
    pub fn ratio(&self) -> Option<f64> {
        let total = self.correct + self.incorrect;
        if total > 0 {
            Some(self.correct as f64 / total as f64)
        } else {
            None
        }
    }

    pub fn merge(&mut self, other: &Accuracy) {
        self.correct += other.correct;
        self.incorrect += other.incorrect;
    }
}

/// Per-character accuracy tallies, keyed by the expected character.
///
/// Optional extension to [`SessionStats`]; enabled via
/// [`SessionStats::with_char_breakdown`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharBreakdown {
    by_char: HashMap<char, Accuracy>,
}

impl CharBreakdown {
    pub fn record(&mut self, expected: char, correct: bool) {
        self.by_char.entry(expected).or_default().record(correct);
    }

    pub fn merge(&mut self, other: &CharBreakdown) {
        for (c, acc) in &other.by_char {
            self.by_char.entry(*c).or_default().merge(acc);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_char.is_empty()
    }

    /// Entries in character order, for stable report output.
    pub fn sorted(&self) -> Vec<(char, Accuracy)> {
        self.by_char
            .iter()
            .map(|(c, acc)| (*c, *acc))
            .sorted_by_key(|(c, _)| *c)
            .collect()
    }
}

/// Stats about one or more attempts at typing lines.
///
/// Two parallel time/char tallies are kept: one over every attempt, and one
/// over only the attempts that completed their line. An in-flight attempt
/// accumulates separately and is folded (or discarded) by [`end_attempt`].
///
/// [`end_attempt`]: SessionStats::end_attempt
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    /// Keystrokes from attempts that completed their line.
    pub correct_line_wpm: Wpm,
    /// Keystrokes from every attempt, failed ones included.
    pub total_line_wpm: Wpm,
    /// The current attempt, not yet concluded.
    pub attempt_wpm: Wpm,
    pub total_acc: Accuracy,
    pub per_char: Option<CharBreakdown>,
    /// When the last key landed, or `None` at the start of an attempt.
    pub last_key_time: Option<Instant>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`new`](SessionStats::new), with the per-character breakdown on.
    pub fn with_char_breakdown() -> Self {
        Self {
            per_char: Some(CharBreakdown::default()),
            ..Self::default()
        }
    }

    /// Record one keystroke against the expected character at instant `now`.
    pub fn type_char(&mut self, correct: bool, expected: char, now: Instant) {
        self.total_acc.record(correct);
        if let Some(per_char) = self.per_char.as_mut() {
            per_char.record(expected, correct);
        }

        // The first key of an attempt has no prior key and so no interval.
        let interval = self.last_key_time.map(|prev| now.duration_since(prev));
        self.last_key_time = Some(now);

        self.total_line_wpm.add_char(interval);
        self.attempt_wpm.add_char(interval);
    }

    /// Conclude the in-flight attempt. A successful attempt's keystrokes are
    /// folded into the correct tally; a failed attempt's stay only in the
    /// totals. Timing state resets either way.
    pub fn end_attempt(&mut self, success: bool) {
        if success {
            self.correct_line_wpm.merge(&self.attempt_wpm);
        }

        self.attempt_wpm.reset();
        self.last_key_time = None;
    }

    /// Speed over every attempt, or `None` with no timed keystrokes.
    pub fn total_wpm(&self) -> Option<f64> {
        self.total_line_wpm.wpm()
    }

    /// Speed over completed-line attempts only.
    pub fn correct_wpm(&self) -> Option<f64> {
        self.correct_line_wpm.wpm()
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.total_acc.ratio()
    }

    /// Fold another session's concluded tallies into this one. In-flight
    /// attempt state does not transfer; merging is defined on concluded
    /// stats and is commutative and associative over the raw counters.
    pub fn merge(&mut self, other: &SessionStats) {
        self.correct_line_wpm.merge(&other.correct_line_wpm);
        self.total_line_wpm.merge(&other.total_line_wpm);
        self.total_acc.merge(&other.total_acc);

        match (self.per_char.as_mut(), other.per_char.as_ref()) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.per_char = Some(theirs.clone()),
            _ => {}
        }
    }
}
