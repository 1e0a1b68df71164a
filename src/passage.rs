use std::io::Write;

use crate::drill::LineDrill;
use crate::error::DrillError;
use crate::input::KeySource;
use crate::stats::SessionStats;

/// Aggregate outcome of drilling a whole passage.
#[derive(Debug, Default)]
pub struct SessionReport {
    pub stats: SessionStats,
    /// Line drills completed within their failure budget.
    pub lines_completed: usize,
    /// Budget exhaustions; each one sent the cursor back a line.
    pub lines_failed: usize,
}

/// Sequences line drills over an ordered passage.
///
/// The cursor advances one line on success and retreats one line (floored at
/// the first line) when a line exhausts its failure budget, so a shaky line
/// is always re-earned before moving on.
pub struct PassageDrill<'a, K: KeySource, W: Write> {
    keys: &'a mut K,
    out: &'a mut W,
    track_chars: bool,
}

impl<'a, K: KeySource, W: Write> PassageDrill<'a, K, W> {
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

    /// Drill every line of `lines`. An empty passage completes immediately
    /// with an empty report (its metrics read as undefined).
    pub fn run(&mut self, lines: &[String], max_failures: i32) -> Result<SessionReport, DrillError> {
        let mut report = SessionReport::default();
        if self.track_chars {
            report.stats = SessionStats::with_char_breakdown();
        }

        let mut line_index = 0usize;
        while line_index < lines.len() {
            let mut drill = LineDrill::new(self.keys, self.out);
            if self.track_chars {
                drill = drill.with_char_breakdown();
            }

            let outcome = drill.run(&lines[line_index], max_failures)?;

            // Failed attempts still count toward the session totals.
            report.stats.merge(&outcome.stats);

            if outcome.succeeded {
                report.lines_completed += 1;
                line_index += 1;
            } else {
                report.lines_failed += 1;
                line_index = line_index.saturating_sub(1);
            }
        }

        Ok(report)
    }
}
