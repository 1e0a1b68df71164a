use crossterm::style::Stylize;
use std::fmt::Display;
use std::io::{self, Write};

use crate::passage::SessionReport;

/// Audible alert for a mismatch.
pub const BELL: char = '\u{7}';

/// The target line as shown above the user's input.
pub fn target_line(line: &str) -> impl Display + '_ {
    line.cyan().bold()
}

/// A mistyped character echoed back as feedback.
pub fn miss(text: String) -> impl Display {
    text.red().bold()
}

fn metric(value: Option<f64>, scale: f64, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v * scale, suffix),
        None => String::from("n/a"),
    }
}

/// Print the end-of-passage report. Undefined metrics (no timed keystrokes
/// yet) render as `n/a` rather than zero.
pub fn print_report<W: Write>(out: &mut W, report: &SessionReport) -> io::Result<()> {
    let stats = &report.stats;

    writeln!(
        out,
        "{}",
        format!("Speed (all):     {}", metric(stats.total_wpm(), 1.0, " wpm")).green()
    )?;
    writeln!(
        out,
        "{}",
        format!("Speed (correct): {}", metric(stats.correct_wpm(), 1.0, " wpm")).green()
    )?;
    writeln!(
        out,
        "{}",
        format!("Accuracy:        {}", metric(stats.accuracy(), 100.0, "%")).green()
    )?;

    if let Some(breakdown) = stats.per_char.as_ref() {
        writeln!(out, "{}", "Per-character accuracy:".magenta())?;
        for (c, acc) in breakdown.sorted() {
            let shown = if c == '\n' {
                String::from("\\n")
            } else {
                c.to_string()
            };
            writeln!(
                out,
                "{}",
                format!("  {} -> {}", shown, metric(acc.ratio(), 100.0, "%")).magenta()
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Accuracy, SessionStats, Wpm};

    fn report_with(stats: SessionStats) -> SessionReport {
        SessionReport {
            stats,
            lines_completed: 0,
            lines_failed: 0,
        }
    }

    #[test]
    fn test_report_renders_metrics() {
        let mut stats = SessionStats::new();
        stats.total_line_wpm = Wpm { chars: 3, seconds: 1.0 };
        stats.correct_line_wpm = Wpm { chars: 3, seconds: 1.0 };
        stats.total_acc = Accuracy { correct: 3, incorrect: 1 };

        let mut out = Vec::new();
        print_report(&mut out, &report_with(stats)).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("36.0 wpm"));
        assert!(rendered.contains("75.0%"));
    }

    #[test]
    fn test_report_shows_undefined_metrics_as_na() {
        let mut out = Vec::new();
        print_report(&mut out, &report_with(SessionStats::new())).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("Speed (all):     n/a"));
        assert!(rendered.contains("Accuracy:        n/a"));
    }

    #[test]
    fn test_report_includes_breakdown_when_enabled() {
        let mut stats = SessionStats::with_char_breakdown();
        stats.type_char(true, 'q', std::time::Instant::now());
        stats.end_attempt(true);

        let mut out = Vec::new();
        print_report(&mut out, &report_with(stats)).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("Per-character accuracy:"));
        assert!(rendered.contains("q -> 100.0%"));
    }
}
