use clap::Parser;
use crossterm::tty::IsTty;
use std::fs;
use std::io::{self, stdin};
use std::path::PathBuf;
use std::process::ExitCode;

use retype::display;
use retype::error::DrillError;
use retype::input::RawTerminal;
use retype::passage::PassageDrill;
use retype::text;

/// terminal typing drill that re-presents failed lines until they stick
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Type each line of a passage exactly, character by character. A mistake \
                  restarts the line; a line failed too many times sends you back one line. \
                  Speed and accuracy are reported at the end."
)]
struct Cli {
    /// how many failed attempts before a line is failed (negative = unlimited)
    #[clap(short = 'f', long = "max-fails", default_value_t = 10)]
    max_fails: i32,

    /// read the practice text from a file instead of the built-in passage
    #[clap(long)]
    file: Option<PathBuf>,

    /// maximum number of lines to drill
    #[clap(short = 'n', long, default_value_t = 10)]
    lines: usize,

    /// wrap width for passage lines
    #[clap(short = 'w', long, default_value_t = 60)]
    width: usize,

    /// show per-character accuracy in the final report
    #[clap(long)]
    char_stats: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Ctrl-C exits quietly with the same code as a completed run.
        Err(DrillError::Interrupted) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), DrillError> {
    if !stdin().is_tty() {
        return Err(DrillError::NotInteractive);
    }

    let mut lines = match &cli.file {
        Some(path) => text::passage_from_text(&fs::read_to_string(path)?, cli.width),
        None => text::sample_passage(cli.width),
    };
    lines.truncate(cli.lines);

    let mut keys = RawTerminal::new();
    let mut out = io::stdout();

    let mut drill = PassageDrill::new(&mut keys, &mut out);
    if cli.char_stats {
        drill = drill.with_char_breakdown();
    }
    let report = drill.run(&lines, cli.max_fails)?;

    display::print_report(&mut out, &report)?;

    Ok(())
}
