use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::collections::VecDeque;
use std::io;

/// The interrupt character (Ctrl-C), delivered verbatim by a [`KeySource`]
/// so the drill can treat it as ordinary input.
pub const INTERRUPT_CHAR: char = '\u{3}';

/// Blocking, unbuffered, no-echo source of single characters.
pub trait KeySource {
    fn read_key(&mut self) -> io::Result<char>;
}

/// Restores cooked mode when dropped, on early-return and panic paths too.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Production key source reading crossterm key events.
///
/// Raw mode is scoped to each read, so the terminal is back in cooked mode
/// whenever the drill writes output and plain `\n` line endings stay valid.
/// In raw mode Ctrl-C arrives as a key event rather than a signal; it is
/// mapped to [`INTERRUPT_CHAR`].
#[derive(Debug, Default)]
pub struct RawTerminal;

impl RawTerminal {
    pub fn new() -> Self {
        RawTerminal
    }
}

impl KeySource for RawTerminal {
    fn read_key(&mut self) -> io::Result<char> {
        let _guard = RawModeGuard::enter()?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(INTERRUPT_CHAR);
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    return Ok(c);
                }
                KeyCode::Enter => return Ok('\n'),
                KeyCode::Tab => return Ok('\t'),
                // Arrows, function keys, other chords: not typable input.
                _ => {}
            }
        }
    }
}

/// Test key source yielding a fixed sequence of characters.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    queue: VecDeque<char>,
}

impl ScriptedKeys {
    pub fn new(keys: &str) -> Self {
        Self {
            queue: keys.chars().collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> io::Result<char> {
        self.queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_keys_in_order() {
        let mut keys = ScriptedKeys::new("abc");

        assert_eq!(keys.read_key().unwrap(), 'a');
        assert_eq!(keys.read_key().unwrap(), 'b');
        assert_eq!(keys.read_key().unwrap(), 'c');
    }

    #[test]
    fn test_scripted_keys_exhaustion() {
        let mut keys = ScriptedKeys::new("");

        let err = keys.read_key().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_interrupt_char_passes_through_script() {
        let mut keys = ScriptedKeys::new("\u{3}");
        assert_eq!(keys.read_key().unwrap(), INTERRUPT_CHAR);
    }
}
