use itertools::Itertools;

/// Characters reachable from a standard English keyboard. Lines containing
/// anything else are not drillable and get filtered out.
const TYPABLE_CHARS: &str =
    "pyfgcrlaoeuidhtnsqjkxbmwvzPYFGCRLAOEUIDHTNSQJKXBMWVZ 1234567890!\"$%^&*()[]{}'@,.<>/?=+-_#~;:";

/// Built-in practice text used when no input file is given.
const SAMPLE_TEXT: &str = "\
The quick brown fox jumps over the lazy dog. \
Pack my box with five dozen liquor jugs. \
Typing is a skill, and like any skill it grows with deliberate practice. \
Keep your eyes on the text and trust your fingers to find the keys. \
Accuracy comes first; speed follows on its own once the misses stop. \
A line you fail comes back until you can clear it without stumbling. \
Short, focused sessions beat long, tired ones. \
When a word keeps tripping you up, slow down and type it cleanly three times. \
Rhythm matters more than bursts: a steady pace scores better than a sprint. \
Finish each session before your hands get sloppy, and stop while it is still fun.";

/// Close typable stand-ins for characters that cannot be typed directly.
fn substitute(c: char) -> char {
    match c {
        '\u{2013}' => '-', // en dash
        _ => c,
    }
}

/// Map a line to its typable form, or `None` if it contains characters
/// outside the supported set even after substitution.
pub fn sanitize_line(line: &str) -> Option<String> {
    line.chars()
        .map(substitute)
        .map(|c| TYPABLE_CHARS.contains(c).then_some(c))
        .collect()
}

/// Greedy word wrap. Lines at or under `max_len` pass through unchanged;
/// a single word longer than `max_len` stays whole.
pub fn wrap_line(line: &str, max_len: usize) -> Vec<String> {
    if line.len() <= max_len {
        return vec![line.to_string()];
    }

    let mut wrapped: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in line.split(' ') {
        if !current.is_empty() && current.len() + word.len() + 1 > max_len {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        wrapped.push(current);
    }

    wrapped
}

fn split_sentences(line: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek() == Some(&' ') {
            chars.next();
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Turn raw text into drill-ready lines: normalize whitespace, split into
/// sentence-sized lines, drop untypable and trivially short lines, wrap the
/// rest to `max_len`.
pub fn passage_from_text(text: &str, max_len: usize) -> Vec<String> {
    text.lines()
        .map(|ln| ln.split_whitespace().join(" "))
        .flat_map(|ln| split_sentences(&ln))
        .filter(|ln| ln.len() > 3)
        .filter_map(|ln| sanitize_line(&ln))
        .flat_map(|ln| wrap_line(&ln, max_len))
        .filter(|ln| !ln.is_empty())
        .collect()
}

/// The built-in passage, wrapped to `max_len`.
pub fn sample_passage(max_len: usize) -> Vec<String> {
    passage_from_text(SAMPLE_TEXT, max_len)
}
