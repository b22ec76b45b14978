//! Width-bounded greedy word wrapping

/// Split text into lines that fit within `max_width`
///
/// Words are separated by single spaces and accumulated greedily while
/// `measure(line) <= max_width`. A word is never split: a word wider
/// than `max_width` is placed on a line of its own and overflows.
///
/// The pending line is committed whenever the next word does not fit,
/// even when it is still empty. An over-wide first word therefore
/// yields a leading empty line, which takes a slot like any other.
///
/// # Arguments
/// * `text` - Text to wrap
/// * `max_width` - Available width in the same unit `measure` returns
/// * `measure` - Rendered width of a candidate line
pub fn wrap_to_width<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = format!("{current} {word}");
        let candidate = candidate.trim();
        if measure(candidate) <= max_width {
            current = candidate.to_string();
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    lines
}
