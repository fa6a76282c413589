//! Two-line word wrap for the navigation panel

use crate::config::protocol::{NAV_LINE_BYTES, NAV_LINE_CHARS};
use heapless::String;

/// One wrapped display line.
pub type NavLine = String<NAV_LINE_BYTES>;

/// Appended to a second line that had to be cut short.
pub const ELLIPSIS: char = '…';

/// Navigation text split into two display lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavText {
    pub line1: NavLine,
    pub line2: NavLine,
}

impl NavText {
    /// Wrap `text` at the panel width.
    pub fn wrap(text: &str) -> Self {
        wrap(text, NAV_LINE_CHARS)
    }

    /// Returns true if neither line has content.
    pub fn is_empty(&self) -> bool {
        self.line1.is_empty() && self.line2.is_empty()
    }
}

/// Split `text` into two lines of at most `max_chars` characters.
///
/// The break goes at the last space at or before character `max_chars`,
/// falling back to a hard cut at `max_chars`. The second line is trimmed
/// and, if still too long, cut to `max_chars - 1` characters plus
/// [`ELLIPSIS`]. Anything past that is dropped.
pub fn wrap(text: &str, max_chars: usize) -> NavText {
    let text = text.trim();
    let char_count = text.chars().count();

    let mut wrapped = NavText::default();

    if char_count <= max_chars {
        push_chars(&mut wrapped.line1, text, max_chars);
        return wrapped;
    }

    // Last space at or before index `max_chars` (char_count > max_chars here)
    let cut = text
        .char_indices()
        .take(max_chars + 1)
        .filter(|&(_, c)| c == ' ')
        .last()
        .map(|(offset, _)| offset)
        .unwrap_or_else(|| byte_offset(text, max_chars));

    push_chars(&mut wrapped.line1, &text[..cut], max_chars);

    let rest = text[cut..].trim();
    if rest.chars().count() > max_chars {
        push_chars(&mut wrapped.line2, rest, max_chars.saturating_sub(1));
        let _ = wrapped.line2.push(ELLIPSIS);
    } else {
        push_chars(&mut wrapped.line2, rest, max_chars);
    }

    wrapped
}

/// Byte offset of character `index`, or the end of `text`.
fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// Copy up to `max_chars` characters of `src` into `dst`.
fn push_chars(dst: &mut NavLine, src: &str, max_chars: usize) {
    for c in src.chars().take(max_chars) {
        if dst.push(c).is_err() {
            break;
        }
    }
}
