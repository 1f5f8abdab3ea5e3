//! Display sanitization for remote-supplied text.
//!
//! Contact names, numbers and server error strings come from the remote
//! collection and end up in single-line terminal cells. A stray escape
//! sequence there can repaint the screen, set the window title or write to
//! the clipboard (OSC 52), so everything shown from the wire goes through
//! [`sanitize_display_text`] first.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{009b}';

/// Sanitize text for a single-line terminal cell.
///
/// - ANSI escape sequences (CSI, OSC, DCS/PM/APC, two-byte) are removed.
/// - Newlines and tabs become a single space.
/// - Every other C0/C1 control character and DEL is dropped.
///
/// Returns `Cow::Borrowed` when the input is already clean.
///
/// # Examples
///
/// ```
/// use phonebook_types::sanitize_display_text;
///
/// assert_eq!(sanitize_display_text("Arto Hellas"), "Arto Hellas");
/// assert_eq!(sanitize_display_text("Ann\x1b[2J\nLee"), "Ann Lee");
/// ```
#[must_use]
pub fn sanitize_display_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_control) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            C1_CSI => skip_csi(&mut chars),
            '\n' | '\r' | '\t' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c if is_control(c) => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

fn is_control(c: char) -> bool {
    c <= '\x1f' || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c)
}

fn skip_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    match chars.peek().copied() {
        Some('[') => {
            chars.next();
            skip_csi(chars);
        }
        Some(']') => {
            chars.next();
            skip_string(chars, true);
        }
        Some('P' | '^' | '_') => {
            chars.next();
            skip_string(chars, false);
        }
        Some('(' | ')' | '*' | '+' | '#' | ' ') => {
            chars.next();
            chars.next();
        }
        Some('7' | '8' | 'c' | 'D' | 'E' | 'H' | 'M' | 'N' | 'O' | 'Z' | '=' | '>' | '<') => {
            chars.next();
        }
        _ => {}
    }
}

/// Parameter and intermediate bytes up to and including the final byte.
fn skip_csi<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
        chars.next();
    }
}

/// OSC ends at BEL or ST; DCS/PM/APC only at ST (`ESC \`).
fn skip_string<I: Iterator<Item = char>>(chars: &mut Peekable<I>, bel_terminates: bool) {
    while let Some(c) = chars.next() {
        if bel_terminates && c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}
