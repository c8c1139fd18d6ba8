//! Editing model for single-line text fields.
//!
//! Fields are controlled: the composition owns the text and receives every
//! change through `on_change`. The platform owns only the caret, and applies
//! key events to (text, caret) pairs with the pure functions here. Carets
//! are byte offsets that always sit on a grapheme boundary.

use termpose_core::input::{Key, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Result of applying one key to a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub caret: usize,
}

pub fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

pub fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

/// Snaps a caret from a previous frame onto the current text: clamps to the
/// end and backs off to a grapheme boundary.
pub fn clamp_caret(text: &str, caret: usize) -> usize {
    let caret = caret.min(text.len());
    if text.is_char_boundary(caret) {
        caret
    } else {
        prev_grapheme_boundary(text, caret)
    }
}

/// Applies one key event; `None` when the key does not affect the field.
pub fn apply_key(text: &str, caret: usize, ev: &KeyEvent) -> Option<Edit> {
    if ev.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let caret = clamp_caret(text, caret);

    match ev.key {
        Key::Char(c) if !c.is_control() => {
            let mut out = String::with_capacity(text.len() + c.len_utf8());
            out.push_str(&text[..caret]);
            out.push(c);
            out.push_str(&text[caret..]);
            Some(Edit {
                caret: caret + c.len_utf8(),
                text: out,
            })
        }
        Key::Backspace => {
            if caret == 0 {
                return None;
            }
            let start = prev_grapheme_boundary(text, caret);
            let mut out = String::from(&text[..start]);
            out.push_str(&text[caret..]);
            Some(Edit {
                text: out,
                caret: start,
            })
        }
        Key::Delete => {
            if caret >= text.len() {
                return None;
            }
            let end = next_grapheme_boundary(text, caret);
            let mut out = String::from(&text[..caret]);
            out.push_str(&text[end..]);
            Some(Edit { text: out, caret })
        }
        Key::Left => (caret > 0).then(|| Edit {
            text: text.to_owned(),
            caret: prev_grapheme_boundary(text, caret),
        }),
        Key::Right => (caret < text.len()).then(|| Edit {
            text: text.to_owned(),
            caret: next_grapheme_boundary(text, caret),
        }),
        Key::Home => Some(Edit {
            text: text.to_owned(),
            caret: 0,
        }),
        Key::End => Some(Edit {
            text: text.to_owned(),
            caret: text.len(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> KeyEvent {
        KeyEvent::plain(key)
    }

    #[test]
    fn typing_inserts_at_caret() {
        let e = apply_key("ac", 1, &press(Key::Char('b'))).unwrap();
        assert_eq!(e, Edit { text: "abc".into(), caret: 2 });
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        // é as 'e' + combining acute is a single grapheme of two chars.
        let text = "xe\u{301}";
        let e = apply_key(text, text.len(), &press(Key::Backspace)).unwrap();
        assert_eq!(e, Edit { text: "x".into(), caret: 1 });
    }

    #[test]
    fn backspace_at_start_is_noop() {
        assert_eq!(apply_key("abc", 0, &press(Key::Backspace)), None);
    }

    #[test]
    fn delete_removes_forward() {
        let e = apply_key("abc", 1, &press(Key::Delete)).unwrap();
        assert_eq!(e, Edit { text: "ac".into(), caret: 1 });
    }

    #[test]
    fn arrows_move_without_changing_text() {
        let e = apply_key("ab", 1, &press(Key::Left)).unwrap();
        assert_eq!(e, Edit { text: "ab".into(), caret: 0 });
        let e = apply_key("ab", 1, &press(Key::Right)).unwrap();
        assert_eq!(e, Edit { text: "ab".into(), caret: 2 });
        assert_eq!(apply_key("ab", 0, &press(Key::Left)), None);
        assert_eq!(apply_key("ab", 2, &press(Key::Right)), None);
    }

    #[test]
    fn stale_caret_is_clamped() {
        // Caret positions from a previous, longer text must not panic.
        let e = apply_key("ab", 10, &press(Key::Char('c'))).unwrap();
        assert_eq!(e, Edit { text: "abc".into(), caret: 3 });
    }

    #[test]
    fn control_chords_are_ignored() {
        let ev = KeyEvent {
            key: Key::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert_eq!(apply_key("ab", 1, &ev), None);
    }
}
