//! Backend-independent input events. The platform translates its raw
//! terminal events into these before dispatching against a frame.

use bitflags::bitflags;

use crate::geometry::Vec2;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 1;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Esc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::empty(),
        }
    }
}

/// One discrete user event, in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    MouseDown(Vec2),
    MouseUp(Vec2),
    MouseMove(Vec2),
    Resize(u16, u16),
}
