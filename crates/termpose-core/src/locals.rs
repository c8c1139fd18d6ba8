//! # Ambient locals
//!
//! Termpose exposes values to a whole subtree without parameter threading
//! through thread-local "ambient" frames: `provide(value, || ...)` overrides
//! the local of that type for everything composed inside the closure, and
//! `ambient::<T>()` reads the nearest provided value.
//!
//! ```rust
//! use termpose_core::locals::{ambient, provide};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Accent(&'static str);
//!
//! let seen = provide(Accent("green"), || ambient::<Accent>());
//! assert_eq!(seen, Some(Accent("green")));
//! assert_eq!(ambient::<Accent>(), None); // frame popped
//! ```
//!
//! The built-in [`Theme`] local carries the terminal color scheme; widgets
//! read it through [`theme`] and should not hard-code colors.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::color::Color;

thread_local! {
    static AMBIENT_STACK: RefCell<Vec<HashMap<TypeId, Rc<dyn Any>>>> =
        const { RefCell::new(Vec::new()) };
}

/// Provides `value` as the ambient local of its type for everything run
/// inside `f`. Frames nest; the innermost provider wins.
pub fn provide<T: Clone + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_frame(|| {
        set_local(TypeId::of::<T>(), Rc::new(value));
        f()
    })
}

/// Reads the nearest provided local of type `T`, if any.
pub fn ambient<T: Clone + 'static>() -> Option<T> {
    AMBIENT_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return Some(t.clone());
            }
        }
        None
    })
}

fn with_frame<R>(f: impl FnOnce() -> R) -> R {
    // Pop on unwind too, so a panicking subtree cannot leak its frame.
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            AMBIENT_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    AMBIENT_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local(t: TypeId, v: Rc<dyn Any>) {
    AMBIENT_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}

/// Terminal color scheme used by widgets and layout.
///
/// Deliberately small and semantic; apps that need richer schemes can layer
/// their own ambient locals on top.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Root background.
    pub background: Color,
    /// Panel / container surface.
    pub surface: Color,
    /// Primary text on `surface`/`background`.
    pub on_surface: Color,
    /// Low-emphasis text (placeholders, captions).
    pub hint: Color,

    /// Accent color.
    pub primary: Color,
    /// Text on top of `primary`.
    pub on_primary: Color,

    /// Low-emphasis border color.
    pub outline: Color,
    /// Background of the focused control.
    pub focus: Color,

    /// Default button background.
    pub button_bg: Color,
    /// Button background under the pointer.
    pub button_bg_hover: Color,
    /// Button background while pressed.
    pub button_bg_pressed: Color,

    /// Editable field background.
    pub field_bg: Color,
    /// Editable field background while focused.
    pub field_bg_focused: Color,

    /// Validation / error text.
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#14141A"),
            surface: Color::from_hex("#1E1E26"),
            on_surface: Color::from_hex("#DDDDDD"),
            hint: Color::from_hex("#77777F"),
            primary: Color::from_hex("#34AF82"),
            on_primary: Color::WHITE,
            outline: Color::from_hex("#55555F"),
            focus: Color::from_hex("#2A6FA8"),
            button_bg: Color::from_hex("#34AF82"),
            button_bg_hover: Color::from_hex("#2A8F6A"),
            button_bg_pressed: Color::from_hex("#1F7556"),
            field_bg: Color::from_hex("#26262E"),
            field_bg_focused: Color::from_hex("#32323C"),
            error: Color::from_hex("#C75450"),
        }
    }
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    provide(theme, f)
}

/// Current ambient theme, or the default scheme when none is provided.
pub fn theme() -> Theme {
    ambient::<Theme>().unwrap_or_default()
}
