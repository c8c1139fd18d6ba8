use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{remember, remember_with_key};

/// A cleanup action. Runs at most once, no matter how often `run` is called.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    pub fn run(&self) {
        if let Some(f) = self.0.borrow_mut().take() {
            f()
        }
    }
}

/// Helper for the tail of an effect body: `cleanup(|| ...)`.
pub fn cleanup(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// Keyed effect with cleanup. Runs `effect` when the key first appears and
/// again whenever it changes; the previous cleanup runs before the new
/// effect. Slot-based, so the call site must compose unconditionally.
pub fn disposable_effect<K: PartialEq + 'static>(key: K, effect: impl FnOnce() -> Dispose) {
    let slot = remember(|| RefCell::new(None::<(K, Dispose)>));

    let stale = match slot.borrow().as_ref() {
        Some((k, _)) => *k != key,
        None => true,
    };
    if !stale {
        return;
    }

    if let Some((_, previous)) = slot.borrow_mut().take() {
        previous.run();
    }
    let dispose = effect();
    *slot.borrow_mut() = Some((key, dispose));
}

/// Implementation detail of [`launched_effect!`]: keyed by the call site so
/// each macro expansion owns one slot regardless of composition order.
pub fn launched_effect_internal<K: PartialEq + Clone + 'static>(
    callsite: &'static str,
    key: K,
    effect: impl FnOnce() + 'static,
) {
    let last_key = remember_with_key(format!("launched:{callsite}"), || RefCell::new(None::<K>));

    let mut last = last_key.borrow_mut();
    if last.as_ref() != Some(&key) {
        *last = Some(key);
        effect();
    }
}

/// Fire-once-per-key side effect: runs on the first frame and then once per
/// change of `$key`. No cleanup; pair with [`disposable_effect`] when the
/// effect owns something.
#[macro_export]
macro_rules! launched_effect {
    ($key:expr, $effect:expr) => {
        $crate::effects::launched_effect_internal(
            concat!(module_path!(), ":", line!(), ":", column!()),
            $key,
            $effect,
        )
    };
}
