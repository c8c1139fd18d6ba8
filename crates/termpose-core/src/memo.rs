//! Dependency-keyed memoization on top of composition slots.
//!
//! `memo` is an explicit cache: the slot holds the dependency key alongside
//! the computed value, and the computation reruns only when the key changes.
//! A cached value is therefore never observed stale relative to its own key.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::remember;

/// Returns the cached result of `compute`, recomputing it only when `deps`
/// differs from the key stored at this slot. The returned `Rc` is the same
/// allocation across frames while the key is unchanged.
pub fn memo<K, T>(deps: K, compute: impl FnOnce() -> T) -> Rc<T>
where
    K: PartialEq + 'static,
    T: 'static,
{
    let slot = remember(|| RefCell::new(None::<(K, Rc<T>)>));
    let mut cached = slot.borrow_mut();

    if let Some((key, value)) = cached.as_ref() {
        if *key == deps {
            return value.clone();
        }
    }

    let value = Rc::new(compute());
    *cached = Some((deps, value.clone()));
    value
}

/// Memoized zero-argument action: the returned callback keeps its identity
/// (`Rc::ptr_eq`) across frames until `deps` changes, at which point the
/// freshly captured closure replaces it.
pub fn memo_callback<K>(deps: K, action: impl Fn() + 'static) -> Rc<dyn Fn()>
where
    K: PartialEq + 'static,
{
    let cached: Rc<Rc<dyn Fn()>> = memo(deps, move || Rc::new(action) as Rc<dyn Fn()>);
    cached.as_ref().clone()
}
