//! # State, memoization, and effects for terminal UIs
//!
//! Termpose composes the whole view tree every frame. State that must
//! survive recomposition lives in three kinds of cells:
//!
//! - `Signal<T>` — observable, cloneable value handle.
//! - `remember*` — per-call-site storage bound to the composition.
//! - `memo` / `memo_callback` — dependency-keyed caches.
//!
//! ## Signals
//!
//! ```rust
//! use termpose_core::signal;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Remembered state
//!
//! UI state is typically a signal held in a `remember` slot, so the Nth
//! call in the composition keeps returning the same handle:
//!
//! ```rust,ignore
//! fn Counter() -> View {
//!     let count = remember(|| signal(0u64));
//!     Button(format!("clicked {}", count.get()), {
//!         let count = count.clone();
//!         move || count.update(|c| *c += 1)
//!     })
//! }
//! ```
//!
//! ## Memoization
//!
//! `memo(deps, compute)` is an explicit cache keyed by `deps`: the closure
//! reruns only when the key changes, and the cached `Rc` is returned
//! verbatim otherwise. `memo_callback` applies the same keying to a
//! zero-argument action so its identity is stable across frames.
//!
//! ## Effects
//!
//! `launched_effect!(key, || ...)` runs once per distinct key; use it for
//! host-visible side effects such as the window title. `disposable_effect`
//! additionally runs a cleanup when the key changes. Side effects that
//! cross the host boundary are staged as [`runtime::HostRequest`]s and
//! applied by the platform after the frame is committed, never in the
//! middle of composition.

pub mod color;
pub mod effects;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod memo;
pub mod modifier;
pub mod node_ref;
pub mod prelude;
pub mod runtime;
pub mod semantics;
pub mod signal;
pub mod view;

mod tests;

pub use color::*;
pub use effects::*;
pub use geometry::*;
pub use locals::*;
pub use memo::*;
pub use modifier::*;
pub use node_ref::*;
pub use prelude::*;
pub use runtime::*;
pub use semantics::*;
pub use signal::*;
pub use view::*;
