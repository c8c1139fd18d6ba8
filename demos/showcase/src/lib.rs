#![allow(non_snake_case)]
//! Showcase: a single screen exercising the termpose state primitives the
//! way an app would — counter state, a document-title effect, a shared
//! color scheme, imperative focus, and memoized values and callbacks.

pub mod app;
pub mod fib;
pub mod palette;

pub use app::{ColorScheme, app};
