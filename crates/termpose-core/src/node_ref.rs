//! Imperative handles to laid-out views.
//!
//! A `NodeRef` is a non-reactive reference cell: binding or rebinding it
//! never causes recomposition. Layout stamps the ref with the view's id for
//! the current frame only, so a ref whose view left the tree resolves to
//! nothing instead of pointing at a recycled id.

use std::cell::Cell;
use std::rc::Rc;

use crate::runtime::{current_frame, request_focus};
use crate::view::ViewId;

#[derive(Clone, Copy)]
struct Binding {
    id: ViewId,
    frame: u64,
}

/// Stable handle to at most one mounted view. Typically created inside
/// `remember` so the same cell survives recomposition.
#[derive(Clone, Default)]
pub struct NodeRef {
    binding: Rc<Cell<Option<Binding>>>,
}

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by layout when the bound view is placed. Valid for the frame
    /// being composed only.
    pub fn bind(&self, id: ViewId) {
        self.binding.set(Some(Binding {
            id,
            frame: current_frame(),
        }));
    }

    /// The bound view's id, if the view was laid out in the current frame.
    pub fn resolve(&self) -> Option<ViewId> {
        self.binding
            .get()
            .filter(|b| b.frame == current_frame())
            .map(|b| b.id)
    }

    /// Stages a focus move to the bound view. When the view is not mounted
    /// this logs and does nothing; it never panics.
    pub fn focus(&self) {
        match self.resolve() {
            Some(id) => request_focus(id),
            None => log::warn!("focus request ignored: ref target is not mounted"),
        }
    }
}
