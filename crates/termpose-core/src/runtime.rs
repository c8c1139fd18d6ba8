use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::Rect;
use crate::semantics::Role;
use crate::view::{Scene, View, ViewId};

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static FRAME: Cell<u64> = const { Cell::new(0) };
    static HOST_REQUESTS: RefCell<Vec<HostRequest>> = const { RefCell::new(Vec::new()) };
}

/// Slot storage for one composition. Sequential slots are addressed by call
/// order (the Nth `remember` in a frame always hits the Nth slot), keyed
/// slots by an explicit string.
#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// RAII marker for one frame of composition: resets the slot cursor and
/// advances the frame counter that node bindings are stamped with.
pub struct ComposeGuard {
    _private: (),
}

impl ComposeGuard {
    pub fn begin() -> Self {
        COMPOSER.with(|c| c.borrow_mut().cursor = 0);
        FRAME.with(|f| f.set(f.get() + 1));
        ComposeGuard { _private: () }
    }
}

/// Number of the frame currently being (or last) composed.
pub fn current_frame() -> u64 {
    FRAME.with(|f| f.get())
}

/// Drops all slot state. Used by the headless driver and tests to start
/// from a clean composition on a thread that already ran one.
pub fn reset_composition() {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        c.slots.clear();
        c.keyed_slots.clear();
        c.cursor = 0;
    });
    HOST_REQUESTS.with(|r| r.borrow_mut().clear());
}

/// Slot-based remember: returns the value stored at this call-order slot,
/// initializing it on the first frame. Only valid under sequential
/// composition; conditional call sites should use [`remember_with_key`].
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "remember: slot {cursor} holds a different type; replacing. \
                 If composition is conditional here, use remember_with_key."
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember, stable across conditional branches.
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!("remember_with_key: key '{key}' reused with a different type; replacing.");
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

/// Side effects that cross the host boundary (window title, focus moves).
/// They are staged during composition and applied by the platform only
/// after the frame that produced them has been committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostRequest {
    SetTitle(String),
    Focus(ViewId),
}

/// Stages a window-title update for the host terminal.
pub fn set_window_title(title: impl Into<String>) {
    HOST_REQUESTS.with(|r| r.borrow_mut().push(HostRequest::SetTitle(title.into())));
}

/// Stages an input-focus move to the given view.
pub fn request_focus(id: ViewId) {
    HOST_REQUESTS.with(|r| r.borrow_mut().push(HostRequest::Focus(id)));
}

/// Drains the staged host requests, in the order they were issued.
pub fn take_host_requests() -> Vec<HostRequest> {
    HOST_REQUESTS.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

/// Output of one composition tick: the paint list plus everything the
/// platform needs to route input back into the tree.
pub struct Frame {
    pub scene: Scene,
    pub hit_regions: Vec<HitRegion>,
    pub semantics_nodes: Vec<SemNode>,
    pub focus_chain: Vec<ViewId>,
}

/// Interactive rectangle produced by layout. `field_text` carries the
/// current text of an editable region so the platform can apply edits
/// before reporting them through `on_text_change`.
#[derive(Clone)]
pub struct HitRegion {
    pub id: ViewId,
    pub rect: Rect,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub focusable: bool,
    pub field_text: Option<String>,
    pub on_text_change: Option<Rc<dyn Fn(String)>>,
}

/// Flattened semantics node: resolved rect, role, label, focus state.
#[derive(Clone, Debug)]
pub struct SemNode {
    pub id: ViewId,
    pub role: Role,
    pub label: Option<String>,
    pub rect: Rect,
    pub focused: bool,
}

pub struct Scheduler {
    pub focused: Option<ViewId>,
    /// Terminal size in cells.
    pub size: (u16, u16),
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            focused: None,
            size: (80, 24),
        }
    }

    /// Composes one frame: builds the view tree, lays it out and paints it,
    /// and collects the focus chain from the focusable hit regions.
    pub fn compose<F>(
        &mut self,
        build_root: &mut F,
        layout_paint: impl FnOnce(&View, (u16, u16)) -> (Scene, Vec<HitRegion>, Vec<SemNode>),
    ) -> Frame
    where
        F: FnMut(&mut Scheduler) -> View + ?Sized,
    {
        let _guard = ComposeGuard::begin();
        let root = build_root(self);
        let (scene, hits, sems) = layout_paint(&root, self.size);

        let focus_chain: Vec<ViewId> = hits.iter().filter(|h| h.focusable).map(|h| h.id).collect();

        Frame {
            scene,
            hit_regions: hits,
            semantics_nodes: sems,
            focus_chain,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
