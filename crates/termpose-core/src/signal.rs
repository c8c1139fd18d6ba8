use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Observable value cell. Cloning a `Signal` clones the handle, not the
/// value: all clones read and write the same slot.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: Vec<Box<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Reads through a borrow without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, value: T) {
        let mut inner = self.0.borrow_mut();
        inner.value = value;
        let current = &inner.value;
        for sub in &inner.subs {
            sub(current);
        }
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let mut inner = self.0.borrow_mut();
        f(&mut inner.value);
        let current = &inner.value;
        for sub in &inner.subs {
            sub(current);
        }
    }

    /// Subscribers run synchronously, inside every `set`/`update`.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Box::new(f));
        inner.subs.len() - 1
    }
}

pub fn signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
