//! State containers shared between an async flow and its view.
//!
//! Hooks never hold a borrow across an `.await`: they read what they need,
//! await the network, then write the result back in one short update.

use std::cell::RefCell;
use std::rc::Rc;

pub trait StateCell<T> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R;
    fn update(&self, f: impl FnOnce(&mut T));

    fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.read(T::clone)
    }
}

/// Plain single-threaded cell, used off the browser and in tests.
#[derive(Debug, Default)]
pub struct LocalState<T>(Rc<RefCell<T>>);

impl<T> LocalState<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalState<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> StateCell<T> for LocalState<T> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.borrow_mut())
    }
}
