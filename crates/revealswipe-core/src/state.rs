//! Observable state cells.
//!
//! Values are published explicitly: every write that changes the value runs
//! the registered observers after the cell is released, so an observer may
//! read the cell (or any other cell) without tripping a `RefCell` borrow.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Observer<T> = Rc<dyn Fn(&T)>;

struct StateCell<T> {
    value: RefCell<T>,
    observers: RefCell<SmallVec<[(u64, Observer<T>); 2]>>,
    next_observer_id: Cell<u64>,
}

impl<T: Clone + PartialEq + 'static> StateCell<T> {
    fn subscribe(self: &Rc<Self>, observer: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_observer_id.get();
        self.next_observer_id.set(id + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        let weak: Weak<Self> = Rc::downgrade(self);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(cell) = weak.upgrade() {
                    cell.observers.borrow_mut().retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    fn notify(&self) {
        let value = self.value.borrow().clone();
        let observers: SmallVec<[Observer<T>; 2]> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(&value);
        }
    }
}

/// Read-write observable value. Clones share the same cell.
pub struct MutableState<T: Clone + PartialEq + 'static> {
    inner: Rc<StateCell<T>>,
}

impl<T: Clone + PartialEq + 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateCell {
                value: RefCell::new(value),
                observers: RefCell::new(SmallVec::new()),
                next_observer_id: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Stores `value` and notifies observers if it differs from the current one.
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.inner.notify();
        true
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, changed) = {
            let mut current = self.inner.value.borrow_mut();
            let before = current.clone();
            let result = f(&mut current);
            (result, *current != before)
        };
        if changed {
            self.inner.notify();
        }
        result
    }

    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribe(observer)
    }

    /// Read-only view sharing this cell.
    pub fn as_state(&self) -> State<T> {
        State {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableState")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

/// Read-only observable value.
pub struct State<T: Clone + PartialEq + 'static> {
    inner: Rc<StateCell<T>>,
}

impl<T: Clone + PartialEq + 'static> State<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribe(observer)
    }
}

impl<T: Clone + PartialEq + 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keeps the observer registered for as long as the state lives.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notifies_only_on_change() {
        let state = MutableState::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = state.subscribe(move |value| sink.borrow_mut().push(*value));

        assert!(state.set(2));
        assert!(!state.set(2));
        assert!(state.set(3));

        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let state = MutableState::new(0.0f32);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let subscription = state.subscribe(move |_| counter.set(counter.get() + 1));

        state.set(1.0);
        drop(subscription);
        state.set(2.0);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn observer_can_read_the_cell_it_observes() {
        let state = MutableState::new(String::from("a"));
        let reader = state.as_state();
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&seen);
        state
            .subscribe(move |_| *sink.borrow_mut() = reader.get())
            .detach();

        state.set(String::from("b"));

        assert_eq!(*seen.borrow(), "b");
    }

    #[test]
    fn update_notifies_when_mutated() {
        let state = MutableState::new(vec![1]);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _subscription = state.subscribe(move |_| counter.set(counter.get() + 1));

        state.update(|values| values.push(2));
        state.update(|_| ());

        assert_eq!(count.get(), 1);
        assert_eq!(state.get(), vec![1, 2]);
    }
}
