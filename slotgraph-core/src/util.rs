//! Existence lookups over handle collections.
//!
//! Graph objects are compared by identity (the allocation they live in),
//! never by content. These helpers find the position of a handle inside a
//! collection of strong or weak handles.

use std::rc::{Rc, Weak};

/// Position of `item` in a collection of strong handles, by identity.
pub fn position_rc<T: ?Sized>(items: &[Rc<T>], item: &Rc<T>) -> Option<usize> {
    items.iter().position(|candidate| Rc::ptr_eq(candidate, item))
}

/// Position of `item` in a collection of strong handles, resolving the weak
/// handle first.
///
/// An expired handle is never found.
pub fn position_rc_of_weak<T: ?Sized>(items: &[Rc<T>], item: &Weak<T>) -> Option<usize> {
    let target = item.upgrade()?;
    position_rc(items, &target)
}

/// Position of `item` in a collection of weak handles.
///
/// An expired `item` is never found, and expired entries in `items` never
/// match.
pub fn position_weak<T: ?Sized>(items: &[Weak<T>], item: &Weak<T>) -> Option<usize> {
    let target = item.upgrade()?;
    items.iter().position(|candidate| {
        candidate
            .upgrade()
            .is_some_and(|live| Rc::ptr_eq(&live, &target))
    })
}
