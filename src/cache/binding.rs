//! Value binding
//!
//! Copies a stored value into a caller-owned slot. The slot is overwritten in
//! place and never rebound, so a slot reached through extra indirection
//! (`&mut *boxed`) keeps its allocation.

/// Copies `source` into `target`, reusing `target`'s storage where the type allows.
pub fn bind<T: Clone>(source: &T, target: &mut T) {
    target.clone_from(source);
}

/// Moves a freshly produced value into `target`.
pub fn bind_owned<T>(source: T, target: &mut T) {
    *target = source;
}
