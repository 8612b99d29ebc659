//! Node Tree
//!
//! This module implements the dataflow tree: nodes that own child nodes and
//! typed input/output slots, slots wired together across node boundaries,
//! and nodes that recompute on demand by pulling from their connected inputs.
//!
//! # Overview
//!
//! - A [`Graph`] is the root node a caller holds.
//! - Nodes own their children and slots exclusively ([`NodeRef`]). Every
//!   other reference (parent back-references, slot peers, handles returned
//!   to callers) is weak ([`NodeWeak`], [`SlotWeak`]) and resolves to nothing
//!   once its target is gone.
//! - A connection is recorded on both slots. Duplicates are kept.
//! - Nothing evaluates on its own. Callers pick the node and the frame, and
//!   the node's [`NodeKind`] (or functor) pulls whatever it needs upstream.
//!
//! # Design Decisions
//!
//! 1. Ownership is `Rc<RefCell<_>>` with `Weak` back-references. Everything
//!    is single-threaded; none of the handle types are `Send`.
//!
//! 2. Objects are built inside `Rc::new_cyclic`, so each one knows its own
//!    handle from the start.
//!
//! 3. There is no cycle detection and no dirty propagation. A cyclic pull
//!    trips a `RefCell` borrow panic.

mod datas;
#[cfg(feature = "serde")]
mod describe;
mod identity;
mod node;
mod root;
mod slot;

pub use datas::{EvalDatas, Frame, Functor, NodeDatas, SlotDatas, SlotDir, UserDatas};
#[cfg(feature = "serde")]
pub use describe::{NodeDescriptor, SlotDescriptor};
pub use identity::{NodeId, SlotId};
pub use node::{AsAny, Node, NodeKind, NodeRef, NodeWeak};
pub use root::Graph;
pub use slot::{Slot, SlotRef, SlotWeak};
