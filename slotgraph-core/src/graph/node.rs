//! Graph Nodes
//!
//! A node owns its child nodes and its input and output slots, and is the
//! evaluation entry point of the tree.
//!
//! # Ownership
//!
//! - Children and slots are held by strong handles inside the node. Dropping
//!   the node (or removing it from its parent) destroys everything it owns
//!   once no other strong handle survives.
//! - Parent back-references and every handle given out to callers are weak.
//! - Removing a slot never touches the connection lists of its peers. A peer
//!   keeps an entry that no longer resolves.
//!
//! # Evaluation
//!
//! [`Node::eval`] dispatches to the node's [`NodeKind`] when it has one,
//! otherwise to the functor stored in its [`NodeDatas`], otherwise fails with
//! [`GraphError::NodeNoFunctor`]. The graph never decides when or in what
//! order nodes evaluate, and does not guard against cycles.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::datas::{Frame, NodeDatas, SlotDatas, SlotDir};
use super::identity::NodeId;
use super::slot::{Slot, SlotRef, SlotWeak};
use crate::error::{GraphError, Result};
use crate::util;

/// Owning handle to a node. Held only by the node's parent.
pub type NodeRef = Rc<RefCell<Node>>;

/// Non-owning handle to a node.
pub type NodeWeak = Weak<RefCell<Node>>;

/// Downcasting support for node kinds.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Kind-specific node behavior.
///
/// A kind carries whatever state the node needs (its current value, for
/// instance) and decides how to read upstream values during evaluation.
/// Downstream kinds reach it through [`Node::kind`].
pub trait NodeKind: AsAny {
    /// Called once when the node is created through the graph. An error
    /// aborts the creation.
    fn init(&mut self, datas: &NodeDatas) -> Result<()> {
        let _ = datas;
        Ok(())
    }

    /// Recompute the node for `frame`, triggered by the output slot `trigger`.
    ///
    /// On success an implementation is expected to stamp `trigger` with
    /// [`EvalDatas`](super::EvalDatas) for `frame`.
    fn eval(&mut self, frame: Frame, inputs: &[SlotRef], trigger: &SlotWeak) -> Result<()>;
}

/// A node of the tree.
pub struct Node {
    id: NodeId,

    /// Handle to this node, set at construction.
    this: NodeWeak,

    parent: NodeWeak,

    /// Caller-managed flag. Nothing in the graph reads or propagates it.
    dirty: bool,

    datas: NodeDatas,

    kind: Option<Box<dyn NodeKind>>,

    children: Vec<NodeRef>,
    inputs: Vec<SlotRef>,
    outputs: Vec<SlotRef>,
}

impl Node {
    /// Build a detached node evaluated through its functor, if any.
    pub fn create(datas: NodeDatas) -> NodeRef {
        Self::build(datas, None)
    }

    /// Build a detached node with kind-specific behavior.
    pub fn create_with_kind<K: NodeKind>(datas: NodeDatas, kind: K) -> NodeRef {
        Self::build(datas, Some(Box::new(kind)))
    }

    fn build(datas: NodeDatas, kind: Option<Box<dyn NodeKind>>) -> NodeRef {
        Rc::new_cyclic(|this| {
            RefCell::new(Self {
                id: NodeId::new(),
                this: this.clone(),
                parent: Weak::new(),
                dirty: false,
                datas,
                kind,
                children: Vec::new(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            })
        })
    }

    /// Run the kind's init hook.
    pub(crate) fn init_kind(&mut self) -> Result<()> {
        let Self { kind, datas, .. } = self;
        match kind.as_deref_mut() {
            Some(kind) => kind.init(datas),
            None => Ok(()),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Non-owning handle to this node.
    pub fn handle(&self) -> NodeWeak {
        self.this.clone()
    }

    pub fn datas(&self) -> &NodeDatas {
        &self.datas
    }

    pub fn datas_mut(&mut self) -> &mut NodeDatas {
        &mut self.datas
    }

    /// The node's kind, if it is a `K`.
    pub fn kind<K: NodeKind>(&self) -> Option<&K> {
        self.kind.as_deref()?.as_any().downcast_ref::<K>()
    }

    /// Mutable access to the node's kind, if it is a `K`.
    pub fn kind_mut<K: NodeKind>(&mut self) -> Option<&mut K> {
        self.kind.as_deref_mut()?.as_any_mut().downcast_mut::<K>()
    }

    pub fn has_kind(&self) -> bool {
        self.kind.is_some()
    }

    /// The node owning this one. Empty for the root and for detached nodes.
    pub fn parent_node(&self) -> NodeWeak {
        self.parent.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Take ownership of `node` as a child.
    ///
    /// No duplicate check is made. A node cannot adopt itself
    /// ([`GraphError::NodeAlreadyExists`]).
    pub fn add_child_node(&mut self, node: NodeRef) -> Result<()> {
        if self.this.ptr_eq(&Rc::downgrade(&node)) {
            return Err(GraphError::NodeAlreadyExists);
        }
        let child_id = {
            let mut child = node.borrow_mut();
            child.parent = self.this.clone();
            child.id
        };
        debug!(parent = %self.id, child = %child_id, "child node added");
        self.children.push(node);
        Ok(())
    }

    /// Release the owned child `node`.
    ///
    /// The child and everything it owns are destroyed unless the caller
    /// still holds a strong handle to it.
    pub fn remove_child_node(&mut self, node: &NodeWeak) -> Result<()> {
        let index =
            util::position_rc_of_weak(&self.children, node).ok_or(GraphError::NodeNotFound)?;
        let child = self.children.remove(index);
        let still_owned = util::position_rc(&self.children, &child).is_some();
        let child_id = {
            let mut child = child.borrow_mut();
            if !still_owned {
                child.parent = Weak::new();
            }
            child.id
        };
        debug!(parent = %self.id, child = %child_id, "child node removed");
        Ok(())
    }

    /// Handles to the owned children, in insertion order.
    pub fn child_nodes(&self) -> Vec<NodeWeak> {
        self.children().iter().map(Rc::downgrade).collect()
    }

    pub(crate) fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Take ownership of `slot`, routing it by direction.
    ///
    /// Fails with [`GraphError::SlotAlreadyExists`] if this exact slot is
    /// already in the target collection or is owned by another node.
    pub fn add_slot(&mut self, slot: SlotRef) -> Result<()> {
        let (slot_id, dir, owned) = {
            let slot = slot.borrow();
            (slot.id(), slot.dir(), slot.parent_node().strong_count() > 0)
        };
        let collection = match dir {
            SlotDir::Input => &mut self.inputs,
            SlotDir::Output => &mut self.outputs,
        };
        if owned || util::position_rc(collection.as_slice(), &slot).is_some() {
            return Err(GraphError::SlotAlreadyExists);
        }
        slot.borrow_mut().set_parent_node(self.this.clone());
        collection.push(slot);
        debug!(node = %self.id, slot = %slot_id, ?dir, "slot added");
        Ok(())
    }

    /// Build a slot from `datas` and add it to this node.
    pub fn create_slot(&mut self, datas: SlotDatas) -> Result<SlotWeak> {
        let slot = Slot::create(datas);
        let handle = Rc::downgrade(&slot);
        self.add_slot(slot)?;
        Ok(handle)
    }

    /// Release the owned `slot`, looking in the inputs first.
    ///
    /// The slot forgets its own connections. Peers connected to it are left
    /// untouched.
    pub fn remove_slot(&mut self, slot: &SlotWeak) -> Result<()> {
        let removed = match util::position_rc_of_weak(&self.inputs, slot) {
            Some(index) => self.inputs.remove(index),
            None => {
                let index = util::position_rc_of_weak(&self.outputs, slot)
                    .ok_or(GraphError::SlotNotFound)?;
                self.outputs.remove(index)
            }
        };
        let slot_id = {
            let mut removed = removed.borrow_mut();
            removed.set_parent_node(Weak::new());
            removed.disconnect_all();
            removed.id()
        };
        debug!(node = %self.id, slot = %slot_id, "slot removed");
        Ok(())
    }

    pub fn input_slots(&self) -> &[SlotRef] {
        &self.inputs
    }

    pub fn output_slots(&self) -> &[SlotRef] {
        &self.outputs
    }

    /// Evaluate this node for `frame`, as pulled through the output `trigger`.
    pub fn eval(&mut self, frame: Frame, trigger: &SlotWeak) -> Result<()> {
        let Self {
            id,
            datas,
            kind,
            inputs,
            ..
        } = self;
        if let Some(kind) = kind.as_deref_mut() {
            trace!(node = %id, frame, "evaluating node kind");
            return kind.eval(frame, inputs.as_slice(), trigger);
        }
        match &datas.functor {
            Some(functor) => {
                trace!(node = %id, frame, "evaluating node functor");
                functor(frame, inputs.as_slice(), trigger)
            }
            None => Err(GraphError::NodeNoFunctor),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("datas", &self.datas)
            .field("dirty", &self.dirty)
            .field("kind", &self.kind.is_some())
            .field("children", &self.children.len())
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}
