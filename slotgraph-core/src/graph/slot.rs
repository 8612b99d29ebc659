//! Slots
//!
//! A slot is one typed endpoint of a node. It records which peer slots it is
//! connected to, without keeping any of them alive, and the metadata of the
//! last evaluation that targeted it.
//!
//! Slots only ever touch their own connection list. Keeping the two sides of
//! a connection in step is the job of [`Graph::connect_slots`] and
//! [`Graph::disconnect_slots`].
//!
//! [`Graph::connect_slots`]: super::Graph::connect_slots
//! [`Graph::disconnect_slots`]: super::Graph::disconnect_slots

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::trace;

use super::datas::{EvalDatas, SlotDatas, SlotDir, UserDatas};
use super::identity::SlotId;
use super::node::{NodeRef, NodeWeak};
use crate::error::{GraphError, Result};
use crate::util;

/// Owning handle to a slot. Held only by the slot's node.
pub type SlotRef = Rc<RefCell<Slot>>;

/// Non-owning handle to a slot.
pub type SlotWeak = Weak<RefCell<Slot>>;

/// An input or output endpoint of a node.
#[derive(Debug)]
pub struct Slot {
    id: SlotId,

    /// Handle to this slot, set at construction.
    this: SlotWeak,

    /// Node whose input or output collection holds this slot.
    parent: NodeWeak,

    datas: SlotDatas,

    /// Peer slots. Duplicates are kept as-is.
    connections: SmallVec<[SlotWeak; 4]>,

    last_evaluated: EvalDatas,
}

impl Slot {
    /// Build a detached slot.
    pub fn create(datas: SlotDatas) -> SlotRef {
        Rc::new_cyclic(|this| {
            RefCell::new(Self {
                id: SlotId::new(),
                this: this.clone(),
                parent: Weak::new(),
                datas,
                connections: SmallVec::new(),
                last_evaluated: EvalDatas::default(),
            })
        })
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Non-owning handle to this slot.
    pub fn handle(&self) -> SlotWeak {
        self.this.clone()
    }

    pub fn datas(&self) -> &SlotDatas {
        &self.datas
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.datas.name = name.into();
    }

    pub fn set_slot_type(&mut self, slot_type: impl Into<String>) {
        self.datas.slot_type = slot_type.into();
    }

    pub fn set_user_datas(&mut self, user_datas: UserDatas) {
        self.datas.user_datas = user_datas;
    }

    pub fn dir(&self) -> SlotDir {
        self.datas.dir()
    }

    pub fn is_input(&self) -> bool {
        self.dir() == SlotDir::Input
    }

    pub fn is_output(&self) -> bool {
        self.dir() == SlotDir::Output
    }

    /// The node owning this slot. Empty while the slot is detached.
    pub fn parent_node(&self) -> NodeWeak {
        self.parent.clone()
    }

    pub(crate) fn set_parent_node(&mut self, parent: NodeWeak) {
        self.parent = parent;
    }

    /// Record `peer` as connected to this slot.
    ///
    /// Fails with [`GraphError::SlotNull`] if `peer` is expired. Connecting
    /// the same peer twice records it twice.
    pub fn connect_to(&mut self, peer: &SlotWeak) -> Result<()> {
        if peer.strong_count() == 0 {
            return Err(GraphError::SlotNull);
        }
        self.connections.push(peer.clone());
        trace!(slot = %self.id, connections = self.connections.len(), "slot connected");
        Ok(())
    }

    /// Remove one entry for `peer`.
    ///
    /// Fails with [`GraphError::SlotNotFound`] if no live entry matches.
    pub fn disconnect_from(&mut self, peer: &SlotWeak) -> Result<()> {
        let index =
            util::position_weak(&self.connections, peer).ok_or(GraphError::SlotNotFound)?;
        self.connections.remove(index);
        trace!(slot = %self.id, connections = self.connections.len(), "slot disconnected");
        Ok(())
    }

    /// Drop every connection of this slot, leaving peers untouched.
    pub fn disconnect_all(&mut self) {
        self.connections.clear();
    }

    /// Connected peers, including ones whose owner has since been destroyed.
    pub fn connected_slots(&self) -> &[SlotWeak] {
        &self.connections
    }

    /// Connected peers that are still alive.
    pub fn resolved_peers(&self) -> impl Iterator<Item = SlotRef> + '_ {
        self.connections.iter().filter_map(Weak::upgrade)
    }

    /// Owners of the live connected peers, in connection order.
    ///
    /// Peers that are alive but detached from any node are skipped.
    pub fn connected_nodes(&self) -> Vec<NodeRef> {
        self.resolved_peers()
            .filter_map(|peer| {
                let parent = peer.borrow().parent_node();
                parent.upgrade()
            })
            .collect()
    }

    pub fn set_last_evaluated_datas(&mut self, datas: EvalDatas) {
        self.last_evaluated = datas;
    }

    pub fn last_evaluated_datas(&self) -> EvalDatas {
        self.last_evaluated
    }
}
