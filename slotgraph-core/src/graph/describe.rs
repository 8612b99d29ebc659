//! Introspection snapshots.
//!
//! The graph never persists itself. These plain records expose what an
//! external layer needs to do so: names, type tags, slot directions and the
//! shape of the connections.

use serde::{Deserialize, Serialize};

use super::datas::{Frame, SlotDir};
use super::node::Node;
use super::root::Graph;
use super::slot::Slot;

/// Snapshot of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    pub id: u64,
    pub name: String,
    pub slot_type: String,
    pub dir: SlotDir,
    pub last_frame: Frame,
    /// Peer slot ids in connection order. `None` marks a peer that no
    /// longer exists.
    pub connections: Vec<Option<u64>>,
}

/// Snapshot of a node and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: u64,
    pub name: String,
    pub node_type: String,
    pub dirty: bool,
    pub inputs: Vec<SlotDescriptor>,
    pub outputs: Vec<SlotDescriptor>,
    pub children: Vec<NodeDescriptor>,
}

impl Slot {
    pub fn describe(&self) -> SlotDescriptor {
        let connections = self
            .connected_slots()
            .iter()
            .map(|peer| {
                let peer = peer.upgrade()?;
                let id = peer.borrow().id();
                Some(id.raw())
            })
            .collect();
        SlotDescriptor {
            id: self.id().raw(),
            name: self.datas().name.clone(),
            slot_type: self.datas().slot_type.clone(),
            dir: self.dir(),
            last_frame: self.last_evaluated_datas().frame,
            connections,
        }
    }
}

impl Node {
    pub fn describe(&self) -> NodeDescriptor {
        NodeDescriptor {
            id: self.id().raw(),
            name: self.datas().name.clone(),
            node_type: self.datas().node_type.clone(),
            dirty: self.is_dirty(),
            inputs: self.input_slots().iter().map(|s| s.borrow().describe()).collect(),
            outputs: self.output_slots().iter().map(|s| s.borrow().describe()).collect(),
            children: self.children().iter().map(|c| c.borrow().describe()).collect(),
        }
    }
}

impl Graph {
    /// Snapshot of the whole tree, starting at the root.
    pub fn describe(&self) -> NodeDescriptor {
        self.root().borrow().describe()
    }
}
