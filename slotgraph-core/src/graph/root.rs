//! The Graph
//!
//! [`Graph`] is the root node of a tree and the handle a caller holds. It
//! creates and releases child nodes, and wires slots together so that both
//! ends of a connection record each other.
//!
//! Two partial-failure shapes are kept on purpose:
//!
//! - [`Graph::connect_slots`] does not undo the first half of a connection if
//!   the second half fails.
//! - [`Graph::disconnect_slots`] always attempts both halves and reports the
//!   result of the second one only.

use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use super::datas::NodeDatas;
use super::identity::NodeId;
use super::node::{Node, NodeKind, NodeRef, NodeWeak};
use super::slot::SlotWeak;
use crate::error::{GraphError, Result};

/// The root of a node tree.
#[derive(Debug)]
pub struct Graph {
    root: NodeRef,
}

impl Graph {
    /// Create an empty graph whose root node carries `datas`.
    pub fn new(datas: NodeDatas) -> Self {
        Self {
            root: Node::create(datas),
        }
    }

    /// The root node. It has no parent.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Non-owning handle to the root node.
    pub fn handle(&self) -> NodeWeak {
        Rc::downgrade(&self.root)
    }

    pub fn id(&self) -> NodeId {
        self.root.borrow().id()
    }

    pub fn is_dirty(&self) -> bool {
        self.root.borrow().is_dirty()
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.root.borrow_mut().set_dirty(dirty);
    }

    /// Create a child node driven by the functor in `datas`, if any.
    pub fn create_child_node(&self, datas: NodeDatas) -> NodeWeak {
        self.adopt(Node::create(datas))
    }

    /// Create a child node with kind-specific behavior.
    ///
    /// If the kind's init hook fails, the returned handle resolves to nothing
    /// and the graph is left unchanged.
    pub fn create_child_node_with_kind<K: NodeKind>(&self, datas: NodeDatas, kind: K) -> NodeWeak {
        self.adopt(Node::create_with_kind(datas, kind))
    }

    fn adopt(&self, node: NodeRef) -> NodeWeak {
        if let Err(error) = node.borrow_mut().init_kind() {
            warn!(graph = %self.id(), %error, "node init failed; child not created");
            return Weak::new();
        }
        let handle = Rc::downgrade(&node);
        let added = self.root.borrow_mut().add_child_node(node);
        match added {
            Ok(()) => handle,
            Err(error) => {
                warn!(graph = %self.id(), %error, "child node rejected");
                Weak::new()
            }
        }
    }

    /// Take ownership of an already-built node. See [`Node::add_child_node`].
    pub fn add_child_node(&self, node: NodeRef) -> Result<()> {
        self.root.borrow_mut().add_child_node(node)
    }

    /// Release a child of the root. See [`Node::remove_child_node`].
    pub fn remove_child_node(&self, node: &NodeWeak) -> Result<()> {
        self.root.borrow_mut().remove_child_node(node)
    }

    /// Handles to the root's children, in insertion order.
    pub fn child_nodes(&self) -> Vec<NodeWeak> {
        self.root.borrow().child_nodes()
    }

    /// Connect `from` and `to` in both directions.
    ///
    /// Fails with [`GraphError::SlotNull`] if either handle is expired. A
    /// failure recording `from` on `to` leaves the `to` entry already
    /// recorded on `from` in place.
    pub fn connect_slots(from: &SlotWeak, to: &SlotWeak) -> Result<()> {
        let (Some(from_slot), Some(to_slot)) = (from.upgrade(), to.upgrade()) else {
            debug!("connect_slots: unresolved slot handle");
            return Err(GraphError::SlotNull);
        };
        from_slot.borrow_mut().connect_to(to)?;
        to_slot.borrow_mut().connect_to(from)?;
        trace!(
            from = %from_slot.borrow().id(),
            to = %to_slot.borrow().id(),
            "slots connected"
        );
        Ok(())
    }

    /// Disconnect `from` and `to` in both directions, best effort.
    ///
    /// Both halves are attempted whatever the first one returns; the result
    /// is that of the second half. Fails with [`GraphError::SlotNull`] only if
    /// neither handle resolves.
    pub fn disconnect_slots(from: &SlotWeak, to: &SlotWeak) -> Result<()> {
        let mut result = Err(GraphError::SlotNull);
        if let Some(from_slot) = from.upgrade() {
            result = from_slot.borrow_mut().disconnect_from(to);
        }
        if let Some(to_slot) = to.upgrade() {
            result = to_slot.borrow_mut().disconnect_from(from);
        }
        trace!(ok = result.is_ok(), "slots disconnected");
        result
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(NodeDatas::new("graph", "Graph"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::datas::{Frame, SlotDatas};
    use crate::graph::slot::SlotRef;

    struct Broken;

    impl NodeKind for Broken {
        fn init(&mut self, _datas: &NodeDatas) -> Result<()> {
            Err(GraphError::Failed)
        }

        fn eval(&mut self, _frame: Frame, _inputs: &[SlotRef], _trigger: &SlotWeak) -> Result<()> {
            Ok(())
        }
    }

    fn wired_pair(graph: &Graph) -> (SlotWeak, SlotWeak) {
        let a = graph.create_child_node(NodeDatas::new("a", "Plain"));
        let b = graph.create_child_node(NodeDatas::new("b", "Plain"));
        let out = a
            .upgrade()
            .unwrap()
            .borrow_mut()
            .create_slot(SlotDatas::output("out", "f32"))
            .unwrap();
        let input = b
            .upgrade()
            .unwrap()
            .borrow_mut()
            .create_slot(SlotDatas::input("in", "f32"))
            .unwrap();
        (out, input)
    }

    fn connections(slot: &SlotWeak) -> usize {
        slot.upgrade().unwrap().borrow().connected_slots().len()
    }

    #[test]
    fn default_graph_is_an_unparented_root() {
        let graph = Graph::default();
        let root = graph.root().borrow();

        assert_eq!(root.datas().name, "graph");
        assert_eq!(root.datas().node_type, "Graph");
        assert!(root.parent_node().upgrade().is_none());
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn create_child_node_parents_to_root() {
        let graph = Graph::default();
        let child = graph.create_child_node(NodeDatas::new("child", "Plain"));

        let child = child.upgrade().unwrap();
        let parent = child.borrow().parent_node();
        assert!(Rc::ptr_eq(&parent.upgrade().unwrap(), graph.root()));
        assert_eq!(graph.child_nodes().len(), 1);
        assert_eq!(child.borrow().datas().name, "child");
    }

    #[test]
    fn failed_init_inserts_nothing() {
        let graph = Graph::default();
        let handle = graph.create_child_node_with_kind(NodeDatas::new("broken", "Broken"), Broken);

        assert!(handle.upgrade().is_none());
        assert!(graph.child_nodes().is_empty());
    }

    #[test]
    fn connect_is_reciprocal() {
        let graph = Graph::default();
        let (out, input) = wired_pair(&graph);

        assert_eq!(Graph::connect_slots(&out, &input), Ok(()));

        let out_ref = out.upgrade().unwrap();
        let input_ref = input.upgrade().unwrap();
        assert!(out_ref.borrow().connected_slots()[0].ptr_eq(&input));
        assert!(input_ref.borrow().connected_slots()[0].ptr_eq(&out));
    }

    #[test]
    fn connect_with_null_side_changes_nothing() {
        let graph = Graph::default();
        let (out, input) = wired_pair(&graph);

        assert_eq!(Graph::connect_slots(&Weak::new(), &input), Err(GraphError::SlotNull));
        assert_eq!(Graph::connect_slots(&out, &Weak::new()), Err(GraphError::SlotNull));
        assert_eq!(connections(&out), 0);
        assert_eq!(connections(&input), 0);
    }

    #[test]
    fn disconnect_twice_reports_not_found() {
        let graph = Graph::default();
        let (out, input) = wired_pair(&graph);
        Graph::connect_slots(&out, &input).unwrap();

        assert_eq!(Graph::disconnect_slots(&out, &input), Ok(()));
        assert_eq!(connections(&out), 0);
        assert_eq!(connections(&input), 0);
        assert_eq!(
            Graph::disconnect_slots(&out, &input),
            Err(GraphError::SlotNotFound)
        );
    }

    #[test]
    fn disconnect_reports_second_half_only() {
        let graph = Graph::default();
        let (out, input) = wired_pair(&graph);

        // One-sided connection: only `input` knows about `out`.
        input
            .upgrade()
            .unwrap()
            .borrow_mut()
            .connect_to(&out)
            .unwrap();

        // First half fails, second succeeds.
        assert_eq!(Graph::disconnect_slots(&out, &input), Ok(()));
        assert_eq!(connections(&input), 0);
    }

    #[test]
    fn disconnect_unresolved_handles() {
        assert_eq!(
            Graph::disconnect_slots(&Weak::new(), &Weak::new()),
            Err(GraphError::SlotNull)
        );
    }

    #[test]
    fn remove_child_node_releases_it() {
        let graph = Graph::default();
        let child = graph.create_child_node(NodeDatas::new("child", "Plain"));

        assert_eq!(graph.remove_child_node(&child), Ok(()));
        assert!(child.upgrade().is_none());
        assert_eq!(graph.remove_child_node(&child), Err(GraphError::NodeNotFound));
    }

    #[test]
    fn add_prebuilt_child_node() {
        let graph = Graph::default();
        let node = Node::create(NodeDatas::new("prebuilt", "Plain"));
        let handle = Rc::downgrade(&node);

        assert_eq!(graph.add_child_node(node), Ok(()));
        assert!(handle.upgrade().is_some());
        assert_eq!(
            graph.add_child_node(graph.root().clone()),
            Err(GraphError::NodeAlreadyExists)
        );
    }

    #[test]
    fn graph_dirty_flag() {
        let graph = Graph::default();
        assert!(!graph.is_dirty());
        graph.set_dirty(true);
        assert!(graph.is_dirty());
    }
}
