//! Slotgraph Core
//!
//! This crate provides a graph-structured dataflow runtime: a tree of owned
//! nodes exposing typed input and output slots. Slots are wired together
//! across node boundaries, and a node recomputes an output on demand by
//! pulling values through its connected inputs.
//!
//! # Architecture
//!
//! - `graph`: nodes, slots, the root [`Graph`](graph::Graph) and its wiring
//! - `error`: the result codes every fallible operation returns
//! - `util`: identity-based lookups over handle collections
//!
//! # Example
//!
//! ```rust
//! use slotgraph_core::graph::{Graph, NodeDatas, SlotDatas};
//!
//! let graph = Graph::default();
//! let source = graph.create_child_node(NodeDatas::new("source", "Number"));
//! let sink = graph.create_child_node(NodeDatas::new("sink", "Sink"));
//!
//! let out = source
//!     .upgrade()
//!     .unwrap()
//!     .borrow_mut()
//!     .create_slot(SlotDatas::output("value", "f32"))
//!     .unwrap();
//! let input = sink
//!     .upgrade()
//!     .unwrap()
//!     .borrow_mut()
//!     .create_slot(SlotDatas::input("value", "f32"))
//!     .unwrap();
//!
//! Graph::connect_slots(&out, &input).unwrap();
//! assert_eq!(input.upgrade().unwrap().borrow().connected_slots().len(), 1);
//! ```

pub mod error;
pub mod graph;
pub mod util;

pub use error::{GraphError, Result};
pub use graph::{Graph, Node, NodeKind, Slot};
