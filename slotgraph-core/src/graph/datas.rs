//! Payload records attached to nodes and slots.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::slot::{SlotRef, SlotWeak};
use crate::error::Result;

/// Caller-supplied evaluation sequence number.
pub type Frame = u64;

/// Opaque, non-owning pointer to caller data.
///
/// Resolves to nothing once the caller drops the value it points at.
pub type UserDatas = Option<Weak<dyn Any>>;

/// Default evaluation strategy for nodes without a [`NodeKind`](super::NodeKind).
///
/// Called with the frame being evaluated, the node's input slots and the
/// output slot that triggered the pull.
pub type Functor = Rc<dyn Fn(Frame, &[SlotRef], &SlotWeak) -> Result<()>>;

fn downgrade_user_datas<T: Any>(datas: &Rc<T>) -> UserDatas {
    let weak = Rc::downgrade(datas) as Weak<dyn Any>;
    Some(weak)
}

fn resolve_user_datas<T: Any>(datas: &UserDatas) -> Option<Rc<T>> {
    datas.as_ref()?.upgrade()?.downcast::<T>().ok()
}

/// Direction of a slot. Fixed when the slot is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SlotDir {
    Input,
    Output,
}

/// Payload of a slot: its role in the node.
#[derive(Debug, Clone)]
pub struct SlotDatas {
    pub name: String,
    /// Free-form type tag, never checked by the graph.
    pub slot_type: String,
    pub user_datas: UserDatas,
    dir: SlotDir,
}

impl SlotDatas {
    pub fn new(name: impl Into<String>, slot_type: impl Into<String>, dir: SlotDir) -> Self {
        Self {
            name: name.into(),
            slot_type: slot_type.into(),
            user_datas: None,
            dir,
        }
    }

    /// Payload for an input slot.
    pub fn input(name: impl Into<String>, slot_type: impl Into<String>) -> Self {
        Self::new(name, slot_type, SlotDir::Input)
    }

    /// Payload for an output slot.
    pub fn output(name: impl Into<String>, slot_type: impl Into<String>) -> Self {
        Self::new(name, slot_type, SlotDir::Output)
    }

    /// Attach a non-owning pointer to caller data.
    pub fn with_user_datas<T: Any>(mut self, datas: &Rc<T>) -> Self {
        self.user_datas = downgrade_user_datas(datas);
        self
    }

    pub fn dir(&self) -> SlotDir {
        self.dir
    }

    /// Resolve the user data pointer as a `T`, if it is still alive and of that type.
    pub fn user_datas<T: Any>(&self) -> Option<Rc<T>> {
        resolve_user_datas(&self.user_datas)
    }
}

/// Metadata of the last successful evaluation of an output slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvalDatas {
    pub frame: Frame,
}

impl EvalDatas {
    pub fn new(frame: Frame) -> Self {
        Self { frame }
    }
}

/// Payload of a node.
#[derive(Clone, Default)]
pub struct NodeDatas {
    pub name: String,
    /// Free-form type tag, never checked by the graph.
    pub node_type: String,
    pub user_datas: UserDatas,
    pub functor: Option<Functor>,
}

impl NodeDatas {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            user_datas: None,
            functor: None,
        }
    }

    /// Attach a non-owning pointer to caller data.
    pub fn with_user_datas<T: Any>(mut self, datas: &Rc<T>) -> Self {
        self.user_datas = downgrade_user_datas(datas);
        self
    }

    /// Set the callback used when the node has no kind of its own.
    pub fn with_functor<F>(mut self, functor: F) -> Self
    where
        F: Fn(Frame, &[SlotRef], &SlotWeak) -> Result<()> + 'static,
    {
        self.functor = Some(Rc::new(functor));
        self
    }

    /// Resolve the user data pointer as a `T`, if it is still alive and of that type.
    pub fn user_datas<T: Any>(&self) -> Option<Rc<T>> {
        resolve_user_datas(&self.user_datas)
    }
}

impl fmt::Debug for NodeDatas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDatas")
            .field("name", &self.name)
            .field("node_type", &self.node_type)
            .field("user_datas", &self.user_datas.is_some())
            .field("functor", &self.functor.is_some())
            .finish()
    }
}
