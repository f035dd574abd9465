//! Arena storage and the structural tree operations over it.
//!
//! The tree knows nothing about layout, rendering, or input; it maintains
//! parent/child links and the invariants that keep them consistent. Hooks
//! and dirty-marking happen a level up, in [`Canvas`](crate::Canvas).

use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

use crate::{
    error::{Error, Result},
    id::NodeId,
    node::Node,
    widget::Widget,
};

/// Arena of nodes plus the links that form the tree.
#[derive(Default)]
pub struct Tree {
    /// Node storage. Removal invalidates the id; slotmap versioning makes
    /// stale ids detectable rather than dangling.
    pub(crate) nodes: SlotMap<NodeId, Node>,
}

impl Tree {
    /// Add a detached node wrapping `widget` to the arena.
    pub(crate) fn add(&mut self, widget: Box<dyn Widget>) -> NodeId {
        self.nodes.insert(Node::new(widget))
    }

    /// Does the id refer to a live node?
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Fetch a node, `None` for stale ids.
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Fetch a node mutably, `None` for stale ids.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// True if `ancestor` appears in the structural parent chain of `node`,
    /// including `node` itself.
    pub(crate) fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Follow inner-panel designations down from `parent` to the node that
    /// actually receives new children.
    pub(crate) fn attach_target(&self, parent: NodeId) -> NodeId {
        let mut target = parent;
        while let Some(inner) = self.nodes.get(target).and_then(|n| n.inner_panel) {
            if inner == target || !self.nodes.contains_key(inner) {
                break;
            }
            target = inner;
        }
        target
    }

    /// Attach a detached child under a parent.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        if self.nodes[child].parent.is_some() {
            return Err(Error::AlreadyAttached { node: child });
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.debug_assert_invariants();
        Ok(())
    }

    /// Detach a child from its structural parent. Returns the old parent,
    /// `None` if the child was already detached.
    pub(crate) fn detach(&mut self, child: NodeId) -> Result<Option<NodeId>> {
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        let Some(parent) = self.nodes[child].parent else {
            return Ok(None);
        };

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
            if node.inner_panel == Some(child) {
                node.inner_panel = None;
            }
        }
        let node = &mut self.nodes[child];
        node.parent = None;
        node.logical_parent = None;
        self.debug_assert_invariants();
        Ok(Some(parent))
    }

    /// Subtree ids in pre-order, `root` first. Stale roots yield nothing.
    pub(crate) fn subtree_pre_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Subtree ids in post-order, leaves first.
    pub(crate) fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if visited {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Move `child` to the end of `parent`'s child list, the front of the
    /// z-order. Returns true if the order changed.
    pub(crate) fn raise(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let node = self
            .nodes
            .get_mut(parent)
            .ok_or(Error::NodeNotFound(parent))?;
        let Some(idx) = node.children.iter().position(|id| *id == child) else {
            return Err(Error::NotAChild {
                parent,
                node: child,
            });
        };
        if idx == node.children.len() - 1 {
            return Ok(false);
        }
        node.children.remove(idx);
        node.children.push(child);
        Ok(true)
    }

    /// Move `child` to the start of `parent`'s child list, the back of the
    /// z-order. Returns true if the order changed.
    pub(crate) fn lower(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let node = self
            .nodes
            .get_mut(parent)
            .ok_or(Error::NodeNotFound(parent))?;
        let Some(idx) = node.children.iter().position(|id| *id == child) else {
            return Err(Error::NotAChild {
                parent,
                node: child,
            });
        };
        if idx == 0 {
            return Ok(false);
        }
        node.children.remove(idx);
        node.children.insert(0, child);
        Ok(true)
    }

    /// Assert structural invariants in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_invariants(&self) {
        use std::collections::HashSet;
        for (id, node) in self.nodes.iter() {
            let mut seen = HashSet::with_capacity(node.children.len());
            for child in &node.children {
                debug_assert!(seen.insert(*child), "duplicate child {child:?} under {id:?}");
                let child_node = self.nodes.get(*child);
                debug_assert!(child_node.is_some(), "child {child:?} missing");
                if let Some(child_node) = child_node {
                    debug_assert!(
                        child_node.parent == Some(id),
                        "child {child:?} parent mismatch under {id:?}"
                    );
                }
            }
            if let Some(inner) = node.inner_panel {
                debug_assert!(
                    node.children.contains(&inner),
                    "inner panel {inner:?} is not a child of {id:?}"
                );
            }
            if let Some(parent) = node.parent {
                let parent_node = self.nodes.get(parent);
                debug_assert!(parent_node.is_some(), "parent {parent:?} missing");
                if let Some(parent_node) = parent_node {
                    debug_assert!(
                        parent_node.children.contains(&id),
                        "parent {parent:?} missing child {id:?}"
                    );
                }
            }
            debug_assert!(
                !self.parent_chain_has_cycle(id),
                "cycle detected from {id:?}"
            );
        }
    }

    /// No-op in release builds.
    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_assert_invariants(&self) {}

    /// Return true if a node's parent chain contains a cycle.
    #[cfg(debug_assertions)]
    fn parent_chain_has_cycle(&self, start: NodeId) -> bool {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}
