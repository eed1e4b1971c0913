//! Node graph for parsed documents.
//!
//! Nodes live in a generational arena owned by a `Document` and refer to each
//! other through copyable `NodeId`s, so parent, child and sibling links are all
//! peers and no node owns another. Links are only ever added, and each
//! direction of a node can be set exactly once.

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{instrument, trace};

use crate::direction::Direction;

/// Handle to a node inside a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// State of one directional link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unset,
    /// Set, but to no node. Still counts as set.
    Absent,
    Linked(NodeId),
}

impl Slot {
    fn node(self) -> Option<NodeId> {
        match self {
            Slot::Linked(id) => Some(id),
            Slot::Unset | Slot::Absent => None,
        }
    }
}

/// One element of the document.
#[derive(Debug)]
pub struct Node {
    value: String,
    links: [Slot; 4],
}

impl Node {
    fn new(value: String) -> Self {
        Self {
            value,
            links: [Slot::Unset; 4],
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The neighbour in `direction`, if one is linked.
    pub fn link(&self, direction: Direction) -> Option<NodeId> {
        self.links[direction.slot()].node()
    }

    fn is_set(&self, direction: Direction) -> bool {
        self.links[direction.slot()] != Slot::Unset
    }
}

/// A parsed document: every node plus the first one created.
#[derive(Debug)]
pub struct Document {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Add an unlinked node. The first node added becomes the root.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, value: &str) -> NodeId {
        let id = NodeId(self.arena.insert(Node::new(value.to_string())));
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    pub fn value(&self, id: NodeId) -> &str {
        self.node(id).value()
    }

    pub fn link(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.node(id).link(direction)
    }

    /// Link `id` to `target` in `direction` and back-fill the reverse link.
    ///
    /// The reverse link `target -> id` is only written when the target has no
    /// node linked in that direction, so existing structure wins. A `None`
    /// target still uses up the direction on `id`.
    ///
    /// # Panics
    ///
    /// Panics if `direction` was already set on `id`, or if the reverse link
    /// needs writing but the target's slot was already set to no node.
    #[instrument(level = "trace", skip(self))]
    pub fn set_link(&mut self, id: NodeId, direction: Direction, target: Option<NodeId>) {
        self.force_link(id, direction, target);

        if let Some(target) = target {
            let reverse = direction.reverse();
            if self.node(target).link(reverse).is_none() {
                self.force_link(target, reverse, Some(id));
            }
        }
    }

    /// Write a single link without touching the target.
    fn force_link(&mut self, id: NodeId, direction: Direction, target: Option<NodeId>) {
        let node = &mut self.arena[id.0];
        assert!(
            !node.is_set(direction),
            "{} link of node '{}' is already set",
            direction,
            node.value
        );
        node.links[direction.slot()] = match target {
            Some(target) => Slot::Linked(target),
            None => Slot::Absent,
        };
        trace!(%direction, linked = target.is_some(), "link set");
    }

    /// Nodes reachable from `first` by following next siblings.
    pub fn siblings(&self, first: Option<NodeId>) -> Siblings<'_> {
        Siblings {
            document: self,
            next: first,
        }
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        self.siblings(self.link(id, Direction::FirstChild))
    }

    /// Render the document as an indented tree of values.
    ///
    /// The tree is assembled without recursion, but termtree's `Display` and
    /// `Drop` both recurse once per level, so printing a document nested tens
    /// of thousands of levels deep can still exhaust the stack.
    pub fn to_tree(&self) -> Tree<String> {
        // Pre-order list of (node, slot of its parent); slot 0 is the document.
        let mut order: Vec<(NodeId, usize)> = Vec::with_capacity(self.len());
        let mut pending: Vec<(NodeId, usize)> = self.siblings(self.root).map(|id| (id, 0)).collect();
        pending.reverse();
        while let Some((id, parent)) = pending.pop() {
            order.push((id, parent));
            let slot = order.len();
            let first = pending.len();
            pending.extend(self.children(id).map(|child| (child, slot)));
            pending[first..].reverse();
        }

        let mut leaves: Vec<Vec<Tree<String>>> = (0..=order.len()).map(|_| Vec::new()).collect();
        for (index, &(id, parent)) in order.iter().enumerate().rev() {
            let mut children = std::mem::take(&mut leaves[index + 1]);
            children.reverse();
            leaves[parent].push(Tree::new(self.value(id).to_string()).with_leaves(children));
        }

        let mut top_level = std::mem::take(&mut leaves[0]);
        top_level.reverse();
        Tree::new("document".to_string()).with_leaves(top_level)
    }
}

/// Iterator along a next-sibling chain.
pub struct Siblings<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.document.link(current, Direction::NextSibling);
        Some(current)
    }
}
