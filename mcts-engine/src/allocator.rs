use std::fmt::Debug;
use std::hash::Hash;
use std::io::Write;
use std::sync::{Arc, Mutex, RwLock};

use crate::node::Node;
use crate::node_id::NodeId;

/// Owns every node in the shared search tree and hands out stable [`NodeId`]s.
///
/// Slots live in a `Vec` behind a `RwLock`: the hot path (a worker reading a node once
/// per rollout step) only ever takes the read side. Allocating or freeing takes the
/// write side just long enough to grow the vector or tombstone a slot. Freed slots are
/// set to `None` and their id is pushed onto a free list for reuse, so an id already
/// handed out to a caller never starts referring to a different node.
pub struct Allocator<Act> {
    slots: RwLock<Vec<Option<Arc<Node<Act>>>>>,
    free: Mutex<Vec<NodeId>>,
    root: Mutex<NodeId>,
}

impl<Act: Eq + Hash + Clone> Allocator<Act> {
    #[must_use]
    pub fn new() -> Self {
        let alloc = Self {
            slots: RwLock::new(Vec::new()),
            free: Mutex::new(Vec::new()),
            root: Mutex::new(NodeId::INVALID),
        };
        let root_id = alloc.alloc();
        *alloc.root.lock().unwrap() = root_id;
        alloc
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        *self.root.lock().unwrap()
    }

    /// The number of live (non-tombstoned) nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.read().unwrap().iter().filter(|s| s.is_some()).count()
    }

    /// Allocates a fresh, unexpanded node and returns its id.
    pub fn alloc(&self) -> NodeId {
        if let Some(id) = self.free.lock().unwrap().pop() {
            self.slots.write().unwrap()[id.0] = Some(Arc::new(Node::new()));
            return id;
        }
        let mut slots = self.slots.write().unwrap();
        let id = NodeId(slots.len());
        slots.push(Some(Arc::new(Node::new())));
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<Arc<Node<Act>>> {
        self.slots.read().unwrap().get(id.0).and_then(Clone::clone)
    }

    /// Tombstones `id`'s slot without touching anything it points to.
    pub fn free(&self, id: NodeId) {
        if let Some(slot) = self.slots.write().unwrap().get_mut(id.0) {
            *slot = None;
        }
        self.free.lock().unwrap().push(id);
    }

    /// Frees `id` and every node reachable from it through its edges.
    pub fn recursive_free(&self, id: NodeId) {
        if let Some(node) = self.get(id) {
            for (_, edge) in node.edges() {
                if edge.next.is_valid() {
                    self.recursive_free(edge.next);
                }
            }
        }
        self.free(id);
    }

    /// Advances the root to the child reached by `action`, recursively freeing every
    /// sibling subtree and the old root. If the old root has no edge for `action` (it
    /// was never visited, or the actor played a move the tree never expanded down), a
    /// fresh empty root is allocated instead.
    pub fn tree_advance(&self, action: &Act) {
        let old_root = self.root();
        let mut next_root = NodeId::INVALID;

        if let Some(node) = self.get(old_root) {
            for (a, edge) in node.edges() {
                if a == *action {
                    next_root = edge.next;
                } else if edge.next.is_valid() {
                    self.recursive_free(edge.next);
                }
            }
        }

        self.free(old_root);
        let new_root = if next_root.is_valid() { next_root } else { self.alloc() };
        *self.root.lock().unwrap() = new_root;
    }

    /// Discards the whole tree and starts over with a single fresh root.
    pub fn clear(&self) {
        {
            let mut slots = self.slots.write().unwrap();
            slots.clear();
        }
        self.free.lock().unwrap().clear();
        let root_id = self.alloc();
        *self.root.lock().unwrap() = root_id;
    }
}

impl<Act: Eq + Hash + Clone + Debug> Allocator<Act> {
    /// Writes a human-readable dump of every live node and its edges to `writer`. Meant
    /// as a diagnostic aid (`MctsOptions::save_tree_filename`); the format is not meant
    /// to be read back into a live allocator.
    pub fn write_dump(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        let slots = self.slots.read().unwrap();
        for (idx, slot) in slots.iter().enumerate() {
            let Some(node) = slot else { continue };
            writeln!(
                writer,
                "node {idx} visited={} count={} value={}",
                node.visited(),
                node.count(),
                node.value()
            )?;
            for (action, edge) in node.edges() {
                writeln!(
                    writer,
                    "  edge {action:?} -> node {} prior={} n={} acc_reward={}",
                    edge.next.0, edge.prior, edge.n, edge.acc_reward
                )?;
            }
        }
        Ok(())
    }
}

impl<Act: Eq + Hash + Clone> Default for Allocator<Act> {
    fn default() -> Self {
        Self::new()
    }
}
