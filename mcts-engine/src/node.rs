use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use indexmap::IndexMap;
use tree_policy::PuctPolicy;

use crate::edge_info::EdgeInfo;
use crate::node_id::NodeId;

/// The outcome of a call to [`Node::expand_if_necessary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    /// Another thread had already expanded this node; `expand` was not called.
    AlreadyVisited,
    /// This call won the race and populated the node's edges.
    JustVisited,
}

struct NodeInner<Act> {
    value: f32,
    // `IndexMap`, not `HashMap`: selection and root-pick ties are broken by insertion
    // order (spec), which a `HashMap`'s iteration order cannot guarantee.
    sa: IndexMap<Act, EdgeInfo>,
}

/// One node of the shared search tree.
///
/// Expansion is one-shot and thread-safe: `visited` is checked unlocked first (the
/// common case, once a node has settled), and only a thread that sees it still false
/// takes the node's mutex to race for the right to actually expand. `count` is bumped
/// outside that mutex on every backpropagation, since it is monotonic and never read
/// back for correctness — only for logging and the PUCT exploration term.
pub struct Node<Act> {
    visited: AtomicBool,
    count: AtomicU32,
    inner: Mutex<NodeInner<Act>>,
}

impl<Act: Eq + Hash + Clone> Node<Act> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visited: AtomicBool::new(false),
            count: AtomicU32::new(0),
            inner: Mutex::new(NodeInner {
                value: 0.0,
                sa: IndexMap::new(),
            }),
        }
    }

    #[must_use]
    pub fn visited(&self) -> bool {
        self.visited.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.inner.lock().unwrap().value
    }

    /// Expands the node exactly once: `expand` produces the actor's policy/value pair
    /// `(pi, V)`, and `alloc_child` is called once per action in `pi` to reserve a child
    /// id for it. Any thread that loses the race to expand returns
    /// [`VisitKind::AlreadyVisited`] without calling either closure.
    pub fn expand_if_necessary(
        &self,
        expand: impl FnOnce() -> (Vec<(Act, f32)>, f32),
        mut alloc_child: impl FnMut() -> NodeId,
    ) -> VisitKind {
        if self.visited() {
            return VisitKind::AlreadyVisited;
        }

        let mut inner = self.inner.lock().unwrap();
        if self.visited.load(Ordering::Acquire) {
            return VisitKind::AlreadyVisited;
        }

        let (pi, value) = expand();
        for (action, prior) in pi {
            let mut edge = EdgeInfo::new(prior);
            edge.next = alloc_child();
            inner.sa.insert(action, edge);
        }
        inner.value = value;
        drop(inner);

        self.visited.store(true, Ordering::Release);
        VisitKind::JustVisited
    }

    /// Backs up `reward` through the edge taken for `action`. Returns `false` if
    /// `action` is not an edge of this node (it should always be, for a correctly
    /// recorded trajectory).
    pub fn accumulate_stats(&self, action: &Act, reward: f64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(edge) = inner.sa.get_mut(action) else {
            return false;
        };
        edge.acc_reward += reward;
        edge.n += 1;
        drop(inner);
        self.count.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// The child reached by `action`, or [`NodeId::INVALID`] if `action` is not an edge
    /// of this node.
    #[must_use]
    pub fn descent(&self, action: &Act) -> NodeId {
        self.inner
            .lock()
            .unwrap()
            .sa
            .get(action)
            .map_or(NodeId::INVALID, |edge| edge.next)
    }

    /// Picks the next action to descend into using `policy`, scored against this node's
    /// total visit count. `None` if the node has no edges (a terminal node that
    /// expanded with an empty policy).
    pub fn select(&self, policy: &PuctPolicy) -> Option<Act> {
        let inner = self.inner.lock().unwrap();
        policy.select(self.count(), inner.sa.iter()).cloned()
    }

    /// A snapshot of this node's edges, used for root move selection and tree pruning.
    #[must_use]
    pub fn edges(&self) -> Vec<(Act, EdgeInfo)> {
        self.inner
            .lock()
            .unwrap()
            .sa
            .iter()
            .map(|(a, e)| (a.clone(), e.clone()))
            .collect()
    }
}

impl<Act: Eq + Hash + Clone> Default for Node<Act> {
    fn default() -> Self {
        Self::new()
    }
}
