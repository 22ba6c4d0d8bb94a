use tree_policy::EdgeStats;

use crate::node_id::NodeId;

/// One action edge leaving a node: the actor's prior belief about the action, the child
/// it leads to once descended into, and the reward/visit-count accumulated through it.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub prior: f32,
    pub next: NodeId,
    pub acc_reward: f64,
    pub n: u32,
}

impl EdgeInfo {
    #[must_use]
    pub fn new(prior: f32) -> Self {
        Self {
            prior,
            next: NodeId::INVALID,
            acc_reward: 0.0,
            n: 0,
        }
    }
}

impl EdgeStats for EdgeInfo {
    fn prior(&self) -> f32 {
        self.prior
    }

    fn n(&self) -> u32 {
        self.n
    }

    fn acc_reward(&self) -> f64 {
        self.acc_reward
    }
}
