/// The statistics a selection policy needs about one action edge out of a node.
///
/// `mcts-engine`'s `EdgeInfo` is the concrete implementation; this trait exists so that
/// `tree-policy` has no dependency on the engine crate and can be exercised with plain
/// test fixtures.
pub trait EdgeStats {
    /// The prior probability assigned to this edge by the actor's policy head.
    fn prior(&self) -> f32;
    /// The number of times this edge has been traversed.
    fn n(&self) -> u32;
    /// The accumulated reward backed up through this edge.
    fn acc_reward(&self) -> f64;
}
