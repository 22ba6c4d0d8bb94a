use std::hash::Hash;

/// The contract a game state must satisfy to be driven by a [`TreeSearch`](crate::TreeSearch).
///
/// A worker thread clones the root `Actor` once per rollout and replays `forward` down
/// whatever path selection picks, so `Actor` never needs interior mutability or
/// synchronization of its own — each clone is exclusively owned by the thread running
/// it.
pub trait Actor: Clone + Send + 'static {
    /// `Default` is the "zero action" [`TreeSearch::run`](crate::TreeSearch::run) falls
    /// back to when the root expands with no edges at all (a state that is already
    /// terminal and carries no prior edges to pick from).
    type Action: Eq + Hash + Clone + Send + Sync + Default + 'static;

    /// Called once at the start of a rollout, before any `forward` call, so an actor
    /// that holds thread-affine resources (a batched inference slot, a thread-local RNG)
    /// can bind itself to the worker running it.
    fn set_thread(&mut self, thread_id: usize);

    /// Applies `action` in place. Returns `false` if the action cannot be applied
    /// because the current state is terminal.
    fn forward(&mut self, action: &Self::Action) -> bool;

    /// The reward for the current state, from the root player's perspective.
    fn reward(&self) -> f32;

    /// Evaluates the current state, returning a prior over legal actions and a value
    /// estimate for the state itself.
    fn evaluate(&self) -> (Vec<(Self::Action, f32)>, f32);

    /// Returns every action applied to the real game since `move_number`, advancing
    /// `move_number` to the latest one observed. Used in persistent-tree mode to replay
    /// real moves onto the shared tree between searches instead of discarding it. The
    /// default reports no moves, which is the correct behavior for an actor that does
    /// not track move history.
    fn moves_since(&mut self, move_number: &mut i64) -> Vec<Self::Action> {
        let _ = move_number;
        Vec::new()
    }
}
