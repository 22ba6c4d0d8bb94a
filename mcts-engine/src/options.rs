use std::path::PathBuf;

use tree_policy::PickMethod;

/// Tuning knobs for a [`TreeSearch`](crate::TreeSearch).
#[derive(Debug, Clone)]
pub struct MctsOptions {
    /// Number of persistent worker threads sharing one tree.
    pub num_threads: usize,
    /// Rollouts each worker runs per call to `TreeSearch::run`.
    pub num_rollout_per_thread: usize,
    /// Upper bound on moves played by a driver using this search. `0` means no
    /// constraint. Enforced by `ai-driver`'s `MctsAi`, which stops returning actions
    /// once this many moves have been played (reset on `game_end`); this crate itself
    /// has no notion of "moves played" to enforce it against.
    pub max_num_moves: usize,
    pub verbose: bool,
    pub verbose_time: bool,
    /// Reuse the tree across calls to `run` by pruning to the subtree of the move
    /// actually played, instead of discarding it and starting fresh each time.
    pub persistent_tree: bool,
    pub pick_method: PickMethod,
    pub use_prior: bool,
    /// Pre-added pseudo playouts. Carried for parity with the option set this search was
    /// modeled on; nothing in this crate consumes it.
    pub pseudo_games: usize,
    /// When set, a human-readable dump of the tree is written here after the run that
    /// precedes `TreeSearch::stop`. Diagnostic only: the format does not round-trip back
    /// into a live `Allocator`.
    pub save_tree_filename: Option<PathBuf>,
}

impl MctsOptions {
    #[must_use]
    pub fn new(num_threads: usize, num_rollout_per_thread: usize) -> Self {
        Self {
            num_threads,
            num_rollout_per_thread,
            ..Self::default()
        }
    }
}

impl Default for MctsOptions {
    fn default() -> Self {
        Self {
            num_threads: 16,
            num_rollout_per_thread: 100,
            max_num_moves: 0,
            verbose: false,
            verbose_time: false,
            persistent_tree: false,
            pick_method: PickMethod::default(),
            use_prior: false,
            pseudo_games: 0,
            save_tree_filename: None,
        }
    }
}
