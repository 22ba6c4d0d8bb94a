//! End-to-end scenarios against a toy one-dimensional game: a token starts at position 0
//! on the integer line `[-bound, bound]` and can step left or right each turn. Reaching
//! `bound` rewards `+1`, reaching `-bound` rewards `-1`. No neural network, no
//! randomness — just enough of a game to drive selection, expansion, and
//! backpropagation through their paces.

use std::time::{Duration, Instant};

use mcts_engine::{Actor, MctsOptions, TreeSearch};
use tree_policy::PickMethod;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
enum Move {
    #[default]
    Left,
    Right,
}

#[derive(Clone)]
struct LineWalker {
    position: i32,
    bound: i32,
}

impl LineWalker {
    fn new(bound: i32) -> Self {
        Self { position: 0, bound }
    }

    fn at_bound(&self, position: i32) -> bool {
        position.abs() >= self.bound
    }
}

impl Actor for LineWalker {
    type Action = Move;

    fn set_thread(&mut self, _thread_id: usize) {}

    fn forward(&mut self, action: &Move) -> bool {
        if self.at_bound(self.position) {
            return false;
        }
        self.position += match action {
            Move::Left => -1,
            Move::Right => 1,
        };
        true
    }

    fn reward(&self) -> f32 {
        if self.position >= self.bound {
            1.0
        } else if self.position <= -self.bound {
            -1.0
        } else {
            0.0
        }
    }

    fn evaluate(&self) -> (Vec<(Move, f32)>, f32) {
        if self.at_bound(self.position) {
            (Vec::new(), 0.0)
        } else {
            (vec![(Move::Left, 0.5), (Move::Right, 0.5)], 0.0)
        }
    }
}

/// The literal game described by spec §8's S1 scenario: `s` ranges over `[0, 10]`,
/// actions `{-1, +1}` move it (clamped at `0`), reward is `1.0` iff `s == 10`, and the
/// evaluator is the uniform `(0.5, 0.5)` prior with `V = 0.5`. Unlike [`LineWalker`]
/// (symmetric, rewarded at both ends), reward is only reachable in one direction here,
/// so the search has a real asymmetry to find instead of a coin flip.
#[derive(Clone)]
struct BoundedLine {
    position: i32,
}

impl BoundedLine {
    fn new() -> Self {
        Self { position: 0 }
    }
}

impl Actor for BoundedLine {
    type Action = Move;

    fn set_thread(&mut self, _thread_id: usize) {}

    fn forward(&mut self, action: &Move) -> bool {
        if self.position >= 10 {
            return false;
        }
        let delta = match action {
            Move::Left => -1,
            Move::Right => 1,
        };
        self.position = (self.position + delta).max(0);
        true
    }

    fn reward(&self) -> f32 {
        if self.position >= 10 {
            1.0
        } else {
            0.0
        }
    }

    fn evaluate(&self) -> (Vec<(Move, f32)>, f32) {
        if self.position >= 10 {
            (Vec::new(), 0.0)
        } else {
            (vec![(Move::Left, 0.5), (Move::Right, 0.5)], 0.5)
        }
    }
}

fn options() -> MctsOptions {
    MctsOptions {
        num_threads: 16,
        num_rollout_per_thread: 100,
        use_prior: true,
        pick_method: PickMethod::MostVisited,
        ..MctsOptions::default()
    }
}

#[test]
fn s1_line_walker_prefers_the_rewarding_direction() {
    let ts: TreeSearch<LineWalker> = TreeSearch::new(options());
    let (action, visits) = ts.run(LineWalker::new(5)).expect("root should expand");
    assert_eq!(action, Move::Right);
    assert!(visits > 0.0);
}

/// The literal S1 scenario (spec §8): ten iterations of `Run; forward(best_a);
/// TreeAdvance(best_a)` from `s=0` must reach `s=10`, and the run issued from `s=9` must
/// pick `+1`.
#[test]
fn s1_ten_iterations_of_run_forward_tree_advance_reach_the_goal() {
    let mut opts = options();
    opts.persistent_tree = true;
    let mut ts: TreeSearch<BoundedLine> = TreeSearch::new(opts);

    let mut state = BoundedLine::new();
    let mut last_action = Move::default();
    for _ in 0..10 {
        let (action, _) = ts.run(state.clone()).expect("root should expand");
        if state.position == 9 {
            assert_eq!(action, Move::Right, "the run from s=9 must pick +1");
        }
        state.forward(&action);
        ts.tree_advance(&action);
        last_action = action;
    }

    assert_eq!(state.position, 10, "ten correct steps from s=0 should reach s=10");
    assert_eq!(last_action, Move::Right);
}

/// The literal S2 scenario (spec §8): a state that returns `false` from `forward` for
/// every action. `Run` must return `Ok`, never an error, and since the root expands with
/// no edges at all (the position is already at the terminal bound), the spec's failure
/// semantics ("else the zero action") apply: the zero/default action is returned and no
/// backpropagation happens.
#[test]
fn s2_terminal_root_returns_the_zero_action_without_error_or_backprop() {
    let ts: TreeSearch<LineWalker> = TreeSearch::new(options());
    let terminal = LineWalker { position: 5, bound: 5 };
    let (action, stat) = ts.run(terminal).expect("a terminal root must not be an error");

    assert_eq!(action, Move::default());
    assert_eq!(stat, 0.0);

    let root = ts.allocator().get(ts.allocator().root()).expect("root must still exist");
    assert_eq!(root.count(), 0, "no backprop should have occurred against an edge-less root");
}

#[test]
fn s3_persistent_tree_prunes_to_the_advanced_subtree() {
    let mut opts = options();
    opts.persistent_tree = true;
    let mut ts: TreeSearch<LineWalker> = TreeSearch::new(opts);

    let (action, _) = ts.run(LineWalker::new(5)).expect("root should expand");
    let size_before = ts.allocator().size();
    assert!(size_before > 1);

    let old_root = ts.allocator().root();
    ts.tree_advance(&action);
    let new_root = ts.allocator().root();

    assert_ne!(old_root, new_root);
    assert!(ts.allocator().get(old_root).is_none());
    assert!(ts.allocator().size() < size_before);
}

#[test]
fn s4_stop_while_idle_completes_quickly() {
    let mut ts: TreeSearch<LineWalker> = TreeSearch::new(options());
    let started = Instant::now();
    ts.stop();
    assert!(started.elapsed() < Duration::from_millis(50));
}

#[test]
fn repeated_runs_keep_accumulating_visits_on_a_fresh_tree_each_time() {
    let mut opts = options();
    opts.persistent_tree = false;
    let ts: TreeSearch<LineWalker> = TreeSearch::new(opts);

    let (first_action, _) = ts.run(LineWalker::new(5)).unwrap();
    let (second_action, _) = ts.run(LineWalker::new(5)).unwrap();
    assert_eq!(first_action, second_action);
}
