use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use mcts_primitives::{Notif, SemaCollector};
use tracing::{debug, info};
use tree_policy::{PickMethod, PuctPolicy};

use crate::actor::Actor;
use crate::allocator::Allocator;
use crate::error::EngineError;
use crate::node::Node;
use crate::options::MctsOptions;

#[derive(Clone)]
struct RunRequest<A: Actor> {
    root_state: A,
    num_rollout: usize,
}

/// A parallel Monte Carlo tree search over one tree shared by a pool of worker threads.
///
/// `options.num_threads` workers are spawned once, at construction, and parked on their
/// own [`SemaCollector`] between searches. [`TreeSearch::run`] wakes every worker, blocks
/// until all of them report one round complete on a shared `tree_ready` counter, then
/// picks a root action per `options.pick_method`. Dropping (or explicitly calling
/// [`TreeSearch::stop`]) signals every worker to exit and joins them.
pub struct TreeSearch<A: Actor> {
    allocator: Arc<Allocator<A::Action>>,
    policy: PuctPolicy,
    options: MctsOptions,
    request: Arc<Mutex<Option<RunRequest<A>>>>,
    state_ready: Vec<Arc<SemaCollector>>,
    tree_ready: Arc<SemaCollector>,
    done: Arc<Notif>,
    handles: Vec<JoinHandle<()>>,
    move_number: i64,
}

impl<A: Actor> TreeSearch<A> {
    #[must_use]
    pub fn new(options: MctsOptions) -> Self {
        let allocator = Arc::new(Allocator::new());
        let policy = PuctPolicy::new(options.use_prior);
        let request: Arc<Mutex<Option<RunRequest<A>>>> = Arc::new(Mutex::new(None));
        let tree_ready = Arc::new(SemaCollector::new());
        let done = Arc::new(Notif::new());

        let mut state_ready = Vec::with_capacity(options.num_threads);
        let mut handles = Vec::with_capacity(options.num_threads);

        for thread_id in 0..options.num_threads {
            let my_state_ready = Arc::new(SemaCollector::new());
            state_ready.push(Arc::clone(&my_state_ready));

            let allocator = Arc::clone(&allocator);
            let request = Arc::clone(&request);
            let tree_ready = Arc::clone(&tree_ready);
            let done = Arc::clone(&done);
            let policy = policy;

            handles.push(thread::spawn(move || {
                worker_loop(thread_id, &allocator, &request, &my_state_ready, &tree_ready, &done, &policy);
            }));
        }

        Self {
            allocator,
            policy,
            options,
            request,
            state_ready,
            tree_ready,
            done,
            handles,
            move_number: -1,
        }
    }

    /// Runs `options.num_rollout_per_thread` rollouts per worker from `root_state`, then
    /// returns the action picked at the root (per `options.pick_method`) together with
    /// the statistic it was picked on (visit count, or prior).
    ///
    /// A terminal root that expands with no edges at all returns `Ok` with the zero
    /// (`Default`) action and a `0.0` statistic, per the spec's failure semantics —
    /// never an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidState`] if the root node vanished out from under the
    /// search (should not happen outside a bug in this crate).
    pub fn run(&self, root_state: A) -> Result<(A::Action, f64), EngineError> {
        let _span = self.options.verbose.then(|| tracing::info_span!("run").entered());
        let started = self.options.verbose_time.then(std::time::Instant::now);

        {
            let mut request = self.request.lock().unwrap();
            *request = Some(RunRequest {
                root_state,
                num_rollout: self.options.num_rollout_per_thread,
            });
        }

        for s in &self.state_ready {
            s.notify();
        }
        self.tree_ready.wait(self.state_ready.len(), None);
        self.tree_ready.reset();

        if let Some(started) = started {
            debug!(elapsed_ms = started.elapsed().as_secs_f64() * 1000.0, "rollout round complete");
        }

        let root_id = self.allocator.root();
        let root = self
            .allocator
            .get(root_id)
            .ok_or_else(|| EngineError::InvalidState("root node missing after run".to_owned()))?;
        let edges = root.edges();
        if edges.is_empty() {
            // Terminal at root with no prior edges: the spec's failure semantics call
            // for the zero action here, not an error.
            return Ok((A::Action::default(), 0.0));
        }

        let refs: Vec<_> = edges.iter().map(|(a, e)| (a, e)).collect();
        let best = self
            .options
            .pick_method
            .pick(refs)
            .expect("edges is non-empty")
            .clone();
        let stat = edges
            .iter()
            .find(|(a, _)| *a == best)
            .map(|(_, e)| match self.options.pick_method {
                PickMethod::MostVisited => f64::from(e.n),
                PickMethod::StrongestPrior => f64::from(e.prior),
            })
            .unwrap_or(0.0);

        if self.options.verbose {
            info!(stat, "picked root action");
        }

        Ok((best, stat))
    }

    /// Advances the shared tree to the child reached by `action`, pruning every other
    /// subtree. Meaningful regardless of `persistent_tree`, but only useful when it is
    /// set — a non-persistent search's next `run` clears the tree anyway.
    pub fn tree_advance(&self, action: &A::Action) {
        self.allocator.tree_advance(action);
    }

    /// Replays every action `actor` reports via [`Actor::moves_since`] onto the shared
    /// tree. A no-op for actors that do not override the default `moves_since`.
    pub fn advance_moves(&mut self, actor: &mut A) {
        for action in actor.moves_since(&mut self.move_number) {
            self.tree_advance(&action);
        }
    }

    /// Discards the whole tree and starts over with a single fresh root.
    pub fn clear(&mut self) {
        self.allocator.clear();
        self.move_number = -1;
    }

    #[must_use]
    pub fn allocator(&self) -> &Allocator<A::Action> {
        &self.allocator
    }

    /// Writes a diagnostic dump of the tree to `options.save_tree_filename`, if set.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`EngineError::Io`] if the file cannot be written.
    pub fn dump_tree(&self) -> Result<(), EngineError>
    where
        A::Action: std::fmt::Debug,
    {
        if let Some(path) = &self.options.save_tree_filename {
            let mut file = std::fs::File::create(path)?;
            self.allocator.write_dump(&mut file)?;
        }
        Ok(())
    }

    /// Signals every worker thread to exit after finishing its current (possibly empty)
    /// round, and waits for them all to acknowledge before joining. Idempotent — calling
    /// it twice (or letting `Drop` call it after an explicit `stop`) is a no-op the
    /// second time.
    pub fn stop(&mut self) {
        if self.done.get() {
            return;
        }
        self.done.set();
        {
            let mut request = self.request.lock().unwrap();
            *request = None;
        }
        for s in &self.state_ready {
            s.notify();
        }
        self.tree_ready.wait(self.state_ready.len(), None);
        self.done.wait(self.state_ready.len(), None::<fn()>);

        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl<A: Actor> Drop for TreeSearch<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[allow(clippy::too_many_arguments)]
fn worker_loop<A: Actor>(
    thread_id: usize,
    allocator: &Arc<Allocator<A::Action>>,
    request: &Arc<Mutex<Option<RunRequest<A>>>>,
    state_ready: &SemaCollector,
    tree_ready: &SemaCollector,
    done: &Notif,
    policy: &PuctPolicy,
) {
    while !done.get() {
        state_ready.wait(1, None);
        state_ready.reset();

        let snapshot = request.lock().unwrap().clone();
        if let Some(run) = snapshot {
            run_rollouts(thread_id, &run.root_state, run.num_rollout, allocator, policy);
        }

        tree_ready.notify();
    }
    done.notify();
}

fn run_rollouts<A: Actor>(
    thread_id: usize,
    root_state: &A,
    num_rollout: usize,
    allocator: &Allocator<A::Action>,
    policy: &PuctPolicy,
) {
    for _ in 0..num_rollout {
        let mut trajectory: Vec<(Arc<Node<A::Action>>, A::Action)> = Vec::new();

        let mut node_id = allocator.root();
        let Some(mut node) = allocator.get(node_id) else {
            return;
        };
        let mut state = root_state.clone();
        state.set_thread(thread_id);
        let mut terminal = false;

        while node.visited() {
            let Some(action) = node.select(policy) else {
                break;
            };
            trajectory.push((Arc::clone(&node), action.clone()));

            let next_id = node.descent(&action);
            if !state.forward(&action) {
                terminal = true;
                break;
            }

            node_id = next_id;
            match allocator.get(node_id) {
                Some(next_node) => node = next_node,
                None => break,
            }
        }

        if !terminal {
            node.expand_if_necessary(|| state.evaluate(), || allocator.alloc());
        }

        let reward = f64::from(state.reward());
        for (n, a) in &trajectory {
            n.accumulate_stats(a, reward);
        }
    }
}
