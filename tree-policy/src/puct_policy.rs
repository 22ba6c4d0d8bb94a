use crate::EdgeStats;

/// The exploration constant used by [`PuctPolicy`].
///
/// Fixed rather than configurable: the search this policy was built for was tuned around
/// this single value and never exposed it as a knob.
const EXPLORATION_CONSTANT: f64 = 5.0;

/// The PUCT selection policy used to walk down the tree during the selection phase of a
/// rollout.
///
/// # Formula
///
/// ```math
/// score(a) = Q(a) + c · P(a)
///
/// with Q(a) = (acc_reward(a) + 0.5) / (n(a) + 1)
///      P(a) = (use_prior ? prior(a) : 1) · √(parent_count) / (1 + n(a))
///      c    = 5.0
/// ```
///
/// `Q` uses Laplace smoothing (`+0.5` / `+1`) so that an edge with zero visits scores a
/// neutral 0.5 instead of dividing by zero or requiring a separate first-play-urgency
/// case. `P` falls back to a uniform prior of `1.0` when `use_prior` is `false`, which
/// reduces the formula to plain UCT.
///
/// Ties are broken by the caller walking edges in insertion order and keeping the first
/// maximum found, since this type only scores a single edge at a time.
///
/// # See also
///
/// - [Wikipedia article on UCT](https://en.wikipedia.org/wiki/Monte_Carlo_tree_search#Exploration_and_exploitation)
/// - [Mastering the Game of Go without Human Knowledge](https://www.nature.com/articles/nature24270)
#[derive(Debug, Clone, Copy, Default)]
pub struct PuctPolicy {
    use_prior: bool,
}

impl PuctPolicy {
    /// Creates a new [`PuctPolicy`]. When `use_prior` is `false` the prior term is
    /// replaced by a constant `1.0`, yielding plain UCT.
    #[must_use]
    pub const fn new(use_prior: bool) -> Self {
        Self { use_prior }
    }

    /// Scores a single edge given the parent's total visit count.
    ///
    /// # Arguments
    ///
    /// * `parent_count` - The number of times the parent node has been visited.
    /// * `edge` - The edge statistics for the candidate action.
    #[must_use]
    pub fn score(&self, parent_count: u32, edge: &impl EdgeStats) -> f64 {
        let q = (edge.acc_reward() + 0.5) / (f64::from(edge.n()) + 1.0);
        let prior = if self.use_prior { f64::from(edge.prior()) } else { 1.0 };
        let p = prior * f64::from(parent_count).sqrt() / (1.0 + f64::from(edge.n()));
        q + EXPLORATION_CONSTANT * p
    }

    /// Selects the edge with the highest score among `edges`, breaking ties by returning
    /// the first maximum encountered (i.e. insertion order).
    ///
    /// Returns `None` if `edges` is empty.
    pub fn select<'a, A, E: EdgeStats>(
        &self,
        parent_count: u32,
        edges: impl IntoIterator<Item = (&'a A, &'a E)>,
    ) -> Option<&'a A>
    where
        A: 'a,
        E: 'a,
    {
        let mut best: Option<(&A, f64)> = None;
        for (action, edge) in edges {
            let score = self.score(parent_count, edge);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((action, score)),
            }
        }
        best.map(|(action, _)| action)
    }
}
