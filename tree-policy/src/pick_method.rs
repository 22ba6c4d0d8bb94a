use crate::EdgeStats;

/// How the engine picks a move from the root once a search budget has been spent.
///
/// Both variants break ties by returning the first maximum encountered, i.e. the order
/// `edges` is iterated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickMethod {
    /// Pick the action with the highest visit count. The default and generally the more
    /// robust choice, since visit count reflects both the prior and the accumulated
    /// reward signal.
    #[default]
    MostVisited,
    /// Pick the action with the highest prior, ignoring search statistics entirely.
    /// Mostly useful for sanity-checking an actor's policy head in isolation.
    StrongestPrior,
}

impl PickMethod {
    /// Picks an action out of `edges` according to this method.
    ///
    /// Returns `None` if `edges` is empty.
    pub fn pick<'a, A, E: EdgeStats>(
        &self,
        edges: impl IntoIterator<Item = (&'a A, &'a E)>,
    ) -> Option<&'a A>
    where
        A: 'a,
        E: 'a,
    {
        let key = |edge: &E| -> f64 {
            match self {
                Self::MostVisited => f64::from(edge.n()),
                Self::StrongestPrior => f64::from(edge.prior()),
            }
        };

        let mut best: Option<(&A, f64)> = None;
        for (action, edge) in edges {
            let score = key(edge);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((action, score)),
            }
        }
        best.map(|(action, _)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Edge {
        prior: f32,
        n: u32,
    }

    impl EdgeStats for Edge {
        fn prior(&self) -> f32 {
            self.prior
        }
        fn n(&self) -> u32 {
            self.n
        }
        fn acc_reward(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn most_visited_picks_highest_n() {
        let edges = vec![
            ("a", Edge { prior: 0.9, n: 1 }),
            ("b", Edge { prior: 0.1, n: 10 }),
        ];
        let refs: Vec<_> = edges.iter().map(|(a, e)| (a, e)).collect();
        assert_eq!(PickMethod::MostVisited.pick(refs), Some(&"b"));
    }

    #[test]
    fn strongest_prior_ignores_visit_count() {
        let edges = vec![
            ("a", Edge { prior: 0.9, n: 1 }),
            ("b", Edge { prior: 0.1, n: 10 }),
        ];
        let refs: Vec<_> = edges.iter().map(|(a, e)| (a, e)).collect();
        assert_eq!(PickMethod::StrongestPrior.pick(refs), Some(&"a"));
    }

    #[test]
    fn pick_is_none_for_empty_edges() {
        let edges: Vec<(&str, Edge)> = vec![];
        let refs: Vec<_> = edges.iter().map(|(a, e)| (a, e)).collect();
        assert_eq!(PickMethod::MostVisited.pick(refs), None);
    }
}
