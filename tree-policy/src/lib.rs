mod edge_stats;
mod pick_method;
mod puct_policy;

pub use edge_stats::EdgeStats;
pub use pick_method::PickMethod;
pub use puct_policy::PuctPolicy;
