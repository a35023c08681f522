//! Policy trait and implementations.

pub mod greedy;
pub mod q_policy;
pub mod random;
pub mod trait_;

pub use greedy::GreedyChasePolicy;
pub use q_policy::QPolicy;
pub use random::RandomPolicy;
pub use trait_::Policy;
