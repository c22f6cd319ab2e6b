mod oblivious_exchange;
mod upstream;

pub use oblivious_exchange::ObliviousExchange;
pub use upstream::{Reply, Upstream};

// Re-export for convenience
pub use ferrous_q_domain::Question;
