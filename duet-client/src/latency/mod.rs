mod delay_history;
mod latency_estimator;

pub use delay_history::*;
pub use latency_estimator::*;
