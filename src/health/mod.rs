// src/health/mod.rs
mod aggregator;
mod error;
mod status;

pub use aggregator::{check_all, collect_results, HealthAggregator};
pub use error::{CheckFailure, FailureCause};
pub use status::{reduce_results, CheckResult, Target, Verdict};
