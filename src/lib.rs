// src/lib.rs
pub mod config;
pub mod health;
pub mod logging;
pub mod probe;

pub use health::{
    check_all, reduce_results, CheckFailure, CheckResult, HealthAggregator, Target, Verdict,
};
