pub mod config;
pub mod correlation;
pub mod error;
pub mod metrics;
pub mod models;
pub mod parsing;
pub mod persistence;
pub mod pipeline;
pub mod source;
#[cfg(test)]
pub mod test_helpers;
