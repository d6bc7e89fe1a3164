#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

pub mod evaluator;
pub mod host;
mod stack;

pub use evaluator::{EvalError, EvalOptions, evaluate, evaluate_with_options};
pub use host::{ERROR_VALUE, Host, Request, host_fn};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level.
    /// Call this at the start of tests where you want to see logging output.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
