//! Shared test helpers for the pypr-client workspace.
//!
//! Add as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! pypr-test-utils = { path = "../pypr-test-utils" }
//! ```

pub mod daemon;
pub mod tracing_setup;

pub use daemon::{MockDaemon, Replier};
