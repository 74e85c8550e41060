#![forbid(unsafe_code)]

//! Test harness for sigform inputs.
//!
//! - [`FieldDriver`] mounts a controller and plays a script of keystrokes,
//!   refreshes, commits and enable toggles against it, recording a
//!   [`Frame`] after every step.
//! - [`strategies`] holds `proptest` generators for input text.
//! - [`init_test_logging`] routes `tracing` output to the test writer.

pub mod driver;
pub mod strategies;

pub use driver::{FieldDriver, Frame, Step};

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Install a fmt subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
