pub mod failures;
pub mod logging;

pub use failures::{failure_from_panic, install_panic_hook, respond_to_failures};
pub use logging::logging_middleware;
