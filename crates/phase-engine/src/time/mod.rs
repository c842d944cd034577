//! Time subsystem.
//!
//! Small, testable timing policies that do not own a thread or a timer:
//! - [`Debouncer`]: trailing-edge coalescing of bursts (persistence writes)
//! - [`Throttle`]: minimum spacing between accepted triggers (exports)
//!
//! Every method takes an explicit `Instant` so callers drive them from their own
//! event loop and tests stay deterministic.

mod debounce;
mod throttle;

pub use debounce::Debouncer;
pub use throttle::Throttle;
