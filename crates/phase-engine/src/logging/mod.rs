//! Logging utilities.
//!
//! This module centralizes logger initialization. Library code logs through the
//! standard `log` facade only; binaries call [`init_logging`] once at startup.

mod init;

pub use init::{init_logging, LoggingConfig};
