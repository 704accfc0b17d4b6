//! Logging utilities.
//!
//! The engine itself only talks to the `log` facade. Hosts that want output
//! without picking a backend can call [`init_logging`] once at startup.

mod init;

pub use init::{init_logging, LoggingConfig};
