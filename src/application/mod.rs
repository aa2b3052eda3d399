//! Application layer - services coordinating the domain with the ports.

mod monitor;

pub use monitor::SafetyMonitor;
