//! Ports - interfaces between the safety core and its collaborators.
//!
//! The core has no wire protocol of its own; it is invoked as a library
//! and talks to the outside world only through these seams.

mod event_publisher;
mod intervention_log;

pub use event_publisher::{EventHandler, EventPublisher};
pub use intervention_log::InterventionLog;
