//! Haven - Trauma-informed safety core
//!
//! This crate implements crisis detection, the safety-state machine, and
//! tiered trauma-informed interventions for the Haven emotional support
//! application. It has no wire protocol of its own; the UI layer calls
//! [`application::SafetyMonitor`] on relevant user input and renders the
//! resulting snapshots and interventions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
