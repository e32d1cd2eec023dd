//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod decision_store;
pub mod judge;
pub mod places;
pub mod progress;
