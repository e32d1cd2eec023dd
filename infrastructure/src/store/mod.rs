//! Decision store adapters

pub mod memory;

pub use memory::MemoryDecisionStore;
