//! Infrastructure layer for tablepick
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the in-process replicated store, the HTTP places
//! lookup, configuration file loading, and session-code generation.

pub mod code;
pub mod config;
pub mod places;
pub mod store;

// Re-export commonly used types
pub use code::generate_session_code;
pub use config::{
    ConfigLoader, FileBehaviorConfig, FileConfig, FileFiltersConfig, FilePlacesConfig,
    FileProfileConfig,
};
pub use places::HttpPlacesGateway;
pub use store::MemoryDecisionStore;
