//! Application behavior configuration

use serde::{Deserialize, Serialize};

/// Tunable behavior of the decision flows.
///
/// Loaded by the infrastructure config loader; defaults are safe for
/// interactive use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Maximum number of candidates fetched into a deck.
    pub deck_size: usize,
    /// Number of closed tie rounds after which the host falls back to a
    /// uniform random pick among the tied set instead of voting forever.
    pub max_tie_rounds: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            deck_size: 10,
            max_tie_rounds: 25,
        }
    }
}
