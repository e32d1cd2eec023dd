//! Application layer for tablepick
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.
//!
//! The group flow is coordinated through the [`ports::decision_store`] port:
//! an eventually-consistent, push-notifying replicated store. Every client
//! (host included) runs the same code against the same port; host-only
//! operations are gated on the `is_host` capability predicate, never on a
//! role subtype.

pub mod aggregator;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use aggregator::ParticipantAggregator;
pub use config::BehaviorConfig;
pub use ports::{
    decision_store::{DecisionStore, StoreError},
    judge::{
        FirstOption, JudgeError, LikeAll, MatchupJudge, Preferring, ScriptedSwipes, SwipeFeed,
        VoteChooser,
    },
    places::{PlacesError, PlacesGateway},
    progress::{FlowProgress, NoProgress},
};
pub use use_cases::host_group_flow::{GroupFlowError, HostGroupFlowUseCase};
pub use use_cases::join_group_flow::{JoinGroupFlowUseCase, JoinedSession};
pub use use_cases::run_solo_flow::{RunSoloFlowUseCase, SoloFlowError};
