//! Use cases - the decision flows.
//!
//! - [`host_group_flow`]: session creation and the host-side observer that
//!   drives status transitions, mutual-likes resolution and poll rounds.
//! - [`join_group_flow`]: the participant-side client (every client,
//!   including the host's own participant, runs this).
//! - [`run_solo_flow`]: the single-user deck + elimination bracket path.

pub mod host_group_flow;
pub mod join_group_flow;
pub mod run_solo_flow;
