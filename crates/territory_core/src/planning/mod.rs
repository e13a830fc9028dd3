//! Constraint identification and urgency prioritization.
//!
//! # Responsibility
//! - Resolve each outcome's single live bottleneck.
//! - Rank and group blocked outcomes for the hit list and waiting room.
//!
//! # Invariants
//! - All operations are pure functions of their input and `now_ms`.

pub mod constraint;
pub mod dashboard;
pub mod ranking;
