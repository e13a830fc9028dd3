//! Read-only domain model delivered by the external data layer.
//!
//! # Responsibility
//! - Define canonical shapes for accounts, outcomes and tasks.
//! - Validate structural invariants at construction/deserialization time.
//!
//! # Invariants
//! - Core never mutates these records; derived views borrow from them.
//! - An outcome tracks its bottleneck as one optional task reference.

pub mod account;
pub mod geo;
pub mod outcome;
pub mod snapshot;

/// Milliseconds in one calendar day, used for all age computations.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days elapsed between `since_ms` and `now_ms`.
///
/// Clock skew (`since_ms` in the future) clamps to zero instead of going
/// negative.
pub fn elapsed_days(since_ms: i64, now_ms: i64) -> u32 {
    let delta = now_ms.saturating_sub(since_ms);
    if delta <= 0 {
        return 0;
    }
    u32::try_from(delta / MILLIS_PER_DAY).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{elapsed_days, MILLIS_PER_DAY};

    #[test]
    fn elapsed_days_floors_partial_days() {
        assert_eq!(elapsed_days(0, MILLIS_PER_DAY * 3 - 1), 2);
        assert_eq!(elapsed_days(0, MILLIS_PER_DAY * 3), 3);
    }

    #[test]
    fn elapsed_days_clamps_future_timestamps() {
        assert_eq!(elapsed_days(10 * MILLIS_PER_DAY, 0), 0);
    }
}
