//! Route planning and navigation export.
//!
//! # Responsibility
//! - Sequence selected accounts into a visit order.
//! - Render that order for an external navigation app.
//!
//! # Invariants
//! - Routes are ephemeral and recomputed on demand; nothing is persisted.

pub mod builder;
pub mod export;
