//! Territory sections: assignment, filtering and search.
//!
//! # Responsibility
//! - Map accounts to the fixed section grid.
//! - Produce section-filtered and grouped account views.
//!
//! # Invariants
//! - Unknown or ambiguous cities degrade to "unassigned", never to an error.

pub mod partition;
pub mod search;
pub mod section;
