//! Provides input functionality for molecular coordinate records.
//!
//! The reader is deliberately permissive: blank and short lines are skipped, atoms with
//! unreadable coordinates are quarantined and reported per line, and only a failure to
//! read the underlying source is surfaced as an error.

pub mod traits;
pub mod xyz;
