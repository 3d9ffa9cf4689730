//! CBRates Common Types
//!
//! Shared types used across the CBRates workspace: bank identifiers, the
//! canonical rate and rate-table shapes, and bank-local date handling.

pub mod identifiers;
pub mod monetary;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use time::*;
