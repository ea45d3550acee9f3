//! Structural comparator for deepcmp.
//!
//! Walks two [`Value`]s depth-first and records every point where they stop
//! being structurally identical, with its location, the two sub-values and a
//! human-readable explanation. Self-referential values are handled by pairing
//! containers by identity on first visit.
//!
//! # Key Types
//!
//! - [`Comparator`] / [`compare`] -- Entry points
//! - [`CompareOptions`] / [`PathFormat`] -- Per-call settings
//! - [`ComparisonResult`] / [`Difference`] / [`DifferenceKind`] -- Output
//! - [`Path`] / [`Segment`] -- Locations inside a value
//!
//! [`Value`]: deepcmp_types::Value

pub mod comparator;
pub mod error;
pub mod options;
pub mod path;
pub mod result;
mod visited;

pub use comparator::{compare, Comparator};
pub use error::{ConfigError, ConfigResult};
pub use options::{CompareOptions, PathFormat};
pub use path::{Path, Segment};
pub use result::{ComparisonResult, Difference, DifferenceKind, Operand};
