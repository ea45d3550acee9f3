//! Foundation types for deepcmp.
//!
//! This crate provides the dynamically-shaped [`Value`] that the comparator
//! walks, along with the collaborators it leans on for reporting: text
//! rendering and coercing ("loose") equality. Every other deepcmp crate
//! depends on `deepcmp-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Closed tagged variant: null, boolean, number, text, list, record
//! - [`Kind`] -- The type tag of a [`Value`]
//! - [`Identity`] -- Allocation identity of a shared list or record
//! - [`render`] -- Text form used inside human-readable messages
//! - [`loose_eq`] -- Coercing equality used when strict comparison is off

pub mod error;
pub mod json;
pub mod loose;
pub mod render;
pub mod value;

pub use error::TypeError;
pub use loose::{loose_eq, text_to_number};
pub use render::{format_number, render};
pub use value::{Identity, Kind, List, Record, Value};
