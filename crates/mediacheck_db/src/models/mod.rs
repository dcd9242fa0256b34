//! Database models.
//!
//! Row shapes produced by the reference scanner.

mod reference;

pub use reference::{RecordId, ReferenceRow, StoredValue};
