//! Database query functions.
//!
//! Organized by domain:
//! - `schema`: table and column existence checks
//! - `references`: full-table scans of file-reference columns

mod references;
mod schema;

pub use references::*;
pub use schema::*;
