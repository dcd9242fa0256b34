//! mediacheck database layer
//!
//! Read-only SQLite access for the media audit.
//!
//! # Architecture
//!
//! - **Read-only connections** - the audited database is never written to
//! - **Configured tables only** - callers name the tables and columns to scan,
//!   there is no schema reflection beyond existence checks
//! - **Lenient row decoding** - a value that cannot be read as text becomes
//!   [`StoredValue::Unreadable`] instead of failing the scan
//!
//! # Usage
//!
//! ```rust,ignore
//! use mediacheck_db::MediaDb;
//!
//! let db = MediaDb::open("path/to/db.sqlite3").await?;
//! let rows = mediacheck_db::queries::scan_references(
//!     db.pool(),
//!     "library_book",
//!     "id",
//!     &["cover".to_string()],
//! )
//! .await?;
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod queries;

pub use connection::MediaDb;
pub use error::{DbError, DbResult};
pub use models::{RecordId, ReferenceRow, StoredValue};
