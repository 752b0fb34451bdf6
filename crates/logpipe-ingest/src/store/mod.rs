//! SQLite persistence for parsed log records
//!
//! Each worker opens its own [`StoreHandle`] against the shared database
//! file; connections are never shared across threads. SQLite's file locking
//! serialises the writers.

pub mod handle;
pub mod rows;
pub mod schema;

pub use handle::StoreHandle;
pub use rows::{count_rows, fetch_rows, query_rows};
pub use schema::init_schema;
