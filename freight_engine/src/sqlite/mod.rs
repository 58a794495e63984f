//! SQLite backend for the freight marketplace.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
