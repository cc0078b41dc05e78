//! # DataStore Module
//!
//! This module provides functionality for interacting with a SQLite database
//! holding ingested content items and the executive reports synthesized from
//! them.
//!
//! The module uses sqlx for database operations and provides an abstraction
//! layer for the storage operations the pipeline stages depend on. The schema
//! is evolved through an ordered migration log applied once at startup.

mod datastore;
mod domain;

pub use datastore::sqlite::SqliteDataStore;
pub use datastore::DataStore;
pub use domain::{Item, NewItem, NewReport, Report};
