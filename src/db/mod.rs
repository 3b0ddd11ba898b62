//! Database module for the persistent context store.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - The `ContextStore` key/value abstraction and its implementations

pub mod migrations;
pub mod store;

pub use migrations::init_db;
pub use store::{
    clear_tournament_context, load_tournament_context, save_tournament_context, ContextStore,
    ContextWrite, MemoryContextStore, SqliteContextStore, StoreError,
};
