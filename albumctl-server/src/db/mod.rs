//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - The pool is created once and passed down explicitly; no global handle
//! - Every statement runs under a time limit
//! - Rows are checked before SQL runs; table constraints are the backstop
//! - Batch inserts isolate each row in a savepoint

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{close_pool, create_pool, create_pool_with_options, open};
pub use repos::*;
