//! Repository implementations for database access
//!
//! - `albums`: the `AlbumRepository` trait and its PostgreSQL implementation
//! - `memory`: an in-process implementation with the same constraints

pub mod albums;
pub mod memory;

pub use albums::{bounded, check_row, AlbumRepository, DbError, PgAlbumRepo};
pub use memory::MemoryAlbumRepo;
