//! Route handlers organized by resource

pub mod albums;
pub mod health;
