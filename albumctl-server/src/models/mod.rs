//! Domain models
//!
//! Input is checked with `AlbumInput::validate` before it reaches the
//! repository. Invalid input returns ValidationError, not panic.

pub mod album;
pub mod validation;

pub use album::{Album, AlbumInput, BatchFailure, BatchReport, MAX_TEXT_LEN};
pub use validation::ValidationError;
