//! File naming, discovery and cleanup.

pub mod filename;
pub mod locate;
pub mod rotate;

pub use locate::{LocateError, NameFilter};
