//! Trait definitions for TGit operations.
//!
//! Each entity type implements the traits it supports; operations that do
//! not fit a trait are free functions next to the model.

mod get;
mod list;

pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
