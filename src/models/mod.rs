//! TGit API model types.

mod branch;
mod commit;
mod file;
mod merge_request;
mod project;
mod repository;
mod tag;
mod user;

pub use branch::*;
pub use commit::*;
pub use file::*;
pub use merge_request::*;
pub use project::*;
pub use repository::*;
pub use tag::*;
pub use user::*;
