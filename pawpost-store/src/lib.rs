//! View-facing state for the pet network: paginated, optimistically updated
//! lists of posts and comments, plus thin stores for pets and search.

pub mod backend;
pub mod comments;
pub mod error;
pub mod feed;
pub mod likes;
pub mod list;
pub mod pets;
pub mod search;

use pawpost_common::model::page::DEFAULT_PAGE_SIZE;

/// Items requested per page for every paginated listing.
pub const PAGE_SIZE: u32 = DEFAULT_PAGE_SIZE;
