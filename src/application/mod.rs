//! Application services layer.

pub mod blog;
pub mod chrome;
pub mod error;
pub mod pagination;
pub mod render;
pub mod repos;
pub mod syndication;
