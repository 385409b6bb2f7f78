pub mod entities;
pub mod error;
pub mod posts;
pub mod slug;
pub mod types;
