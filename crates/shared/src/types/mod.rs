//! Shared domain types.

pub mod money;
pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
