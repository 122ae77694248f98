//! The balance-transfer engine.
//!
//! Moves funds between two accounts with all-or-nothing effect, guards
//! against lost updates and negative balances, and degrades to a sequential
//! write path when the store cannot provide multi-record atomicity.

pub mod engine;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::TransferEngine;
pub use error::TransferError;
pub use memory::MemoryStore;
pub use store::{StoreError, TransferStore};
pub use types::{AccountSnapshot, AccountStatus, TransferCommit, TransferRecord};
