//! Repository abstractions for data access.

pub mod account;
pub mod transfer;

pub use account::AccountRepository;
pub use transfer::{TransferDirection, TransferRepository};
