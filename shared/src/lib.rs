//! Shared domain types and rules for the StockLink inventory platform
//!
//! Everything in this crate is free of I/O: the backend persists and serves
//! these types, while the rules that keep stock and storage layouts consistent
//! live here where they can be tested in isolation.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
