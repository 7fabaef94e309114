//! Middleware for the StockLink backend

pub mod auth;

pub use auth::{auth_middleware, require_admin, AuthUser, CurrentUser};
