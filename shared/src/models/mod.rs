//! Domain models for the StockLink inventory platform

mod location;
mod movement;
mod user;

pub use location::*;
pub use movement::*;
pub use user::*;

/// Error returned when a stored or submitted string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
