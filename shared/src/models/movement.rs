//! Stock movements and the reconciliation rule applied to product quantities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::UnknownVariant;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MovementType {
    /// Goods received, increases stock
    #[serde(rename = "IN")]
    In,
    /// Goods issued, decreases stock
    #[serde(rename = "OUT")]
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(MovementType::In),
            "OUT" => Ok(MovementType::Out),
            other => Err(UnknownVariant {
                kind: "movement type",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MovementType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reasons a movement cannot be applied to a product's stock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("quantity must be a positive integer, got {0}")]
    NonPositiveQuantity(i32),

    #[error("current stock {current} is negative")]
    NegativeStock { current: i32 },

    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("receiving {requested} on top of {current} exceeds the maximum stock level")]
    Overflow { current: i32, requested: i32 },
}

/// Compute the stock level after applying a movement.
///
/// `current` is the product's quantity as read under the caller's lock and
/// `quantity` is the movement's magnitude. The result is never negative: an
/// `OUT` larger than the available stock is refused with
/// [`StockError::InsufficientStock`], reporting both figures.
pub fn reconcile(current: i32, movement_type: MovementType, quantity: i32) -> Result<i32, StockError> {
    if quantity <= 0 {
        return Err(StockError::NonPositiveQuantity(quantity));
    }
    if current < 0 {
        return Err(StockError::NegativeStock { current });
    }

    match movement_type {
        MovementType::In => current.checked_add(quantity).ok_or(StockError::Overflow {
            current,
            requested: quantity,
        }),
        MovementType::Out if quantity > current => Err(StockError::InsufficientStock {
            available: current,
            requested: quantity,
        }),
        MovementType::Out => Ok(current - quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Net effect of a ledger on a starting quantity, stopping at the first
    /// refused movement
    fn replay<'a, I>(opening: i32, movements: I) -> Result<i32, StockError>
    where
        I: IntoIterator<Item = &'a (MovementType, i32)>,
    {
        movements
            .into_iter()
            .try_fold(opening, |stock, (movement_type, quantity)| {
                reconcile(stock, *movement_type, *quantity)
            })
    }

    #[test]
    fn test_out_movement_reduces_stock() {
        // Widget W-1 holds 10, three are shipped
        assert_eq!(reconcile(10, MovementType::Out, 3), Ok(7));
    }

    #[test]
    fn test_out_movement_larger_than_stock_is_refused() {
        assert_eq!(
            reconcile(10, MovementType::Out, 50),
            Err(StockError::InsufficientStock {
                available: 10,
                requested: 50,
            })
        );
    }

    #[test]
    fn test_out_movement_can_empty_stock() {
        assert_eq!(reconcile(4, MovementType::Out, 4), Ok(0));
    }

    #[test]
    fn test_in_movement_adds_stock() {
        assert_eq!(reconcile(0, MovementType::In, 12), Ok(12));
    }

    #[test]
    fn test_zero_and_negative_quantities_are_rejected() {
        assert_eq!(
            reconcile(10, MovementType::In, 0),
            Err(StockError::NonPositiveQuantity(0))
        );
        assert_eq!(
            reconcile(10, MovementType::Out, -2),
            Err(StockError::NonPositiveQuantity(-2))
        );
    }

    #[test]
    fn test_in_movement_overflow_is_rejected() {
        assert_eq!(
            reconcile(i32::MAX - 1, MovementType::In, 5),
            Err(StockError::Overflow {
                current: i32::MAX - 1,
                requested: 5,
            })
        );
    }

    #[test]
    fn test_movement_type_wire_format() {
        assert_eq!(serde_json::to_string(&MovementType::In).unwrap(), "\"IN\"");
        assert_eq!(
            serde_json::from_str::<MovementType>("\"OUT\"").unwrap(),
            MovementType::Out
        );
        assert!(serde_json::from_str::<MovementType>("\"out\"").is_err());
        assert!("SIDEWAYS".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_replay_stops_at_first_refused_movement() {
        let ledger = [
            (MovementType::In, 5),
            (MovementType::Out, 8),
            (MovementType::In, 100),
        ];
        assert_eq!(
            replay(2, ledger.iter()),
            Err(StockError::InsufficientStock {
                available: 7,
                requested: 8,
            })
        );
    }

    fn movement() -> impl Strategy<Value = (MovementType, i32)> {
        (
            prop_oneof![Just(MovementType::In), Just(MovementType::Out)],
            1..1_000i32,
        )
    }

    proptest! {
        #[test]
        fn prop_in_adds_exactly(current in 0..1_000_000i32, quantity in 1..1_000_000i32) {
            prop_assert_eq!(reconcile(current, MovementType::In, quantity), Ok(current + quantity));
        }

        #[test]
        fn prop_out_within_stock_never_negative(current in 0..1_000_000i32, quantity in 1..1_000_000i32) {
            prop_assume!(quantity <= current);
            let next = reconcile(current, MovementType::Out, quantity).unwrap();
            prop_assert_eq!(next, current - quantity);
            prop_assert!(next >= 0);
        }

        #[test]
        fn prop_out_beyond_stock_reports_both_figures(current in 0..1_000i32, extra in 1..1_000i32) {
            let requested = current + extra;
            prop_assert_eq!(
                reconcile(current, MovementType::Out, requested),
                Err(StockError::InsufficientStock { available: current, requested })
            );
        }

        #[test]
        fn prop_accepted_ledger_matches_net_quantity(
            opening in 0..10_000i32,
            ledger in proptest::collection::vec(movement(), 0..40),
        ) {
            // Keep only the movements the engine accepts, as the service would
            let mut stock = opening;
            let mut accepted = Vec::new();
            for entry in &ledger {
                if let Ok(next) = reconcile(stock, entry.0, entry.1) {
                    stock = next;
                    accepted.push(*entry);
                }
            }

            let net: i64 = accepted
                .iter()
                .map(|(t, q)| match t {
                    MovementType::In => i64::from(*q),
                    MovementType::Out => -i64::from(*q),
                })
                .sum();

            prop_assert!(stock >= 0);
            prop_assert_eq!(i64::from(stock), i64::from(opening) + net);
            prop_assert_eq!(replay(opening, accepted.iter()), Ok(stock));
        }
    }
}
