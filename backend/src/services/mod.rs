//! Business logic services for the StockLink backend

pub mod auth;
pub mod locations;
pub mod movements;
pub mod products;
pub mod warehouses;

pub use auth::AuthService;
pub use locations::LocationService;
pub use movements::MovementService;
pub use products::ProductService;
pub use warehouses::WarehouseService;
