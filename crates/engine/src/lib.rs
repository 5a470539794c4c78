//! Cartwheel Engine - Shopping rules engine.
//!
//! Behavior is expressed as interchangeable strategies bound into contexts,
//! with in-process notification channels fanning out catalog and discount
//! changes. Persistence sits behind the [`store::Gateway`] trait.
//!
//! # Modules
//!
//! - [`store`] - Storage gateway contract and the in-memory adapter
//! - [`strategy`] - Cart, product, payment, shipping and sort strategies
//! - [`context`] - Runtime-swappable holders for one strategy each
//! - [`notify`] - Discount and catalog broadcast channels
//! - [`view`] - Cart line / product join
//! - [`session`] - Admin flag and theme preference
//! - [`checkout`] - Order pricing
//! - [`shop`] - Facade wiring all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod context;
pub mod error;
pub mod image;
pub mod notify;
pub mod session;
pub mod shop;
pub mod store;
pub mod strategy;
pub mod view;

pub use config::{ConfigError, EngineConfig};
pub use error::{OperationError, Result};
pub use shop::Shop;
