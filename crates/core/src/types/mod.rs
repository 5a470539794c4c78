//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers and records for the catalog,
//! the cart, and session preferences.

pub mod cart;
pub mod id;
pub mod image;
pub mod product;
pub mod theme;

pub use cart::{CartLine, CartLineDraft, CartLineView};
pub use id::*;
pub use image::ImageData;
pub use product::Product;
pub use theme::Theme;
