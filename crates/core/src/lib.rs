//! Cartwheel Core - Shared types library.
//!
//! This crate provides the records and identifiers used across all Cartwheel
//! components:
//! - `engine` - Strategies, contexts, notification channels and the shop facade
//! - `cli` - Command-line demo driver
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! callbacks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, products, cart lines, image payloads and themes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
