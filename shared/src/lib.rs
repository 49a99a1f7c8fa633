//! Shared types and models for Brew Lens
//!
//! This crate contains the coffee classification engine and the types shared
//! between the backend, the browser client (via WASM), and other components.

pub mod engine;
pub mod models;
pub mod types;
pub mod validation;

pub use engine::*;
pub use models::*;
pub use types::*;
pub use validation::*;
