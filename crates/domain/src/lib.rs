//! product-classifier domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Prompt construction, classification, batch and pipeline
//! - `policy`: How model answers are checked against the category list

pub mod model;
pub mod policy;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use policy::MembershipPolicy;
pub use ports::*;
