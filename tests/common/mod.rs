//! Shared test utilities for charger-scout integration harnesses.
//!
//! Import everything via `mod common; use common::*;` at the top of each
//! harness file.

pub mod builders;
pub mod faulty_store;
pub mod fixtures;

pub use builders::*;
pub use faulty_store::*;
pub use fixtures::*;
