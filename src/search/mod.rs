//! Proximity search pipeline.
//!
//! ```text
//! GeoIndexAdapter ──► AttributeAdapter ──► assemble::merge ──► filter::apply
//!   (radius query)     (concurrent fetch)    (typed records)    (predicates + sort)
//! ```
//!
//! [`ChargerSearch`] composes the stages into one read-only request.

pub mod assemble;
pub mod attributes;
pub mod filter;
pub mod index;
pub mod service;

pub use attributes::AttributeAdapter;
pub use index::GeoIndexAdapter;
pub use service::ChargerSearch;
