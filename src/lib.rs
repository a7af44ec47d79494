//! charger-scout: find EV chargers near a location.
//!
//! Chargers live in a backing store as a geo set of locations plus one
//! attribute record per charger. A search is a read-only pipeline over that
//! store:
//!
//! ```text
//! radius query ──► attribute fetch ──► merge ──► filter ──► sort
//! ```
//!
//! [`seed`] is the only writer; [`api`] exposes the search over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod search;
pub mod seed;
pub mod store;

pub use error::{MalformedAttribute, SearchError, StoreError};
pub use models::{ChargerStatus, Coordinates, Query, ResultRecord, SortKey};
pub use search::ChargerSearch;
