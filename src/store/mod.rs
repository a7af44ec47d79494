pub mod memory;
pub mod traits;
pub mod types;

pub use memory::MemoryStore;
pub use traits::{AttributeStore, GeoIndex};
pub use types::{GeoHit, RawAttributes};
