//! Services layer (ports + adapters).
//!
//! - `ports`: contracts/types the stores depend on.
//! - `adapters`: storage implementations (in-memory for tests, JSON files on disk).

pub mod adapters;
pub mod ports;
