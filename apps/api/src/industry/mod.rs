// Industry Lookup & Recommendation Engine.
// Loader → matcher → classifier → risk/recommendations → narrative.
// Everything below `handlers` is synchronous and side-effect free apart from
// reading the cached reference table.

pub mod browser;
pub mod combination;
pub mod handlers;
pub mod loader;
pub mod matcher;
pub mod models;
pub mod narrative;
pub mod risk;
pub mod theory;

pub use loader::{DataError, TableCache};
