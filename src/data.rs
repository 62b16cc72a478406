//! Fetching and shaping indicator observations.

pub mod fetch;
pub mod table;
pub mod trend;
