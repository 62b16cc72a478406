//! Country boundaries and map projection.

pub mod boundaries;
pub mod projection;
