//! Static indicator catalog and the country directory.

pub mod countries;
pub mod indicators;
