//! Selection to artifacts, one indicator at a time.

pub mod reference;
pub mod run;
pub mod scratch;
