//! Domain aggregates exposed by the results service layer.

pub mod test_run;
pub mod types;
