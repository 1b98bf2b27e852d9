//! Database and configuration models shared across the results service.

pub mod config;
pub mod test_run;
