//! Payload definitions accepted by the results endpoints.

pub mod submission;
