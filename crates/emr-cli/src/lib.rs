//! Library components of the EMR validation CLI.

pub mod logging;
pub mod pipeline;
