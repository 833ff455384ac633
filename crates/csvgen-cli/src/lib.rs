//! Library side of the `csvgen` command-line tool.

pub mod job;
pub mod logging;
