//! Library components of the `tagscope` command-line tool.

pub mod logging;
pub mod selection;
