//! Library side of the `pcell` command: argument syntaxes and logging setup.

pub mod args;
pub mod logging;
