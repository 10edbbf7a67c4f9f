//! Pure wizard types and rules: formatting, validation, flow definitions and
//! the session state machine. Nothing in here performs I/O.

pub mod document;
pub mod field;
pub mod flow;
pub mod format;
pub mod gateway;
pub mod money;
pub mod ports;
pub mod session;
