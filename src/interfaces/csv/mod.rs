//! CSV adapters for the command-line driver: scripted wizard actions in,
//! summary rows out.

pub mod action_reader;
pub mod summary_writer;
