//! End-to-end tests for the mute library and binary

pub mod cli;
pub mod config_file;
pub mod helpers;
