//! Command-line definitions for both binaries

pub mod commands;
