//! CLI definitions

pub mod batch_file;
pub mod commands;
