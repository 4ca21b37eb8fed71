//! Command-line interface for training and pitting agents.

pub mod commands;
pub mod output;
