//! Day-usage tracker CLI library.
//!
//! This crate provides the CLI interface for the day-usage tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{CategoryAction, Cli, Commands, EventAction, LimitAction};
pub use config::Config;
