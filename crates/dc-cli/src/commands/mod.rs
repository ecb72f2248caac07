//! CLI subcommand implementations.

pub mod category;
pub mod event;
pub mod export;
pub mod limit;
pub mod report;
pub mod status;
pub mod util;
