//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Calendar day-usage tracker.
///
/// Tracks which dates you have "used" (days in a country, days on site,
/// billable days) as categorized date-range events, and evaluates them
/// against limits with fixed, rolling, or custom windows.
#[derive(Debug, Parser)]
#[command(name = "daycap", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage date-range events in the active category.
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Manage limits in the active category.
    Limit {
        #[command(subcommand)]
        action: LimitAction,
    },

    /// Show per-limit used-day counts against their caps.
    Status {
        /// Evaluate as of this day instead of today (YYYY-MM-DD).
        #[arg(long)]
        as_of: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summarize used days by month.
    Report {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Dump the active category's events as JSON to stdout.
    Export,
}

/// Category management actions.
#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// Create a category and print its ID.
    Add {
        /// Display name.
        name: String,

        /// Display color as a hex string.
        #[arg(long, default_value = "#3377ff")]
        color: String,
    },

    /// List all categories.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a category and everything it owns.
    Rm {
        /// The category ID.
        id: String,
    },

    /// Switch the active category.
    Use {
        /// The category ID.
        id: String,
    },
}

/// Event management actions.
#[derive(Debug, Subcommand)]
pub enum EventAction {
    /// Record a used date range and print the event ID.
    Add {
        /// First used day (YYYY-MM-DD).
        #[arg(long)]
        from: String,

        /// Last used day, inclusive (YYYY-MM-DD). Defaults to --from.
        #[arg(long)]
        to: Option<String>,

        /// Free-form note.
        #[arg(long, default_value = "")]
        note: String,
    },

    /// List the active category's events.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete an event.
    Rm {
        /// The event ID.
        id: String,
    },
}

/// Limit management actions.
#[derive(Debug, Subcommand)]
pub enum LimitAction {
    /// Create a limit and print its ID.
    ///
    /// Exactly one of --yearly, --monthly, --running, or --from/--to selects
    /// the window kind.
    Add {
        /// Display name.
        name: String,

        /// Maximum used days allowed inside the window.
        #[arg(long)]
        max_days: u32,

        /// Cap per calendar year.
        #[arg(long, conflicts_with_all = ["monthly", "running", "from", "to"])]
        yearly: bool,

        /// Cap per calendar month.
        #[arg(long, conflicts_with_all = ["running", "from", "to"])]
        monthly: bool,

        /// Rolling lookback of N units ending at the as-of day.
        #[arg(long, value_name = "N", conflicts_with_all = ["from", "to"])]
        running: Option<u32>,

        /// Unit for --running: year, month, or day.
        #[arg(long, requires = "running")]
        unit: Option<String>,

        /// Custom window start (YYYY-MM-DD). Requires --to.
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Custom window stop, inclusive (YYYY-MM-DD).
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Pin this limit to the top of listings.
        #[arg(long)]
        favorite: bool,
    },

    /// List the active category's limits.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a limit.
    Rm {
        /// The limit ID.
        id: String,
    },
}
