//! CLI command definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CLI arguments for tablepick
#[derive(Parser, Debug)]
#[command(name = "tablepick")]
#[command(version, about = "Converge on one restaurant: swipe, bracket, and group vote")]
#[command(long_about = r#"
Tablepick turns "where should we eat?" into a decision.

Solo: swipe through a deck of nearby places, then settle the liked ones in a
head-to-head elimination bracket.

Group: everyone swipes the same deck; the places everyone liked go to a vote,
with tie-break rounds until one winner remains.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./tablepick.toml    Project-level config
3. ~/.config/tablepick/config.toml   Global config

Example:
  tablepick solo --lat 35.66 --lng 139.70 --cuisine ramen
  tablepick group --participants 4
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decide on your own: swipe a deck, bracket what you liked
    Solo(SearchArgs),

    /// Run a group session; you swipe and vote, simulated guests fill the table
    Group {
        #[command(flatten)]
        search: SearchArgs,

        /// Total number of participants, you included
        #[arg(short, long, default_value_t = 3)]
        participants: usize,

        /// Simulate your seat too (non-interactive demo)
        #[arg(long)]
        simulate_host: bool,
    },
}

/// Where and what to search for. Without a location and an API key the
/// built-in sample deck is used.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Latitude of the search center
    #[arg(long, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude of the search center
    #[arg(long, requires = "lat")]
    pub lng: Option<f64>,

    /// Only places open right now
    #[arg(long)]
    pub open_now: bool,

    /// Cuisine keywords (can be specified multiple times)
    #[arg(long, value_name = "CUISINE")]
    pub cuisine: Vec<String>,
}
