//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{ReturnRouteStyle, StopsFrequency};

/// Roadtrip - plan a road trip with an LLM
#[derive(Parser, Debug)]
#[command(
    name = "rt",
    author,
    version,
    about = "Plan road trips: collect destinations, generate an itinerary, view it as a timeline or map"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a destination
    Add {
        /// Place to visit
        name: String,

        /// Days to stay there
        #[arg(short, long, default_value_t = 1)]
        days: u32,
    },

    /// Remove a destination by its position in `list`
    Remove {
        /// 1-based position
        position: usize,
    },

    /// List destinations
    List,

    /// Show or edit travel preferences
    Prefs(PrefsArgs),

    /// Generate an itinerary from the current destinations and preferences
    Generate,

    /// Show the last itinerary as a timeline
    Show,

    /// Export the last itinerary as GeoJSON map layers
    Map {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the request that `generate` would send
    Prompt,

    /// Clear destinations, preferences and the last itinerary
    Reset,
}

/// Preference edits; with no flags the current preferences are shown
#[derive(Debug, Default, clap::Args)]
pub struct PrefsArgs {
    /// City the trip starts from
    #[arg(long)]
    pub start_city: Option<String>,

    /// Daily driving ceiling in hours (2-12)
    #[arg(long)]
    pub max_hours: Option<f64>,

    /// Return to the starting city
    #[arg(long)]
    pub round_trip: Option<bool>,

    /// How a round trip gets back: loop or retrace
    #[arg(long)]
    pub return_style: Option<ReturnRouteStyle>,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Break frequency: low, medium or high
    #[arg(long)]
    pub stops: Option<StopsFrequency>,

    /// Kind of stops to favour, e.g. "Diners"
    #[arg(long)]
    pub amenity: Option<String>,
}

impl PrefsArgs {
    pub fn is_empty(&self) -> bool {
        self.start_city.is_none()
            && self.max_hours.is_none()
            && self.round_trip.is_none()
            && self.return_style.is_none()
            && self.start_date.is_none()
            && self.stops.is_none()
            && self.amenity.is_none()
    }
}

/// Path of the log file for a given log directory
pub fn get_log_path(log_dir: &std::path::Path) -> PathBuf {
    log_dir.join("roadtrip.log")
}
