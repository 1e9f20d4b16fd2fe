use crate::app::FormKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const DEFAULT_STORE_DIR: &str = ".maptrack";

#[derive(Parser, Debug)]
#[command(
    name = "maptrack",
    about = "Log workouts at map locations and keep the history on disk"
)]
pub struct Cli {
    /// Directory holding the persisted workout blob.
    ///
    /// Default: .maptrack
    #[arg(long, value_name = "DIR", default_value = DEFAULT_STORE_DIR, global = true)]
    pub store: PathBuf,

    /// Print at most this many workouts in list mode.
    #[arg(long, default_value_t = 50)]
    pub count: usize,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Record a workout at a map location
    Add {
        /// Latitude of the spot picked on the map
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the spot picked on the map
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Workout kind
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Distance in kilometres
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,

        /// Duration in minutes
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,

        /// Running cadence in steps per minute
        #[arg(long, allow_negative_numbers = true)]
        cadence: Option<f64>,

        /// Cycling elevation gain in metres
        #[arg(long, allow_negative_numbers = true)]
        elevation: Option<f64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    Running,
    Cycling,
}

impl From<KindArg> for FormKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Running => Self::Running,
            KindArg::Cycling => Self::Cycling,
        }
    }
}
