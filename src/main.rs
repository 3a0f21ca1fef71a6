use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use pacetrack::config::RunConfig;
use pacetrack::display::{format_clock, format_mmss};
use pacetrack::logging;
use pacetrack::pace;

/// pacetrack - VMA pace tables and session planning
///
/// Companion CLI to the live pace-tracking engine: prints the per-marker
/// pace table, target lap splits, and the planned distance for a session
/// configured by VMA, %VMA, track geometry and duration.
#[derive(Parser)]
#[command(name = "pacetrack")]
#[command(version = "0.1.0")]
#[command(about = "VMA pace tables and session planning", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Per-invocation overrides of the loaded configuration
#[derive(Args)]
struct SessionArgs {
    /// Runner's VMA in km/h
    #[arg(long)]
    vma: Option<f64>,

    /// Percentage of VMA for the session
    #[arg(long)]
    percent: Option<f64>,

    /// Track length in meters
    #[arg(long)]
    track: Option<f64>,

    /// Distance between markers in meters
    #[arg(long)]
    marker: Option<f64>,

    /// Run duration in minutes
    #[arg(long)]
    duration: Option<f64>,

    /// Observe passages per half-lap instead of per lap
    #[arg(long)]
    half_lap: bool,
}

impl SessionArgs {
    fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(vma) = self.vma {
            config.vma_kmh = vma;
        }
        if let Some(percent) = self.percent {
            config.vma_percent = percent;
        }
        if let Some(track) = self.track {
            config.track_length_m = track;
        }
        if let Some(marker) = self.marker {
            config.marker_distance_m = marker;
        }
        if let Some(duration) = self.duration {
            config.duration_minutes = duration;
        }
        if self.half_lap {
            config.observe_half_lap = true;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the per-marker pace table for the session
    PaceTable {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Print cumulative target lap splits
    Splits {
        /// Number of laps to print
        #[arg(short, long, default_value = "20")]
        laps: u32,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show the planned distance, laps and markers for the session
    Plan {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Configure application settings
    Config {
        /// Write a default config file to the default location
        #[arg(long)]
        init: bool,

        /// Show the active configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Tabled)]
struct MarkerRow {
    #[tabled(rename = "Marker")]
    marker: u32,
    #[tabled(rename = "Distance (m)")]
    distance: String,
    #[tabled(rename = "Time")]
    time: String,
}

#[derive(Tabled)]
struct SplitRow {
    #[tabled(rename = "Lap")]
    lap: u32,
    #[tabled(rename = "Lap time")]
    lap_time: String,
    #[tabled(rename = "Cumulative")]
    cumulative: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => RunConfig::load_from_file(path)?,
        None => RunConfig::load_or_default(),
    };

    match cli.command {
        Commands::PaceTable { session } => {
            let config = session.apply(config);
            config.validate()?;
            print_pace_table(&config);
        }

        Commands::Splits { laps, session } => {
            let config = session.apply(config);
            config.validate()?;
            print_splits(&config, laps);
        }

        Commands::Plan { session } => {
            let config = session.apply(config);
            config.validate()?;
            print_plan(&config);
        }

        Commands::Config { init, show } => {
            let path = RunConfig::default_config_path();
            if init {
                RunConfig::default().save_to_file(&path)?;
                println!("{} {}", "✓ Wrote default config to".green(), path.display());
            }
            if show || !init {
                println!("{}", "Active configuration:".bold());
                println!("{}", toml::to_string_pretty(&config)?);
                println!("{} {}", "Config path:".dimmed(), path.display());
            }
        }
    }

    Ok(())
}

fn print_session_header(config: &RunConfig) {
    let target = config.target_speed_kmh();
    println!(
        "{} {:.1} km/h at {:.0}% => {} {:.1} km/h",
        "VMA".bold(),
        config.vma_kmh,
        config.vma_percent,
        "target".bold(),
        target
    );
    println!(
        "Track {:.0} m, markers every {:.0} m, observed per {}",
        config.track_length_m,
        config.marker_distance_m,
        if config.observe_half_lap { "half-lap" } else { "lap" }
    );
    println!(
        "{} {} per {}",
        "Target split:".bold(),
        format_clock(config.target_segment_seconds()).green(),
        if config.observe_half_lap { "half-lap" } else { "lap" }
    );
}

fn print_pace_table(config: &RunConfig) {
    print_session_header(config);
    println!();

    let rows: Vec<MarkerRow> = pace::pace_table(
        config.track_length_m,
        config.marker_distance_m,
        config.target_segment_seconds(),
        config.observe_half_lap,
    )
    .into_iter()
    .map(|row| MarkerRow {
        marker: row.marker,
        distance: format!("{:.0}", row.distance_m),
        time: format_mmss(row.time_s),
    })
    .collect();

    if rows.is_empty() {
        println!("{}", "No pace table for this geometry".yellow());
        return;
    }
    println!("{}", Table::new(rows));
}

fn print_splits(config: &RunConfig, laps: u32) {
    print_session_header(config);
    println!();

    let rows: Vec<SplitRow> = pace::lap_time_table(config.target_segment_seconds(), laps)
        .into_iter()
        .map(|split| SplitRow {
            lap: split.lap,
            lap_time: format_mmss(split.lap_time_s),
            cumulative: format_mmss(split.cumulative_time_s),
        })
        .collect();
    println!("{}", Table::new(rows));
}

fn print_plan(config: &RunConfig) {
    print_session_header(config);
    println!();

    let distance = config.planned_distance_m();
    let (laps, markers) = config.planned_laps_and_markers();
    println!(
        "{} {:.0} m over {:.1} min",
        "Planned distance:".bold(),
        distance,
        config.duration_minutes
    );
    println!(
        "{} {} laps + {} markers",
        "That is:".bold(),
        laps.to_string().green(),
        markers.to_string().green()
    );
    println!(
        "{} {:.0} m",
        "Check:".dimmed(),
        pace::distance_from_laps_and_markers(
            laps,
            markers,
            config.track_length_m,
            config.marker_distance_m
        )
    );
}
