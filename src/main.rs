use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use goldenpace::config::AppConfig;
use goldenpace::consistency::{ReasonablenessKind, Severity};
use goldenpace::engine::{Calculation, PaceEngine, ProfileReport};
use goldenpace::logging::{init_logging, LogFormat};
use goldenpace::models::{CanonicalDistance, FitnessIndex, RaceResult};
use goldenpace::pr_profile::PrProfileBuilder;
use goldenpace::progression::Progression;
use goldenpace::time_codec::RaceTime;
use goldenpace::zones::Zone;

/// GoldenPace - Race Fitness and Training Pace CLI
///
/// Turns race results into a fitness index, training paces, race
/// predictions and personal record profiles.
#[derive(Parser)]
#[command(name = "goldenpace")]
#[command(author = "GoldenPace Contributors")]
#[command(version)]
#[command(about = "Race fitness and training pace calculator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fitness index, training paces and predictions from one race
    Index {
        /// Race time (MM:SS or HH:MM:SS)
        #[arg(short, long)]
        time: String,

        /// Race distance (e.g. 5K, 10K, Half Marathon)
        #[arg(short, long)]
        distance: Option<String>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Personal record profile, goal zone paces and consistency checks
    Profile {
        /// Personal record as DISTANCE=TIME, repeatable
        #[arg(short, long = "pr", value_name = "DISTANCE=TIME", required = true)]
        prs: Vec<String>,

        /// Goal race distance
        #[arg(short, long)]
        goal: Option<String>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Projected fitness index over a training block
    Progress {
        /// Starting fitness index
        #[arg(short, long, conflicts_with = "time")]
        index: Option<Decimal>,

        /// Race time to derive the starting index from
        #[arg(short, long)]
        time: Option<String>,

        /// Distance of --time
        #[arg(short, long, requires = "time")]
        distance: Option<String>,

        /// Start date (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        start: Option<NaiveDate>,

        /// Weekly mileage
        #[arg(short, long)]
        mileage: Option<f64>,

        /// Weeks to project
        #[arg(short, long)]
        weeks: Option<u32>,

        /// Weeks between points
        #[arg(long)]
        step: Option<u32>,
    },

    /// Show or create the configuration file
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct PaceRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Per mile")]
    per_mile: String,
    #[tabled(rename = "Per 400m")]
    per_lap: String,
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Pace")]
    pace: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Tabled)]
struct GoalPaceRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "From")]
    from: String,
}

#[derive(Tabled)]
struct ProgressRow {
    #[tabled(rename = "Week")]
    week: u32,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Index")]
    index: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone().with_verbosity(cli.verbose);
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(&log_config).context("Failed to initialize logging")?;

    let thresholds = config
        .consistency
        .thresholds()
        .context("Invalid consistency thresholds")?;
    let engine = PaceEngine::published().with_thresholds(thresholds);

    match cli.command {
        Commands::Index {
            time,
            distance,
            json,
        } => {
            let distance = resolve_distance(distance.as_deref(), config.calculator.default_distance)?;
            let result = RaceResult::new(distance, parse_time(&time)?)?;
            let calculation = engine.calculate(&result);

            if json {
                println!("{}", serde_json::to_string_pretty(&calculation)?);
            } else {
                print_calculation(&calculation);
            }
        }

        Commands::Profile { prs, goal, json } => {
            let goal = resolve_distance(goal.as_deref(), config.calculator.default_goal)?;
            let pairs = prs
                .iter()
                .map(|pr| {
                    pr.split_once('=')
                        .ok_or_else(|| anyhow!("Expected DISTANCE=TIME, got '{}'", pr))
                })
                .collect::<Result<Vec<_>>>()?;
            let actuals = PrProfileBuilder::parse_inputs(pairs)?;
            if actuals.is_empty() {
                bail!("No personal records given");
            }
            let report = engine.analyze_profile(&actuals, goal);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_profile(&report);
            }
        }

        Commands::Progress {
            index,
            time,
            distance,
            start,
            mileage,
            weeks,
            step,
        } => {
            let start_index = match (index, time) {
                (Some(index), _) => FitnessIndex::new(index)?,
                (None, Some(time)) => {
                    let distance =
                        resolve_distance(distance.as_deref(), config.calculator.default_distance)?;
                    let result = RaceResult::new(distance, parse_time(&time)?)?;
                    engine.resolver().from_result(&result)
                }
                (None, None) => bail!("Give a starting --index or a race --time"),
            };

            let defaults = &config.progression;
            let progression = engine.project_progression(
                start_index,
                start.unwrap_or_else(|| Local::now().date_naive()),
                mileage.unwrap_or(defaults.weekly_mileage),
                weeks.unwrap_or(defaults.horizon_weeks),
                step.unwrap_or(defaults.step_weeks),
            )?;
            print_progression(&progression);
        }

        Commands::Config { show, init } => {
            if init {
                let path = match &cli.config {
                    Some(path) => {
                        config.save_to_file(path)?;
                        path.clone()
                    }
                    None => config.save_default()?,
                };
                println!("{} {}", "✓ Configuration written to".green(), path.display());
            }
            if show || !init {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn resolve_distance(label: Option<&str>, default: CanonicalDistance) -> Result<CanonicalDistance> {
    match label {
        Some(label) => Ok(label.parse()?),
        None => Ok(default),
    }
}

fn parse_time(text: &str) -> Result<RaceTime> {
    text.parse::<RaceTime>()
        .with_context(|| format!("Invalid race time '{}'", text))
}

fn print_calculation(calculation: &Calculation) {
    let result = &calculation.result;
    println!(
        "{} {} {}",
        "Fitness index".cyan().bold(),
        calculation.index.to_string().bold(),
        format!("({} in {})", result.distance, result.time).dimmed()
    );
    if let Some(warning) = &calculation.plausibility {
        println!("{} {}", "⚠".yellow(), warning.to_string().yellow());
    }

    let paces: Vec<PaceRow> = calculation
        .paces
        .iter()
        .map(|(zone, pace)| PaceRow {
            zone: zone.to_string(),
            per_mile: pace.to_string(),
            per_lap: if zone.is_track_zone() || zone == Zone::Threshold {
                pace.per_400m().to_string()
            } else {
                "-".to_string()
            },
        })
        .collect();
    println!("\n{}", "Training paces".green().bold());
    println!("{}", Table::new(paces).with(Style::rounded()));

    let predictions: Vec<PredictionRow> = calculation
        .predictions
        .iter()
        .map(|(distance, time)| PredictionRow {
            distance: distance.to_string(),
            time: time.to_string(),
            pace: format!("{}/mi", RaceResult { distance: *distance, time: *time }.pace()),
        })
        .collect();
    println!("\n{}", "Race predictions".green().bold());
    println!("{}", Table::new(predictions).with(Style::rounded()));
}

fn print_profile(report: &ProfileReport) {
    let rows: Vec<ProfileRow> = report
        .profile
        .entries()
        .map(|entry| ProfileRow {
            distance: entry.distance.to_string(),
            time: entry.time.to_string(),
            source: match entry.based_on {
                Some(anchor) => format!("projected from {}", anchor),
                None => "actual".to_string(),
            },
        })
        .collect();
    println!("{}", "Personal records".cyan().bold());
    println!("{}", Table::new(rows).with(Style::rounded()));

    let paces: Vec<GoalPaceRow> = report
        .zone_paces
        .iter()
        .map(|(zone, zone_pace)| GoalPaceRow {
            zone: zone.to_string(),
            pace: format!("{}/mi", zone_pace.pace),
            from: if zone_pace.projected {
                format!("{} (projected)", zone_pace.source_distance)
            } else {
                zone_pace.source_distance.to_string()
            },
        })
        .collect();
    println!("\n{} {}", "Zone paces for".green().bold(), report.goal.to_string().bold());
    println!("{}", Table::new(paces).with(Style::rounded()));

    if report.issues.is_empty() && report.reasonableness.is_empty() {
        println!("\n{}", "✓ Personal records are consistent".green());
        return;
    }

    println!("\n{}", "Consistency".yellow().bold());
    for issue in &report.issues {
        let line = format!(
            "{} {} is {:.1}% {} than the {} your other records predict",
            issue.distance,
            issue.actual_time,
            issue.variance_percent(),
            issue.direction,
            issue.projected_time
        );
        match issue.severity {
            Severity::High => println!("  {}", line.red()),
            Severity::Medium => println!("  {}", line.yellow()),
        }
    }
    for issue in &report.reasonableness {
        let bound = match issue.kind {
            ReasonablenessKind::VeryFast => "faster than the fastest",
            ReasonablenessKind::VerySlow => "slower than the slowest",
        };
        println!(
            "  {}",
            format!(
                "{} {} is {} chart time ({})",
                issue.distance, issue.time, bound, issue.boundary_time
            )
            .yellow()
        );
    }
}

fn print_progression(progression: &Progression) {
    let rows: Vec<ProgressRow> = progression
        .iter()
        .map(|point| ProgressRow {
            week: point.week_offset,
            date: point.date.format("%Y-%m-%d").to_string(),
            index: point.index.to_string(),
        })
        .collect();

    println!(
        "{} {}",
        "Projected progression".cyan().bold(),
        format!("(+{:.2} per week)", progression.weekly_increment()).dimmed()
    );
    println!("{}", Table::new(rows).with(Style::rounded()));
}
