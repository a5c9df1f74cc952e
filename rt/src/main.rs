//! Roadtrip - LLM-backed road trip planner
//!
//! CLI entry point for editing the trip and generating itineraries.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use roadtrip::cli::{Cli, Command, PrefsArgs, get_log_path};
use roadtrip::config::Config;
use roadtrip::domain::{Destination, TripPreferences};
use roadtrip::llm::create_client;
use roadtrip::planning::{PLAN_MAX_TOKENS, PlanRequest, Planner, build_plan_request_with};
use roadtrip::prompts::PromptLoader;
use roadtrip::render::{MapLayers, Timeline};
use roadtrip::session::TripSession;
use roadtrip::store::ItineraryStore;

fn setup_logging(log_dir: &Path, cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_path(log_dir))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Read logging settings before the full config load so that load is logged
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    let log_dir = Config::load_log_dir(cli.config.as_ref()).unwrap_or_else(Config::default_log_dir);
    setup_logging(&log_dir, cli.log_level.as_deref(), config_log_level.as_deref())
        .context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_dir = config.storage.expanded_dir();
    let mut store = ItineraryStore::open(&store_dir)
        .context(format!("Failed to open trip storage at {}", store_dir.display()))?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Add { name, days } => cmd_add(&mut store, &name, days),
        Command::Remove { position } => cmd_remove(&mut store, position),
        Command::List => {
            cmd_list(&store);
            Ok(())
        }
        Command::Prefs(args) => cmd_prefs(&mut store, args),
        Command::Generate => cmd_generate(&config, store).await,
        Command::Show => {
            cmd_show(&store);
            Ok(())
        }
        Command::Map { output } => cmd_map(&store, output),
        Command::Prompt => cmd_prompt(&config, &store),
        Command::Reset => cmd_reset(&mut store),
    }
}

fn cmd_add(store: &mut ItineraryStore, name: &str, days: u32) -> Result<()> {
    let destination = Destination::new(name, days)?;
    let label = destination.to_string();
    store.add_destination(destination)?;
    println!("{} Added: {}", "✓".green(), label.cyan());
    Ok(())
}

fn cmd_remove(store: &mut ItineraryStore, position: usize) -> Result<()> {
    let len = store.destinations().len();
    if position == 0 || position > len {
        eprintln!("{} No destination #{} (the list has {})", "✗".red(), position, len);
        std::process::exit(1);
    }
    let removed = store.remove_destination(position - 1)?;
    println!("{} Removed: {}", "✓".green(), removed);
    Ok(())
}

fn cmd_list(store: &ItineraryStore) {
    let destinations = store.destinations();
    if destinations.is_empty() {
        println!("No destinations yet. Add one with: rt add <NAME> --days <N>");
        return;
    }
    for (i, destination) in destinations.iter().enumerate() {
        println!("{:>3}. {}", i + 1, destination);
    }
}

fn cmd_prefs(store: &mut ItineraryStore, args: PrefsArgs) -> Result<()> {
    if !args.is_empty() {
        store.update_preferences(|p| apply_prefs(p, args))?;
        println!("{} Preferences saved", "✓".green());
    }
    print_prefs(store.preferences());
    Ok(())
}

fn apply_prefs(prefs: &mut TripPreferences, args: PrefsArgs) {
    if let Some(city) = args.start_city {
        prefs.start_city = city.trim().to_string();
    }
    if let Some(hours) = args.max_hours {
        prefs.max_drive_hours_per_day = hours;
    }
    if let Some(round_trip) = args.round_trip {
        prefs.round_trip = round_trip;
    }
    if let Some(style) = args.return_style {
        prefs.return_route_style = style;
    }
    if let Some(date) = args.start_date {
        prefs.start_date = date;
    }
    if let Some(stops) = args.stops {
        prefs.stops_frequency = stops;
    }
    if let Some(amenity) = args.amenity {
        prefs.amenity_type = amenity;
    }
}

fn print_prefs(prefs: &TripPreferences) {
    let start = if prefs.has_start_city() {
        prefs.start_city.clone()
    } else {
        "(not set)".dimmed().to_string()
    };
    println!("Start city:        {}", start);
    println!("Max drive hours:   {}", prefs.max_drive_hours_per_day);
    match prefs.effective_return_style() {
        Some(style) => println!("Round trip:        yes ({})", style),
        None => println!("Round trip:        no"),
    }
    println!("Start date:        {}", prefs.start_date);
    println!("Stop frequency:    {}", prefs.stops_frequency);
    println!("Stop type:         {}", prefs.amenity_type);
}

async fn cmd_generate(config: &Config, store: ItineraryStore) -> Result<()> {
    // Input problems are reported before the key is looked at
    request_or_exit(config, &store);
    config.validate()?;
    let client = create_client(&config.llm)?;
    let planner = Planner::new(Arc::clone(&client), config.planner.clone());
    let session = TripSession::new(store, planner);

    println!("Generating trip plan with {}...", client.provider());
    match session.generate().await {
        Ok(itinerary) => {
            print!("{}", Timeline::new(std::io::stdout().is_terminal()).render(&itinerary));
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "cmd_generate: generation failed");
            eprintln!("{} {}", "✗".red(), e.user_message().red());
            std::process::exit(1);
        }
    }
}

fn cmd_show(store: &ItineraryStore) {
    match store.itinerary() {
        Some(itinerary) => print!("{}", Timeline::new(std::io::stdout().is_terminal()).render(itinerary)),
        None => println!("No trip plan yet. Run: rt generate"),
    }
}

fn cmd_map(store: &ItineraryStore, output: Option<PathBuf>) -> Result<()> {
    let Some(itinerary) = store.itinerary() else {
        eprintln!("{} No trip plan yet. Run: rt generate", "✗".red());
        std::process::exit(1);
    };
    let geojson = serde_json::to_string_pretty(&MapLayers::build(itinerary).to_geojson())?;
    match output {
        Some(path) => {
            fs::write(&path, geojson).context(format!("Failed to write {}", path.display()))?;
            println!("{} Map written to {}", "✓".green(), path.display());
        }
        None => println!("{}", geojson),
    }
    Ok(())
}

/// Build the planning request for the stored trip, exiting on invalid input
fn request_or_exit(config: &Config, store: &ItineraryStore) -> PlanRequest {
    let loader = PromptLoader::with_override_dir(config.planner.prompts_dir.as_deref());
    match build_plan_request_with(&loader, store.destinations(), store.preferences(), config.planner.mode) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "request_or_exit: request rejected");
            eprintln!("{} {}", "✗".red(), e.user_message());
            std::process::exit(1);
        }
    }
}

/// Print the request without calling the service; no API key needed
fn cmd_prompt(config: &Config, store: &ItineraryStore) -> Result<()> {
    let request = request_or_exit(config, store);
    let completion = request.to_completion_request(&config.planner, PLAN_MAX_TOKENS);

    println!("{}", "# System instruction".bold());
    println!("{}", request.system_instruction.trim_end());
    println!();
    println!("{}", "# Instructions".bold());
    println!("{}", request.instructions.trim_end());
    println!();
    println!("{} {}", "# Mode:".bold(), request.mode);
    if let Some(tool) = completion.grounding {
        println!("{} {}", "# Grounding:".bold(), tool.as_str());
    }
    if let Some(schema) = completion.response_schema {
        println!("{}", "# Response schema".bold());
        println!("{}", serde_json::to_string_pretty(&schema.to_json_schema())?);
    }
    Ok(())
}

fn cmd_reset(store: &mut ItineraryStore) -> Result<()> {
    store.reset()?;
    println!("{} Trip cleared", "✓".green());
    Ok(())
}
