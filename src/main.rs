//! Headless match runner
//!
//! Plays one match with the human seat idle, letting AI and co-op
//! controllers act, then prints a summary or a JSON snapshot.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use serde::de::{DeserializeOwned, IntoDeserializer};

use dune_hegemony::ai::Difficulty;
use dune_hegemony::core::config::{GameMode, HazardDensity, MapSize};
use dune_hegemony::faction::House;
use dune_hegemony::simulation::EventKind;
use dune_hegemony::{GameState, MatchConfig};

#[derive(Parser, Debug)]
#[command(name = "dune-hegemony")]
#[command(about = "Run a headless Dune Hegemony match")]
struct Args {
    /// Match config in TOML; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// House played by the human seat (atreides, harkonnen, fremen, spacing_guild, bene_gesserit)
    #[arg(long, value_parser = parse_snake::<House>)]
    house: Option<House>,

    /// skirmish, campaign or coop
    #[arg(long, value_parser = parse_snake::<GameMode>)]
    mode: Option<GameMode>,

    /// Number of AI opponents (1-4)
    #[arg(long)]
    ais: Option<u8>,

    /// easy, medium or hard
    #[arg(long, value_parser = parse_snake::<Difficulty>)]
    difficulty: Option<Difficulty>,

    /// small, medium or large
    #[arg(long, value_parser = parse_snake::<MapSize>)]
    map_size: Option<MapSize>,

    /// Sinkhole density: low, medium or high
    #[arg(long, value_parser = parse_snake::<HazardDensity>)]
    hazards: Option<HazardDensity>,

    /// Mission number (1-10) for campaign mode
    #[arg(long)]
    campaign_level: Option<u8>,

    /// Number of co-op allies (0-3)
    #[arg(long)]
    coop: Option<u8>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before stopping
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level logging for the simulation
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Parse a flag value with the type's serde (snake_case) names
fn parse_snake<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    T::deserialize(value.into_deserializer())
        .map_err(|e: serde::de::value::Error| e.to_string())
}

fn build_config(args: &Args) -> Result<MatchConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(house) = args.house {
        config.house = house;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(ais) = args.ais {
        config.ai_count = ais;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(map_size) = args.map_size {
        config.map_size = map_size;
    }
    if let Some(hazards) = args.hazards {
        config.hazard_density = hazards;
    }
    if let Some(level) = args.campaign_level {
        config.campaign_level = level;
    }
    if let Some(coop) = args.coop {
        config.coop_players = coop;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("dune_hegemony={level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;
    let mut state = GameState::new(config)?;
    let events = state.run(args.ticks);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        return Ok(());
    }

    let kills = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::UnitKilled { .. }))
        .count();
    let casts = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::SuperweaponFired { .. }))
        .count();

    println!("=== MATCH {} ===", state.match_id);
    println!("Ticks:    {}", state.tick);
    println!("Status:   {:?}", state.status);
    println!("Weather:  {:?}", state.weather.kind);
    println!("Units lost: {kills}   Superweapons fired: {casts}");
    println!(
        "Spice control: {:.0}%",
        state.human_spice_control() * 100.0
    );
    println!();
    for faction in state.economy_snapshot() {
        let e = &faction.economy;
        println!(
            "{:<8} {:<14} units {:>3}  spice {:>6}  solaris {:>6}  choam {:>4}  fear {:>4}  faith {:>4}  favor {:>4}  will {:>4}",
            faction.id.to_string(),
            faction.house.to_string(),
            faction.units,
            e.spice,
            e.solaris,
            e.choam,
            e.fear,
            e.faith,
            e.favor,
            e.will,
        );
    }
    if let Some(mission) = state.mission_view() {
        println!();
        println!(
            "Mission {} ({}): {} - {} cycles left [{}]",
            mission.key, mission.title, mission.status, mission.cycles_left, mission.narrative_key
        );
    }
    Ok(())
}
