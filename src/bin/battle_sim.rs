//! Headless Battle Simulator
//!
//! Sets up a home tile and a defended target tile, resolves one attack and
//! prints the battle report as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use conquest_core::army::{Composition, UnitType};
use conquest_core::battle::{AttackRequest, BattleEngine, BattleReport};
use conquest_core::campaign::{TerrainType, Tile, TileGrid};
use conquest_core::core::{AuxiliaryId, LeaderId, PlayerId, Result, StrategyId, TileCoord};
use conquest_core::data::GameData;

const PLAYER: PlayerId = PlayerId(1);
const DEFENDER: PlayerId = PlayerId(2);
const HOME: TileCoord = TileCoord { x: 0, y: 0 };
const TARGET: TileCoord = TileCoord { x: 1, y: 0 };

/// Headless Battle Simulator - resolve one attack on a tile
#[derive(Parser, Debug)]
#[command(name = "battle_sim")]
#[command(about = "Resolve a single attack and print the battle report")]
struct Args {
    /// Attacking militia
    #[arg(long, default_value_t = 0)]
    attacker_militia: u32,

    /// Attacking archers
    #[arg(long, default_value_t = 0)]
    attacker_archers: u32,

    /// Attacking cavalry
    #[arg(long, default_value_t = 0)]
    attacker_cavalry: u32,

    /// Defending militia
    #[arg(long, default_value_t = 0)]
    defender_militia: u32,

    /// Defending archers
    #[arg(long, default_value_t = 0)]
    defender_archers: u32,

    /// Defending cavalry
    #[arg(long, default_value_t = 0)]
    defender_cavalry: u32,

    /// Terrain of the target tile
    #[arg(long, default_value = "plains")]
    terrain: TerrainType,

    /// Leader id (gen1, gen2)
    #[arg(long)]
    leader: Option<String>,

    /// Strategy id (defensive_stance, aggressive_charge, guerilla_tactics)
    #[arg(long)]
    strategy: Option<String>,

    /// Auxiliary id, recorded on the report only
    #[arg(long)]
    auxiliary: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Game data TOML replacing the built-in tables
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let data = match &args.data {
        Some(path) => GameData::load_from_toml(path)?,
        None => GameData::standard(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Battle seed {}", seed);
    let mut engine = BattleEngine::with_seed(data, seed);

    let attackers: Composition = [
        (UnitType::Militia, args.attacker_militia),
        (UnitType::Archer, args.attacker_archers),
        (UnitType::Cavalry, args.attacker_cavalry),
    ]
    .into_iter()
    .collect();
    let defenders: Composition = [
        (UnitType::Militia, args.defender_militia),
        (UnitType::Archer, args.defender_archers),
        (UnitType::Cavalry, args.defender_cavalry),
    ]
    .into_iter()
    .collect();

    let mut map = TileGrid::new();
    map.insert(Tile::new(HOME, TerrainType::City).with_owner(PLAYER));
    map.insert(
        Tile::new(TARGET, args.terrain)
            .with_owner(DEFENDER)
            .with_garrison(defenders),
    );

    let mut request = AttackRequest::new(PLAYER, HOME, TARGET, attackers);
    request.leader = args.leader.map(LeaderId::new);
    request.strategy = args.strategy.map(StrategyId::new);
    request.auxiliary = args.auxiliary.map(AuxiliaryId::new);

    let report = engine.resolve_battle(&mut map, &request)?;

    match args.format.as_str() {
        "text" => print_text(&report),
        _ => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_text(report: &BattleReport) {
    println!("{}", report.headline());
    println!("{}", "=".repeat(report.headline().len()));
    println!("Terrain: {}", report.terrain);
    println!("Rounds: {}", report.rounds_fought());
    println!();

    println!("Attacker ({} lost)", report.attacker_casualties);
    for line in report.attacker_breakdown() {
        println!("  {:<8} {:>5} -> {:<5} (-{})", line.unit, line.initial, line.remaining, line.lost());
    }

    println!("Defender ({} lost)", report.defender_casualties);
    for line in report.defender_breakdown() {
        println!("  {:<8} {:>5} -> {:<5} (-{})", line.unit, line.initial, line.remaining, line.lost());
    }

    println!();
    println!("{}", report.narrative);
}
