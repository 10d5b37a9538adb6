//! Frostlake Headless Session Harness
//!
//! Validates map generation, the hazard and instrument scenarios, and whole
//! sessions played by a seeded random player. Runs entirely in-process with
//! no console prompts.
//!
//! Usage:
//!   cargo run -p frostlake-simtest
//!   cargo run -p frostlake-simtest -- --seeds 1000 --verbose
//!   cargo run -p frostlake-simtest -- --seed 7 --json

mod prompter;
mod render;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use frostlake_logic::config::LakeConfig;
use frostlake_logic::generation::{build_frame, generate_map, generate_map_with_cliff};
use frostlake_logic::grid::{CliffSide, Direction, Position};
use frostlake_logic::hazard::Resolution;
use frostlake_logic::instrument::{check_site, Readings, RngReadings};
use frostlake_logic::item::{
    EquipmentKind, EquipmentStore, GearKind, HazardKind, InstrumentKind, Item,
};
use frostlake_logic::researcher::Researcher;
use frostlake_logic::session::{Action, Outcome, Phase, Session};
use frostlake_logic::validation::validate_map;
use frostlake_logic::LakeError;
use rand::rngs::StdRng;
use rand::SeedableRng;

use prompter::RandomPrompter;
use render::render_grid;

/// Upper bound on actions per autoplayed session.
const MAX_ACTIONS: usize = 20_000;

#[derive(Parser)]
#[command(name = "frostlake-simtest")]
#[command(version)]
#[command(about = "Headless validation harness for Frostlake sessions")]
struct Cli {
    /// Number of seeds to sweep for generation and autoplay
    #[arg(long, default_value = "200")]
    seeds: u64,

    /// Play and dump a single session with this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Lake configuration file (JSON); defaults to the reference lake
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every check and a map dump per section
    #[arg(short, long)]
    verbose: bool,

    /// With --seed, print the final session snapshot as JSON
    #[arg(long)]
    json: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match &cli.config {
        Some(path) => LakeConfig::load(path)?,
        None => LakeConfig::default(),
    };

    if let Some(seed) = cli.seed {
        let outcome = play_single(&config, seed, cli.verbose, cli.json)?;
        std::process::exit(i32::from(outcome.code()));
    }

    println!("=== Frostlake Session Harness ===\n");

    let mut results = Vec::new();

    // 1. Map generation sweep
    results.extend(validate_generation(&config, cli.seeds, cli.verbose));

    // 2. Movement and hazard scenarios
    results.extend(validate_hazard_scenarios(&config));

    // 3. Instrument site rules
    results.extend(validate_instruments(&config));

    // 4. Turn controller scenarios
    results.extend(validate_turn_controller(&config)?);

    // 5. Autoplay sweep
    results.extend(validate_autoplay(&config, cli.seeds, cli.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || cli.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── Single session ──────────────────────────────────────────────────────

fn play_single(
    config: &LakeConfig,
    seed: u64,
    verbose: bool,
    json: bool,
) -> Result<Outcome, LakeError> {
    let mut session = Session::with_seed(config.clone(), seed)?;
    if verbose {
        println!("{}", render_grid(session.grid(), session.store()));
    }
    let mut player = RandomPrompter::new(seed.wrapping_add(1));
    let outcome = session.run(&mut player, MAX_ACTIONS)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        println!("{}", render_grid(session.grid(), session.store()));
        println!("----------> {}", outcome.message());
        for (goal, result) in session.goals().finished() {
            println!("  {}: {}", goal.goal_text(), result);
        }
    }
    Ok(outcome)
}

// ── 1. Map Generation ───────────────────────────────────────────────────

fn validate_generation(config: &LakeConfig, seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Map Generation ---");
    let mut results = Vec::new();

    let mut failures = Vec::new();
    let mut sides: BTreeMap<String, u64> = BTreeMap::new();
    for seed in 0..seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        match generate_map(config, &mut rng) {
            Ok(grid) => {
                let errors = validate_map(&grid, config);
                if !errors.is_empty() {
                    failures.push(format!("seed {}: {}", seed, errors[0].message));
                }
                *sides
                    .entry(format!("{:?}", grid.cliff_side()))
                    .or_insert(0) += 1;
                if verbose && seed == 0 {
                    println!("{}", render_grid(&grid, &EquipmentStore::new()));
                }
            }
            Err(e) => failures.push(format!("seed {}: {}", seed, e)),
        }
    }
    results.push(TestResult::check(
        "maps_validate",
        failures.is_empty(),
        if failures.is_empty() {
            format!("{} maps valid", seeds)
        } else {
            format!("{} invalid, first: {}", failures.len(), failures[0])
        },
    ));

    results.push(TestResult::check(
        "cliff_sides_all_used",
        seeds < 30 || sides.len() == 3,
        format!("{:?}", sides),
    ));

    let a = generate_map(config, &mut StdRng::seed_from_u64(99));
    let b = generate_map(config, &mut StdRng::seed_from_u64(99));
    results.push(TestResult::check(
        "generation_deterministic_per_seed",
        matches!((&a, &b), (Ok(a), Ok(b)) if a == b),
        "seed 99 twice",
    ));

    results
}

// ── 2. Movement & Hazards ───────────────────────────────────────────────

fn validate_hazard_scenarios(config: &LakeConfig) -> Vec<TestResult> {
    println!("--- Movement & Hazards ---");
    let mut results = Vec::new();
    let climbing = EquipmentKind::Gear(GearKind::Climbing);

    for carry in [true, false] {
        let name = if carry {
            "left_cliff_with_climbing_gear"
        } else {
            "left_cliff_with_empty_bag"
        };
        let mut rng = StdRng::seed_from_u64(17);
        let Ok(mut grid) = generate_map_with_cliff(config, CliffSide::Left, &mut rng) else {
            results.push(TestResult::check(name, false, "generation failed"));
            continue;
        };
        let Some(row) = (1..grid.rows() - 1).find(|&r| {
            let p = Position::new(r, 1);
            grid.item_at(p).is_none() && grid.occupant_at(p).is_none()
        }) else {
            results.push(TestResult::check(name, false, "no free cell beside the cliff"));
            continue;
        };

        let mut store = EquipmentStore::with_pool(config.pool_copies_per_kind);
        let Ok(mut researcher) = Researcher::new(1, config.bag_capacity) else {
            results.push(TestResult::check(name, false, "researcher rejected"));
            continue;
        };
        if carry {
            let taken = store
                .find_in_pool(climbing)
                .ok_or(LakeError::PoolExhausted(climbing))
                .and_then(|id| researcher.take_from_pool(&mut store, id));
            if let Err(e) = taken {
                results.push(TestResult::check(name, false, format!("setup: {e}")));
                continue;
            }
        }
        let start = Position::new(row, 1);
        let cliff = Position::new(row, 0);
        let placed = grid.place_occupant(start, researcher.id()).is_ok();
        let report = researcher.slide(Direction::Left, &mut grid, &mut store);

        let passed = placed
            && match (&report, carry) {
                (Ok(r), true) => {
                    matches!(
                        r.encounter.map(|e| e.resolution),
                        Some(Resolution::Neutralized { .. })
                    ) && researcher.is_alive()
                        && researcher.bag().is_empty()
                        && matches!(grid.item_at(cliff), Some(Item::Equipment(_)))
                }
                (Ok(r), false) => {
                    r.encounter.map(|e| e.resolution) == Some(Resolution::Killed)
                        && !researcher.is_alive()
                        && grid.hazard_at(cliff).is_some()
                }
                (Err(_), _) => false,
            };
        results.push(TestResult::check(name, passed, format!("row {row}: {report:?}")));
    }

    // Blocked first step leaves the grid untouched.
    let mut noop_ok = true;
    for seed in 0..20 {
        let Ok(mut grid) = generate_map(config, &mut StdRng::seed_from_u64(seed)) else {
            noop_ok = false;
            continue;
        };
        let mut store = EquipmentStore::new();
        let Ok(mut researcher) = Researcher::new(1, config.bag_capacity) else {
            noop_ok = false;
            continue;
        };
        let entry = grid.entry_cell();
        if grid.place_occupant(entry, researcher.id()).is_err() {
            noop_ok = false;
            continue;
        }
        let before = grid.clone();
        let err = researcher.slide(Direction::Up, &mut grid, &mut store);
        noop_ok &= matches!(err, Err(LakeError::UnavailableDirection)) && grid == before;
    }
    results.push(TestResult::check(
        "blocked_move_is_noop",
        noop_ok,
        "Up from the entry cell, 20 lakes",
    ));

    results
}

// ── 3. Instruments ──────────────────────────────────────────────────────

fn validate_instruments(config: &LakeConfig) -> Vec<TestResult> {
    println!("--- Instruments ---");
    let mut results = Vec::new();

    let Ok(mut grid) = build_frame(config, CliffSide::Right) else {
        results.push(TestResult::check("frame", false, "frame failed"));
        return results;
    };
    let open = Position::new(3, 5);
    let beside = Position::new(3, 3);
    if let Err(e) = grid.place_item(Position::new(4, 4), Item::Hazard(HazardKind::IceBlock)) {
        results.push(TestResult::check("instrument_setup", false, e.to_string()));
        return results;
    }

    results.push(TestResult::check(
        "temperature_rejects_ice_neighbour",
        matches!(
            check_site(InstrumentKind::TemperatureDetector, &grid, beside),
            Err(LakeError::IncompatibleLocation(_))
        ),
        format!("{beside}"),
    ));
    results.push(TestResult::check(
        "temperature_accepts_open_ice",
        check_site(InstrumentKind::TemperatureDetector, &grid, Position::new(6, 8)).is_ok(),
        "(6, 8)",
    ));
    results.push(TestResult::check(
        "chisel_needs_ice_block",
        check_site(InstrumentKind::Chisel, &grid, beside).is_ok()
            && check_site(InstrumentKind::Chisel, &grid, Position::new(7, 9)).is_err(),
        "beside vs far",
    ));
    results.push(TestResult::check(
        "camera_faces_cliff",
        check_site(InstrumentKind::Camera, &grid, open).is_ok(),
        format!("{open}"),
    ));
    results.push(TestResult::check(
        "wind_meter_on_plain_ice",
        check_site(InstrumentKind::WindSpeedMeter, &grid, open).is_ok(),
        format!("{open}"),
    ));

    let mut rng = StdRng::seed_from_u64(3);
    let mut readings = RngReadings(&mut rng);
    let started = (0..1100)
        .filter(|_| readings.camera_started(config.camera_odds))
        .count();
    results.push(TestResult::check(
        "camera_odds_roughly_hold",
        (600..=990).contains(&started),
        format!("{started}/1100 recordings started"),
    ));

    results
}

// ── 4. Turn Controller ──────────────────────────────────────────────────

fn validate_turn_controller(config: &LakeConfig) -> Result<Vec<TestResult>, LakeError> {
    println!("--- Turn Controller ---");
    let mut results = Vec::new();
    let camera = EquipmentKind::Instrument(InstrumentKind::Camera);

    // Pool drained of cameras while the camera goal is open.
    let grid = build_frame(config, CliffSide::Right)?;
    let mut session = Session::from_parts(
        config.clone(),
        grid,
        3,
        [InstrumentKind::Camera, InstrumentKind::Chisel],
        StdRng::seed_from_u64(0),
    )?;
    session.apply(Action::BeginTurn)?;
    for _ in 0..config.pool_copies_per_kind.min(config.bag_capacity) {
        session.apply(Action::Take(Some(camera)))?;
    }
    session.apply(Action::Take(None))?;
    session.apply(Action::Move(Direction::Down))?;
    session.apply(Action::Exit)?;
    let drained = session.store().pool_count(camera) == 0;
    results.push(TestResult::check(
        "goals_unreachable_ends_session",
        !drained || session.outcome() == Some(Outcome::EquipmentExhausted),
        format!("phase {:?}", session.phase()),
    ));

    // Empty bag and forced first move.
    let grid = build_frame(config, CliffSide::Bottom)?;
    let mut session = Session::from_parts(
        config.clone(),
        grid,
        2,
        [InstrumentKind::WindSpeedMeter],
        StdRng::seed_from_u64(0),
    )?;
    session.apply(Action::BeginTurn)?;
    let empty = session.apply(Action::Take(None));
    results.push(TestResult::check(
        "empty_bag_rejected",
        matches!(empty, Err(LakeError::EmptyBag)) && session.phase() == Phase::Entrance,
        format!("{empty:?}"),
    ));
    session.apply(Action::Take(Some(EquipmentKind::Instrument(
        InstrumentKind::WindSpeedMeter,
    ))))?;
    session.apply(Action::Take(None))?;
    let exit = session.apply(Action::Exit);
    results.push(TestResult::check(
        "first_action_must_move",
        matches!(exit, Err(LakeError::MustMoveFirst)),
        format!("{exit:?}"),
    ));

    Ok(results)
}

// ── 5. Autoplay ─────────────────────────────────────────────────────────

fn validate_autoplay(config: &LakeConfig, seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Autoplay ---");
    let mut results = Vec::new();
    let mut outcomes: BTreeMap<String, u64> = BTreeMap::new();
    let mut errors = Vec::new();
    let mut bag_violations = 0;
    let mut rejections: BTreeMap<String, usize> = BTreeMap::new();
    let mut events = 0;

    for seed in 0..seeds {
        let mut session = match Session::with_seed(config.clone(), seed) {
            Ok(s) => s,
            Err(e) => {
                errors.push(format!("seed {seed}: {e}"));
                continue;
            }
        };
        let mut player = RandomPrompter::new(seed.wrapping_add(10_000));
        match session.run(&mut player, MAX_ACTIONS) {
            Ok(outcome) => *outcomes.entry(format!("{outcome:?}")).or_insert(0) += 1,
            Err(e) => errors.push(format!("seed {seed}: {e}")),
        }
        for r in session.researchers() {
            let bag = r.bag();
            let mixed = bag
                .iter()
                .any(|e| Some(e.kind.category()) != bag.category());
            if bag.len() > config.bag_capacity || mixed {
                bag_violations += 1;
            }
        }
        events += player.events;
        for (k, v) in player.rejections {
            *rejections.entry(k).or_insert(0) += v;
        }
    }

    if verbose {
        println!("  {events} events across {seeds} sessions");
        for (reason, count) in &rejections {
            println!("  rejected {count:>6}x  {reason}");
        }
    }

    results.push(TestResult::check(
        "sessions_terminate",
        errors.is_empty(),
        if errors.is_empty() {
            format!("{:?}", outcomes)
        } else {
            format!("{} failed, first: {}", errors.len(), errors[0])
        },
    ));
    results.push(TestResult::check(
        "bags_stay_within_rules",
        bag_violations == 0,
        format!("{bag_violations} violations"),
    ));

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_sections_pass_on_reference_lake() {
        let config = LakeConfig::default();
        let results = validate_hazard_scenarios(&config)
            .into_iter()
            .chain(validate_instruments(&config))
            .chain(validate_turn_controller(&config).unwrap());
        for r in results {
            assert!(r.passed, "{}: {}", r.name, r.detail);
        }
    }

    #[test]
    fn autoplay_sweep_passes() {
        let results = validate_autoplay(&LakeConfig::default(), 20, false);
        assert!(results.iter().all(|r| r.passed));
    }
}
