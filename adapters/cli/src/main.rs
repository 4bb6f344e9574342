#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Legends of Valor unattended.
//!
//! The binary wires the round orchestrator to a scripted autopilot
//! controller and a fixed-formula combat port, then narrates each round
//! from the drained events. All randomness flows through a single seeded
//! ChaCha stream so identical invocations replay identical games.

use anyhow::bail;
use clap::Parser;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use valor_core::{
    BoardConfig, Command, Direction, Event, HeroSnapshot, LaneId, MonsterKind, MonsterSnapshot,
    Rng, SplitMix64, StatAxis, TileKind, Victory, LANE_COUNT,
};
use valor_system_rounds::{
    CombatPort, HeroAction, HeroController, NoMarket, RoundReport, Rounds, SouthSeeking,
};
use valor_system_spawning::{Config, Spawning};
use valor_world::{apply, query, World};

mod render;

const HERO_NAMES: [&str; 3] = ["Gaerdal", "Sehanine", "Skoraeus"];

/// Legends of Valor autopilot runner.
#[derive(Debug, Parser)]
#[command(name = "valor", about = "Plays a seeded Legends of Valor game")]
struct Args {
    /// Seed shared by terrain generation and every in-game roll.
    #[arg(long, default_value_t = 2024)]
    seed: u64,

    /// Maximum number of rounds before the run is called off.
    #[arg(long, default_value_t = 64)]
    rounds: u32,

    /// Number of heroes to enlist, one lane each from the west.
    #[arg(long, default_value_t = 3)]
    heroes: u8,

    /// Rounds between monster waves.
    #[arg(long, default_value_t = 8)]
    wave_interval: u32,

    /// Print the board after every round instead of only at the end.
    #[arg(long)]
    verbose: bool,
}

/// Adapter-side RNG bridging the seeded ChaCha stream into the engine.
struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Rng for GameRng {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

/// Controller that pushes every hero toward the monster nexus.
///
/// Priority per turn: strike a monster in range, clear an obstacle to the
/// north, otherwise step north and fall back to a lateral step within the
/// lane when the column ahead is blocked.
#[derive(Debug, Default)]
struct Autopilot;

impl HeroController for Autopilot {
    fn choose_action(&mut self, hero: &HeroSnapshot, world: &World) -> HeroAction {
        if let Some(target) = query::monsters_in_range(world, hero.cell).first() {
            return HeroAction::Attack { target: *target };
        }

        let board = query::board(world);
        if let Some(ahead) = hero.cell.step(Direction::North) {
            if let Some(tile) = board.try_tile(ahead) {
                if tile.kind() == TileKind::Obstacle {
                    return HeroAction::RemoveObstacle(Direction::North);
                }
            }
            if board.is_accessible(ahead) {
                return HeroAction::Move(Direction::North);
            }
        }

        // Column ahead is a dead end; slide toward the lane's other column.
        match board.lane_index_of(hero.cell.column()) {
            Some(lane) if board.lane_columns(lane)[0] == hero.cell.column() => {
                HeroAction::Move(Direction::East)
            }
            Some(_) => HeroAction::Move(Direction::West),
            None => HeroAction::Skip,
        }
    }
}

/// Combat formulas for the autopilot run.
///
/// Strength and agility terrain bonuses are folded in at the moment of the
/// roll; the engine itself never bakes terrain into stats. Hero dodges run
/// on a dedicated splitmix stream so combat rolls never perturb the game
/// stream shared with spawning and targeting.
#[derive(Debug)]
struct FormulaCombat {
    dodge_rng: SplitMix64,
    defeated: Vec<(MonsterKind, u32)>,
}

impl FormulaCombat {
    const DODGE_CHANCE: f64 = 0.10;

    fn new(seed: u64) -> Self {
        Self {
            dodge_rng: SplitMix64::new(seed),
            defeated: Vec::new(),
        }
    }

    fn base_strike(level: u32) -> f32 {
        25.0 + 5.0 * level as f32
    }
}

impl CombatPort for FormulaCombat {
    fn hero_strike(&mut self, world: &World, hero: &HeroSnapshot, monster: &MonsterSnapshot) -> u32 {
        let strength = query::terrain_multiplier(world, hero.cell, StatAxis::Strength);
        let evasion = query::terrain_multiplier(world, monster.cell, StatAxis::Agility);
        (Self::base_strike(hero.level) * strength / evasion).round() as u32
    }

    fn hero_spell(
        &mut self,
        world: &World,
        hero: &HeroSnapshot,
        monster: &MonsterSnapshot,
    ) -> Option<u32> {
        if hero.mana < 25 {
            return None;
        }
        Some(self.hero_strike(world, hero, monster) * 2)
    }

    fn monster_strike(&mut self, world: &World, monster: &MonsterSnapshot, hero: &HeroSnapshot) -> u32 {
        let dodge = query::terrain_multiplier(world, hero.cell, StatAxis::Dexterity);
        if self.dodge_rng.next_unit() < Self::DODGE_CHANCE * f64::from(dodge) {
            return 0;
        }
        (Self::base_strike(monster.level) * 0.6).round() as u32
    }

    fn potion(&mut self, hero: &HeroSnapshot) -> (u32, u32) {
        (hero.max_hit_points / 2, hero.max_mana / 2)
    }

    fn round_recovery(&mut self, hero: &HeroSnapshot) -> (u32, u32) {
        (hero.max_hit_points / 10, hero.max_mana / 10)
    }

    fn reward(&mut self, _hero: valor_core::HeroId, kind: MonsterKind, level: u32) {
        self.defeated.push((kind, level));
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.heroes == 0 || usize::from(args.heroes) > LANE_COUNT {
        bail!("hero count must be between 1 and {LANE_COUNT}");
    }

    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureBoard {
            config: BoardConfig::default(),
            seed: args.seed,
        },
        &mut events,
    );
    for lane in 0..args.heroes {
        apply(
            &mut world,
            Command::EnlistHero {
                name: HERO_NAMES[usize::from(lane) % HERO_NAMES.len()].to_owned(),
                lane: LaneId::new(lane),
                max_hit_points: 100,
                max_mana: 60,
                level: 1,
            },
            &mut events,
        );
    }

    let mut rounds = Rounds::new(Spawning::new(Config::new(args.wave_interval)));
    let mut controller = Autopilot;
    let mut combat = FormulaCombat::new(args.seed ^ 0x636f_6d62_6174);
    let mut market = NoMarket;
    let mut pathing = SouthSeeking;
    let mut rng = GameRng::new(args.seed);

    let mut outcome = None;
    while rounds.round() < args.rounds {
        let report = rounds.play_round(
            &mut world,
            &mut controller,
            &mut combat,
            &mut market,
            &mut pathing,
            &mut rng,
        );
        narrate(&report);
        if args.verbose {
            println!("{}", render::board(&world));
        }
        if report.outcome.is_some() || report.quit {
            outcome = report.outcome;
            break;
        }
    }

    println!("{}", render::board(&world));
    match outcome {
        Some(Victory::Heroes) => println!("The heroes breached the monster nexus."),
        Some(Victory::Monsters) => println!("The monsters overran the valley."),
        None => println!("No side prevailed within {} rounds.", args.rounds),
    }
    if !combat.defeated.is_empty() {
        println!("Monsters slain: {}", combat.defeated.len());
    }
    Ok(())
}

fn narrate(report: &RoundReport) {
    let mut spawned = 0usize;
    let mut slain = 0usize;
    let mut fallen = 0usize;
    for event in &report.events {
        match event {
            Event::MonsterSpawned { .. } => spawned += 1,
            Event::MonsterDown { .. } => slain += 1,
            Event::HeroDown { .. } => fallen += 1,
            _ => {}
        }
    }
    println!(
        "round {:>3}: {} events, {} spawned, {} slain, {} heroes down",
        report.round,
        report.events.len(),
        spawned,
        slain,
        fallen
    );
}
