#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round orchestrator that drives the hero and monster phases.
//!
//! The orchestrator owns the round counter and the phase order: respawn,
//! hero phase, monster phase, recovery, wave spawn, with victory evaluated
//! between phases. It never computes damage, rewards, or recovery amounts
//! itself; those flow through the [`CombatPort`] and [`MarketPort`] traits
//! so adapters can plug in their own formulas. Every mutation still goes
//! through the world's command interface, and every event raised during a
//! round is collected into the returned [`RoundReport`].

use valor_core::{
    Cell, Command, Direction, Event, HeroId, HeroSnapshot, MonsterId, MonsterKind,
    MonsterSnapshot, PieceId, PieceKind, Rng, Victory,
};
use valor_system_monster_ai::{MonsterAi, Strike};
use valor_system_spawning::Spawning;
use valor_world::{apply, query, World};

/// Action a hero controller may choose for one hero turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroAction {
    /// Step one cell in a direction.
    Move(Direction),
    /// Jump beside a hero in another lane.
    Teleport {
        /// Hero whose lane is being joined.
        target: HeroId,
    },
    /// Return to the bound lane's nexus.
    Recall,
    /// Clear an adjacent obstacle.
    RemoveObstacle(Direction),
    /// Strike a monster in attack range.
    Attack {
        /// Monster being struck.
        target: MonsterId,
    },
    /// Cast a spell at a monster in attack range.
    Cast {
        /// Monster being targeted.
        target: MonsterId,
    },
    /// Drink a potion; recovery amounts come from the combat port.
    Potion,
    /// Spend the turn doing nothing.
    Skip,
    /// Stop the game loop after this hero phase.
    Quit,
}

/// Decision port consulted once per hero per round.
pub trait HeroController {
    /// Chooses the action for the hero's turn.
    fn choose_action(&mut self, hero: &HeroSnapshot, world: &World) -> HeroAction;
}

/// External combat and recovery formulas.
///
/// Ports receive the world so they can fold terrain multipliers into their
/// math through [`query::terrain_multiplier`].
pub trait CombatPort {
    /// Damage dealt by a hero's weapon strike.
    fn hero_strike(&mut self, world: &World, hero: &HeroSnapshot, monster: &MonsterSnapshot)
        -> u32;

    /// Damage dealt by a hero's spell, or `None` when the hero cannot cast.
    fn hero_spell(
        &mut self,
        world: &World,
        hero: &HeroSnapshot,
        monster: &MonsterSnapshot,
    ) -> Option<u32>;

    /// Damage dealt by a monster's strike.
    fn monster_strike(&mut self, world: &World, monster: &MonsterSnapshot, hero: &HeroSnapshot)
        -> u32;

    /// Hit points and mana restored by drinking a potion.
    fn potion(&mut self, hero: &HeroSnapshot) -> (u32, u32);

    /// Hit points and mana restored by end-of-round recovery.
    fn round_recovery(&mut self, hero: &HeroSnapshot) -> (u32, u32);

    /// Credits a hero for a purged monster.
    fn reward(&mut self, hero: HeroId, kind: MonsterKind, level: u32);
}

/// Trade port consulted when a hero starts its turn on a market nexus.
///
/// The port expresses its trades as world commands, typically
/// `Command::RestoreVitals` writes.
pub trait MarketPort {
    /// Lets the hero trade before choosing its action.
    fn visit(&mut self, hero: &HeroSnapshot, out: &mut Vec<Command>);
}

/// Market port for games without trading.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMarket;

impl MarketPort for NoMarket {
    fn visit(&mut self, _hero: &HeroSnapshot, _out: &mut Vec<Command>) {}
}

/// Pathing hint consulted before the built-in monster advance rule.
pub trait Pathing {
    /// Suggests a step from the cell, or `None` to use the fallback.
    fn preferred_step(&mut self, from: Cell) -> Option<Direction>;
}

/// Pathing that always defers to the built-in south-seeking fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct SouthSeeking;

impl Pathing for SouthSeeking {
    fn preferred_step(&mut self, _from: Cell) -> Option<Direction> {
        None
    }
}

/// Summary of one played round.
#[derive(Clone, Debug)]
pub struct RoundReport {
    /// One-based index of the round.
    pub round: u32,
    /// Every event the world raised during the round, in order.
    pub events: Vec<Event>,
    /// Victory reached during the round, if any.
    pub outcome: Option<Victory>,
    /// True when the controller asked to stop the loop.
    pub quit: bool,
}

/// Round orchestrator that sequences phases and owns the round counter.
#[derive(Debug, Default)]
pub struct Rounds {
    round: u32,
    monster_ai: MonsterAi,
    spawning: Spawning,
    command_scratch: Vec<Command>,
    strike_scratch: Vec<Strike>,
}

impl Rounds {
    /// Creates an orchestrator with the provided wave cadence.
    #[must_use]
    pub fn new(spawning: Spawning) -> Self {
        Self {
            round: 0,
            monster_ai: MonsterAi::new(),
            spawning,
            command_scratch: Vec::new(),
            strike_scratch: Vec::new(),
        }
    }

    /// Number of rounds played so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Plays one full round against the provided ports.
    pub fn play_round(
        &mut self,
        world: &mut World,
        controller: &mut dyn HeroController,
        combat: &mut dyn CombatPort,
        market: &mut dyn MarketPort,
        pathing: &mut dyn Pathing,
        rng: &mut dyn Rng,
    ) -> RoundReport {
        self.round += 1;
        let round = self.round;
        let mut events = Vec::new();

        self.respawn_phase(world, &mut events);
        if let Some(outcome) = query::victory(world) {
            return RoundReport {
                round,
                events,
                outcome: Some(outcome),
                quit: false,
            };
        }

        let quit = self.hero_phase(world, controller, combat, market, &mut events);
        if let Some(outcome) = query::victory(world) {
            return RoundReport {
                round,
                events,
                outcome: Some(outcome),
                quit,
            };
        }
        if quit {
            return RoundReport {
                round,
                events,
                outcome: None,
                quit: true,
            };
        }

        self.monster_phase(world, combat, pathing, rng, &mut events);
        if let Some(outcome) = query::victory(world) {
            return RoundReport {
                round,
                events,
                outcome: Some(outcome),
                quit: false,
            };
        }

        self.recovery_phase(world, combat, &mut events);
        self.wave_phase(world, rng, &mut events);

        RoundReport {
            round,
            events,
            outcome: None,
            quit: false,
        }
    }

    fn respawn_phase(&mut self, world: &mut World, events: &mut Vec<Event>) {
        let fallen: Vec<HeroId> = query::hero_view(world)
            .iter()
            .filter(|hero| !hero.alive)
            .map(|hero| hero.id)
            .collect();
        for hero in fallen {
            apply(world, Command::ReviveHero { hero }, events);
        }
    }

    fn hero_phase(
        &mut self,
        world: &mut World,
        controller: &mut dyn HeroController,
        combat: &mut dyn CombatPort,
        market: &mut dyn MarketPort,
        events: &mut Vec<Event>,
    ) -> bool {
        let party: Vec<HeroId> = query::hero_view(world).iter().map(|hero| hero.id).collect();

        for hero in party {
            let Some(snapshot) = query::hero_view(world).get(hero).cloned() else {
                continue;
            };
            if !snapshot.alive {
                continue;
            }

            if query::standing_on_market(world, hero) {
                self.command_scratch.clear();
                market.visit(&snapshot, &mut self.command_scratch);
                for command in self.command_scratch.drain(..) {
                    apply(world, command, events);
                }
            }

            // Re-read after trading so the controller sees fresh vitals.
            let Some(snapshot) = query::hero_view(world).get(hero).cloned() else {
                continue;
            };
            match controller.choose_action(&snapshot, world) {
                HeroAction::Move(direction) => apply(
                    world,
                    Command::MovePiece {
                        piece: PieceId::Hero(hero),
                        direction,
                    },
                    events,
                ),
                HeroAction::Teleport { target } => {
                    apply(world, Command::TeleportHero { hero, target }, events);
                }
                HeroAction::Recall => apply(world, Command::RecallHero { hero }, events),
                HeroAction::RemoveObstacle(direction) => apply(
                    world,
                    Command::RemoveObstacle {
                        piece: PieceId::Hero(hero),
                        direction,
                    },
                    events,
                ),
                HeroAction::Attack { target } => {
                    if let Some(amount) = self.strike_damage(world, combat, &snapshot, target, false)
                    {
                        self.resolve_hero_hit(world, combat, hero, target, amount, events);
                    }
                }
                HeroAction::Cast { target } => {
                    if let Some(amount) = self.strike_damage(world, combat, &snapshot, target, true)
                    {
                        self.resolve_hero_hit(world, combat, hero, target, amount, events);
                    }
                }
                HeroAction::Potion => {
                    let (hit_points, mana) = combat.potion(&snapshot);
                    apply(
                        world,
                        Command::RestoreVitals {
                            hero,
                            hit_points,
                            mana,
                        },
                        events,
                    );
                }
                HeroAction::Skip => {}
                HeroAction::Quit => return true,
            }
        }

        false
    }

    /// Damage for a strike or spell, or `None` when the target is out of
    /// range, already dead, or the spell fizzles.
    fn strike_damage(
        &mut self,
        world: &World,
        combat: &mut dyn CombatPort,
        hero: &HeroSnapshot,
        target: MonsterId,
        spell: bool,
    ) -> Option<u32> {
        let monster = query::monster_view(world).get(target).cloned()?;
        if !monster.alive || !monster.cell.is_adjacent(hero.cell) {
            return None;
        }
        if spell {
            combat.hero_spell(world, hero, &monster)
        } else {
            Some(combat.hero_strike(world, hero, &monster))
        }
    }

    fn resolve_hero_hit(
        &mut self,
        world: &mut World,
        combat: &mut dyn CombatPort,
        hero: HeroId,
        target: MonsterId,
        amount: u32,
        events: &mut Vec<Event>,
    ) {
        apply(
            world,
            Command::ApplyDamage {
                target: PieceId::Monster(target),
                amount,
            },
            events,
        );
        let before_purge = events.len();
        apply(world, Command::PurgeDefeated, events);
        let purged: Vec<(MonsterKind, u32)> = events[before_purge..]
            .iter()
            .filter_map(|event| match event {
                Event::MonsterDown { kind, level, .. } => Some((*kind, *level)),
                _ => None,
            })
            .collect();
        for (kind, level) in purged {
            combat.reward(hero, kind, level);
        }
    }

    fn monster_phase(
        &mut self,
        world: &mut World,
        combat: &mut dyn CombatPort,
        pathing: &mut dyn Pathing,
        rng: &mut dyn Rng,
        events: &mut Vec<Event>,
    ) {
        let monster_view = query::monster_view(world);
        let hero_view = query::hero_view(world);
        // Scratch buffers come back drained, so the takes yield empty vecs.
        let mut strikes = std::mem::take(&mut self.strike_scratch);
        let mut commands = std::mem::take(&mut self.command_scratch);

        {
            let board = query::board(world);
            let lane_west_column = |monster: MonsterId| {
                let lane = monster_view
                    .get(monster)
                    .unwrap_or_else(|| panic!("planned monster missing from view: {monster:?}"))
                    .lane;
                board.lane_columns(lane)[0]
            };
            let is_cell_blocked = |cell: Cell| {
                !board.is_accessible(cell)
                    || query::piece_at(world, cell, PieceKind::Monster).is_some()
                    || query::piece_at(world, cell, PieceKind::Hero).is_some()
            };
            self.monster_ai.handle(
                &monster_view,
                &hero_view,
                lane_west_column,
                |from| pathing.preferred_step(from),
                is_cell_blocked,
                rng,
                &mut strikes,
                &mut commands,
            );
        }

        for strike in strikes.drain(..) {
            let Some(monster) = monster_view.get(strike.monster) else {
                continue;
            };
            let Some(hero) = query::hero_view(world).get(strike.hero).cloned() else {
                continue;
            };
            if !hero.alive {
                continue;
            }
            let amount = combat.monster_strike(world, monster, &hero);
            apply(
                world,
                Command::ApplyDamage {
                    target: PieceId::Hero(strike.hero),
                    amount,
                },
                events,
            );
        }
        for command in commands.drain(..) {
            apply(world, command, events);
        }

        self.strike_scratch = strikes;
        self.command_scratch = commands;
    }

    fn recovery_phase(
        &mut self,
        world: &mut World,
        combat: &mut dyn CombatPort,
        events: &mut Vec<Event>,
    ) {
        let recovering: Vec<HeroSnapshot> = query::hero_view(world)
            .iter()
            .filter(|hero| hero.alive)
            .cloned()
            .collect();
        for hero in recovering {
            let (hit_points, mana) = combat.round_recovery(&hero);
            if hit_points == 0 && mana == 0 {
                continue;
            }
            apply(
                world,
                Command::RestoreVitals {
                    hero: hero.id,
                    hit_points,
                    mana,
                },
                events,
            );
        }
    }

    fn wave_phase(&mut self, world: &mut World, rng: &mut dyn Rng, events: &mut Vec<Event>) {
        let hero_view = query::hero_view(world);
        let mut commands = std::mem::take(&mut self.command_scratch);
        self.spawning.handle(self.round, &hero_view, rng, &mut commands);
        for command in commands.drain(..) {
            apply(world, command, events);
        }
        self.command_scratch = commands;
    }
}
