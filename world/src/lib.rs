#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Legends of Valor engine.
//!
//! The world owns the board, the hero and monster rosters, and the position
//! registry. All mutation flows through [`apply`], which validates every
//! movement, teleport, recall, obstacle, and spawn request and reports rule
//! violations as rejection events. Every position change passes through a
//! single placement primitive that writes the registry and the piece's own
//! cell field in the same operation, so the two can never diverge.

use std::collections::BTreeMap;

use valor_core::{
    BoardConfig, Cell, Command, Direction, Event, HeroId, LaneId, MonsterId, MonsterKind,
    MoveError, ObstacleError, PieceId, PieceKind, Positioned, RecallError, SplitMix64,
    TeleportError, TileKind,
};

mod board;

pub use board::{Board, Tile};

const DEFAULT_TERRAIN_SEED: u64 = 0x4c6f_5661_6c6f_7221;

#[derive(Clone, Debug)]
struct Hero {
    id: HeroId,
    name: String,
    cell: Cell,
    lane: Option<LaneId>,
    hit_points: u32,
    max_hit_points: u32,
    mana: u32,
    max_mana: u32,
    level: u32,
    alive: bool,
}

#[derive(Clone, Copy, Debug)]
struct Monster {
    id: MonsterId,
    kind: MonsterKind,
    level: u32,
    lane: LaneId,
    cell: Cell,
    hit_points: u32,
    max_hit_points: u32,
    alive: bool,
}

impl Positioned for Hero {
    fn position(&self) -> Cell {
        self.cell
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Positioned for Monster {
    fn position(&self) -> Cell {
        self.cell
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Secondary position index keyed separately for heroes and monsters.
///
/// A hero and a monster may share a cell as a combat-engagement state; two
/// heroes or two monsters may not.
#[derive(Clone, Debug, Default)]
struct PositionRegistry {
    heroes: BTreeMap<HeroId, Cell>,
    monsters: BTreeMap<MonsterId, Cell>,
}

impl PositionRegistry {
    fn record(&mut self, piece: PieceId, cell: Cell) {
        match piece {
            PieceId::Hero(hero) => {
                let _ = self.heroes.insert(hero, cell);
            }
            PieceId::Monster(monster) => {
                let _ = self.monsters.insert(monster, cell);
            }
        }
    }

    fn forget_monster(&mut self, monster: MonsterId) {
        let _ = self.monsters.remove(&monster);
    }

    fn position_of(&self, piece: PieceId) -> Option<Cell> {
        match piece {
            PieceId::Hero(hero) => self.heroes.get(&hero).copied(),
            PieceId::Monster(monster) => self.monsters.get(&monster).copied(),
        }
    }

    fn hero_at(&self, cell: Cell) -> Option<HeroId> {
        self.heroes
            .iter()
            .find(|(_, held)| **held == cell)
            .map(|(id, _)| *id)
    }

    fn monster_at(&self, cell: Cell) -> Option<MonsterId> {
        self.monsters
            .iter()
            .find(|(_, held)| **held == cell)
            .map(|(id, _)| *id)
    }
}

/// Represents the authoritative Legends of Valor world state.
#[derive(Clone, Debug)]
pub struct World {
    board: Board,
    board_config: BoardConfig,
    heroes: Vec<Hero>,
    monsters: Vec<Monster>,
    registry: PositionRegistry,
    next_monster: u32,
}

impl World {
    /// Creates a new world with the default board topology.
    #[must_use]
    pub fn new() -> Self {
        let config = BoardConfig::default();
        let mut rng = SplitMix64::new(DEFAULT_TERRAIN_SEED);
        Self {
            board: Board::generate(&config, &mut rng),
            board_config: config,
            heroes: Vec::new(),
            monsters: Vec::new(),
            registry: PositionRegistry::default(),
            next_monster: 0,
        }
    }

    /// The single placement primitive: writes the registry entry and the
    /// piece's own cell field in one operation.
    fn place_piece(&mut self, piece: PieceId, cell: Cell) {
        match piece {
            PieceId::Hero(hero) => self.hero_mut(hero).cell = cell,
            PieceId::Monster(monster) => self.monster_mut(monster).cell = cell,
        }
        self.registry.record(piece, cell);
    }

    fn hero(&self, hero: HeroId) -> &Hero {
        self.heroes
            .iter()
            .find(|entry| entry.id == hero)
            .unwrap_or_else(|| panic!("unknown hero id {hero:?}"))
    }

    fn hero_mut(&mut self, hero: HeroId) -> &mut Hero {
        self.heroes
            .iter_mut()
            .find(|entry| entry.id == hero)
            .unwrap_or_else(|| panic!("unknown hero id {hero:?}"))
    }

    fn monster_mut(&mut self, monster: MonsterId) -> &mut Monster {
        self.monsters
            .iter_mut()
            .find(|entry| entry.id == monster)
            .unwrap_or_else(|| panic!("unknown monster id {monster:?}"))
    }

    fn validate_move(&self, piece: PieceId, direction: Direction) -> Result<Cell, MoveError> {
        let current = self
            .registry
            .position_of(piece)
            .ok_or(MoveError::NotPlaced)?;
        let target = current.step(direction).ok_or(MoveError::Inaccessible)?;
        if !self.board.is_accessible(target) {
            return Err(MoveError::Inaccessible);
        }

        match piece.kind() {
            PieceKind::Hero => {
                if self.registry.hero_at(target).is_some() {
                    return Err(MoveError::BlockedByHero);
                }
                if self.registry.monster_at(target).is_some() {
                    return Err(MoveError::BlockedByMonster);
                }
                // Steps toward the monster nexus may not leapfrog a monster
                // anywhere along the traversed column. A single step leaves
                // the strict interior empty, but the scan keeps the rule
                // correct for multi-step variants.
                if direction == Direction::North {
                    for row in (target.row() + 1)..current.row() {
                        if self
                            .registry
                            .monster_at(Cell::new(current.column(), row))
                            .is_some()
                        {
                            return Err(MoveError::BlockedByMonster);
                        }
                    }
                }
            }
            PieceKind::Monster => {
                if self.registry.monster_at(target).is_some() {
                    return Err(MoveError::BlockedByOtherMonster);
                }
                if self.registry.hero_at(target).is_some() {
                    return Err(MoveError::BlockedByHero);
                }
            }
        }

        Ok(target)
    }

    fn validate_teleport(&self, hero: HeroId, target: HeroId) -> Result<Cell, TeleportError> {
        let current = self
            .registry
            .position_of(PieceId::Hero(hero))
            .ok_or(TeleportError::NotPlaced)?;
        let anchor = self
            .registry
            .position_of(PieceId::Hero(target))
            .ok_or(TeleportError::NotPlaced)?;

        let current_lane = self.board.lane_index_of(current.column());
        let target_lane = self.board.lane_index_of(anchor.column());
        if current_lane == target_lane {
            return Err(TeleportError::SameLane);
        }
        let Some(target_lane) = target_lane else {
            return Err(TeleportError::NoValidDestination);
        };

        // Deterministic scan: lane columns west to east, then increasing
        // row. Rows north of the anchor are excluded so the jumper never
        // lands closer to the monster nexus than the target.
        for column in self.board.lane_columns(target_lane) {
            for row in anchor.row()..=anchor.row() + 1 {
                let candidate = Cell::new(column, row);
                if !candidate.is_adjacent(anchor) {
                    continue;
                }
                if !self.board.is_accessible(candidate) {
                    continue;
                }
                if self.registry.hero_at(candidate).is_some()
                    || self.registry.monster_at(candidate).is_some()
                {
                    continue;
                }
                return Ok(candidate);
            }
        }

        Err(TeleportError::NoValidDestination)
    }

    fn validate_recall(&self, hero: HeroId) -> Result<Cell, RecallError> {
        let lane = self.hero(hero).lane.ok_or(RecallError::NoLaneAssigned)?;
        Ok(self.board.hero_spawn_cell(lane))
    }

    fn validate_obstacle(&self, piece: PieceId, direction: Direction) -> Result<Cell, ObstacleError> {
        let current = self
            .registry
            .position_of(piece)
            .ok_or(ObstacleError::NotPlaced)?;
        let target = current.step(direction).ok_or(ObstacleError::OutOfBounds)?;
        let tile = self
            .board
            .try_tile(target)
            .ok_or(ObstacleError::OutOfBounds)?;
        if tile.kind() != TileKind::Obstacle {
            return Err(ObstacleError::NotAnObstacle);
        }
        Ok(target)
    }

    fn reseat_party(&mut self) {
        let placements: Vec<(HeroId, Option<LaneId>)> = self
            .heroes
            .iter()
            .map(|hero| (hero.id, hero.lane))
            .collect();
        for (hero, lane) in placements {
            if let Some(lane) = lane {
                let cell = self.board.hero_spawn_cell(lane);
                self.place_piece(PieceId::Hero(hero), cell);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rule violations are reported through rejection events on `out_events`;
/// invariant violations such as unknown piece identifiers panic because they
/// indicate a caller bug.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { config, seed } => {
            let mut rng = SplitMix64::new(seed);
            world.board = Board::generate(&config, &mut rng);
            world.board_config = config;
            for monster in std::mem::take(&mut world.monsters) {
                world.registry.forget_monster(monster.id);
            }
            world.reseat_party();
            out_events.push(Event::BoardConfigured {
                size: world.board.size(),
            });
        }
        Command::EnlistHero {
            name,
            lane,
            max_hit_points,
            max_mana,
            level,
        } => {
            let hero = HeroId::new(world.heroes.len() as u32);
            let cell = world.board.hero_spawn_cell(lane);
            world.heroes.push(Hero {
                id: hero,
                name,
                cell,
                lane: Some(lane),
                hit_points: max_hit_points,
                max_hit_points,
                mana: max_mana,
                max_mana,
                level,
                alive: true,
            });
            world.place_piece(PieceId::Hero(hero), cell);
            out_events.push(Event::HeroEnlisted { hero, lane, cell });
        }
        Command::MovePiece { piece, direction } => match world.validate_move(piece, direction) {
            Ok(target) => {
                let from = world
                    .registry
                    .position_of(piece)
                    .unwrap_or_else(|| panic!("validated piece lost its position: {piece:?}"));
                world.place_piece(piece, target);
                out_events.push(Event::PieceMoved {
                    piece,
                    from,
                    to: target,
                });
            }
            Err(reason) => out_events.push(Event::MoveRejected {
                piece,
                direction,
                reason,
            }),
        },
        Command::TeleportHero { hero, target } => match world.validate_teleport(hero, target) {
            Ok(destination) => {
                let from = world
                    .registry
                    .position_of(PieceId::Hero(hero))
                    .unwrap_or_else(|| panic!("validated hero lost its position: {hero:?}"));
                world.place_piece(PieceId::Hero(hero), destination);
                out_events.push(Event::HeroTeleported {
                    hero,
                    from,
                    to: destination,
                });
            }
            Err(reason) => out_events.push(Event::TeleportRejected {
                hero,
                target,
                reason,
            }),
        },
        Command::RecallHero { hero } => match world.validate_recall(hero) {
            Ok(cell) => {
                world.place_piece(PieceId::Hero(hero), cell);
                out_events.push(Event::HeroRecalled { hero, cell });
            }
            Err(reason) => out_events.push(Event::RecallRejected { hero, reason }),
        },
        Command::RemoveObstacle { piece, direction } => {
            match world.validate_obstacle(piece, direction) {
                Ok(cell) => {
                    let cleared = world.board.clear_obstacle(cell);
                    debug_assert!(cleared, "validated obstacle must clear");
                    out_events.push(Event::ObstacleCleared { cell });
                }
                Err(reason) => out_events.push(Event::ObstacleRejected { piece, reason }),
            }
        }
        Command::SpawnMonster { lane, kind, level } => {
            let cell = world.board.monster_spawn_cell(lane);
            // Anti-stacking policy: a spawn onto an occupied nexus cell is
            // silently dropped, not reported.
            if world.registry.hero_at(cell).is_some() || world.registry.monster_at(cell).is_some() {
                return;
            }
            let monster = MonsterId::new(world.next_monster);
            world.next_monster += 1;
            let max_hit_points = kind.hit_points_for(level);
            world.monsters.push(Monster {
                id: monster,
                kind,
                level,
                lane,
                cell,
                hit_points: max_hit_points,
                max_hit_points,
                alive: true,
            });
            world.place_piece(PieceId::Monster(monster), cell);
            out_events.push(Event::MonsterSpawned {
                monster,
                kind,
                level,
                lane,
                cell,
            });
        }
        Command::ApplyDamage { target, amount } => match target {
            PieceId::Hero(hero) => {
                let entry = world.hero_mut(hero);
                entry.hit_points = entry.hit_points.saturating_sub(amount);
                let remaining = entry.hit_points;
                let fell = entry.alive && remaining == 0;
                if fell {
                    entry.alive = false;
                }
                out_events.push(Event::DamageApplied {
                    target,
                    amount,
                    remaining,
                });
                if fell {
                    out_events.push(Event::HeroDown { hero });
                }
            }
            PieceId::Monster(monster) => {
                let entry = world.monster_mut(monster);
                entry.hit_points = entry.hit_points.saturating_sub(amount);
                if entry.hit_points == 0 {
                    entry.alive = false;
                }
                let remaining = entry.hit_points;
                out_events.push(Event::DamageApplied {
                    target,
                    amount,
                    remaining,
                });
            }
        },
        Command::PurgeDefeated => {
            let defeated: Vec<Monster> = world
                .monsters
                .iter()
                .copied()
                .filter(|monster| !monster.alive)
                .collect();
            world.monsters.retain(|monster| monster.alive);
            for monster in defeated {
                world.registry.forget_monster(monster.id);
                out_events.push(Event::MonsterDown {
                    monster: monster.id,
                    kind: monster.kind,
                    level: monster.level,
                });
            }
        }
        Command::ReviveHero { hero } => {
            let entry = world.hero_mut(hero);
            entry.hit_points = entry.max_hit_points;
            entry.mana = entry.max_mana;
            entry.alive = true;
            let lane = entry
                .lane
                .unwrap_or_else(|| panic!("revived hero {hero:?} has no lane binding"));
            let cell = world.board.hero_spawn_cell(lane);
            world.place_piece(PieceId::Hero(hero), cell);
            out_events.push(Event::HeroRevived { hero, cell });
        }
        Command::RestoreVitals {
            hero,
            hit_points,
            mana,
        } => {
            let entry = world.hero_mut(hero);
            entry.hit_points = entry.hit_points.saturating_add(hit_points).min(entry.max_hit_points);
            entry.mana = entry.mana.saturating_add(mana).min(entry.max_mana);
            out_events.push(Event::VitalsRestored {
                hero,
                hit_points: entry.hit_points,
                mana: entry.mana,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Board, World};
    use valor_core::{
        Cell, HeroId, HeroSnapshot, HeroView, MonsterId, MonsterSnapshot, MonsterView, PieceId,
        PieceKind, Positioned, StatAxis, TileFeature, Victory,
    };

    /// Provides read-only access to the board topology and tiles.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Captures a read-only view of the hero party, in party order.
    #[must_use]
    pub fn hero_view(world: &World) -> HeroView {
        let snapshots: Vec<HeroSnapshot> = world
            .heroes
            .iter()
            .map(|hero| HeroSnapshot {
                id: hero.id,
                name: hero.name.clone(),
                cell: hero.cell,
                lane: hero.lane,
                hit_points: hero.hit_points,
                max_hit_points: hero.max_hit_points,
                mana: hero.mana,
                max_mana: hero.max_mana,
                level: hero.level,
                alive: hero.alive,
            })
            .collect();
        HeroView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every monster, in spawn order.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        let snapshots: Vec<MonsterSnapshot> = world
            .monsters
            .iter()
            .map(|monster| MonsterSnapshot {
                id: monster.id,
                kind: monster.kind,
                level: monster.level,
                cell: monster.cell,
                lane: monster.lane,
                hit_points: monster.hit_points,
                max_hit_points: monster.max_hit_points,
                alive: monster.alive,
            })
            .collect();
        MonsterView::from_snapshots(snapshots)
    }

    /// Registry position of a piece, or `None` if it was never placed.
    #[must_use]
    pub fn position_of(world: &World, piece: PieceId) -> Option<Cell> {
        world.registry.position_of(piece)
    }

    /// Piece of the requested kind occupying the cell, if any.
    #[must_use]
    pub fn piece_at(world: &World, cell: Cell, kind: PieceKind) -> Option<PieceId> {
        match kind {
            PieceKind::Hero => world.registry.hero_at(cell).map(PieceId::Hero),
            PieceKind::Monster => world.registry.monster_at(cell).map(PieceId::Monster),
        }
    }

    /// Evaluates the victory conditions against the current state.
    ///
    /// Heroes win when any hero stands on the monster nexus row. Monsters
    /// win when any alive monster stands on the hero nexus row, or when the
    /// whole party is dead.
    #[must_use]
    pub fn victory(world: &World) -> Option<Victory> {
        let monster_row = world.board.monster_nexus_row();
        if world
            .heroes
            .iter()
            .any(|hero| hero.cell.row() == monster_row)
        {
            return Some(Victory::Heroes);
        }

        let hero_row = world.board.hero_nexus_row();
        if world
            .monsters
            .iter()
            .any(|monster| monster.alive && monster.cell.row() == hero_row)
        {
            return Some(Victory::Monsters);
        }
        if !world.heroes.is_empty() && world.heroes.iter().all(|hero| !hero.alive) {
            return Some(Victory::Monsters);
        }

        None
    }

    /// Stat multiplier granted by the terrain under the provided cell.
    ///
    /// Neutral 1.0 unless the tile carries a bonus matching the axis. This
    /// is a pure query; no piece stat is ever mutated by standing on
    /// terrain, so consumers multiply their base stat at the moment of
    /// calculation.
    #[must_use]
    pub fn terrain_multiplier(world: &World, cell: Cell, axis: StatAxis) -> f32 {
        match world.board.try_tile(cell).and_then(|tile| tile.feature()) {
            Some(TileFeature::Terrain(bonus)) => bonus.multiplier_for(axis),
            _ => 1.0,
        }
    }

    fn alive_adjacent<'a, T: Positioned + 'a>(
        pieces: impl Iterator<Item = &'a T>,
        cell: Cell,
    ) -> impl Iterator<Item = &'a T> {
        pieces.filter(move |piece| piece.is_alive() && piece.position().is_adjacent(cell))
    }

    /// Alive monsters within eight-directional attack range of the cell.
    #[must_use]
    pub fn monsters_in_range(world: &World, cell: Cell) -> Vec<MonsterId> {
        alive_adjacent(world.monsters.iter(), cell)
            .map(|monster| monster.id)
            .collect()
    }

    /// Alive heroes within eight-directional attack range of the cell.
    #[must_use]
    pub fn heroes_in_range(world: &World, cell: Cell) -> Vec<HeroId> {
        alive_adjacent(world.heroes.iter(), cell)
            .map(|hero| hero.id)
            .collect()
    }

    /// Reports whether the hero stands on a nexus cell with market access.
    #[must_use]
    pub fn standing_on_market(world: &World, hero: HeroId) -> bool {
        let cell = world.hero(hero).cell;
        matches!(
            world.board.try_tile(cell).and_then(|tile| tile.feature()),
            Some(TileFeature::Nexus(marker)) if marker.has_market()
        )
    }
}

/// Test-only hooks for forcing board layouts in scenario suites.
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffolding {
    use super::World;
    use valor_core::{Cell, TileKind};

    /// Overwrites a tile with the provided kind and its matching feature.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the board.
    pub fn force_tile(world: &mut World, cell: Cell, kind: TileKind) {
        let fraction = world.board_config.bonus_fraction;
        world.board.force_tile(cell, kind, fraction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_core::{TerrainMix, Victory};

    fn plain_config() -> BoardConfig {
        BoardConfig {
            terrain_mix: TerrainMix::all_plain(),
            ..BoardConfig::default()
        }
    }

    fn plain_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBoard {
                config: plain_config(),
                seed: 1,
            },
            &mut events,
        );
        world
    }

    fn enlist(world: &mut World, name: &str, lane: u8) -> HeroId {
        let mut events = Vec::new();
        apply(
            world,
            Command::EnlistHero {
                name: name.to_owned(),
                lane: LaneId::new(lane),
                max_hit_points: 100,
                max_mana: 50,
                level: 1,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::HeroEnlisted { hero, .. }] => *hero,
            other => panic!("unexpected enlist events: {other:?}"),
        }
    }

    fn spawn(world: &mut World, lane: u8) -> Option<MonsterId> {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnMonster {
                lane: LaneId::new(lane),
                kind: MonsterKind::Dragon,
                level: 1,
            },
            &mut events,
        );
        events.iter().find_map(|event| match event {
            Event::MonsterSpawned { monster, .. } => Some(*monster),
            _ => None,
        })
    }

    #[test]
    fn enlisted_hero_lands_on_its_lane_nexus() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 1);
        assert_eq!(
            query::position_of(&world, PieceId::Hero(hero)),
            Some(Cell::new(3, 7))
        );
    }

    #[test]
    fn placement_keeps_registry_and_piece_field_in_step() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePiece {
                piece: PieceId::Hero(hero),
                direction: Direction::North,
            },
            &mut events,
        );

        let registry_cell = query::position_of(&world, PieceId::Hero(hero));
        let snapshot_cell = query::hero_view(&world)
            .get(hero)
            .map(|snapshot| snapshot.cell);
        assert_eq!(registry_cell, Some(Cell::new(0, 6)));
        assert_eq!(registry_cell, snapshot_cell);
    }

    #[test]
    fn hero_cannot_enter_a_wall_column() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePiece {
                piece: PieceId::Hero(hero),
                direction: Direction::East,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MovePiece {
                piece: PieceId::Hero(hero),
                direction: Direction::East,
            },
            &mut events,
        );

        assert!(matches!(
            events.last(),
            Some(Event::MoveRejected {
                reason: MoveError::Inaccessible,
                ..
            })
        ));
        assert_eq!(
            query::position_of(&world, PieceId::Hero(hero)),
            Some(Cell::new(1, 7))
        );
    }

    #[test]
    fn unplaced_piece_movement_is_rejected_not_fatal() {
        let mut world = plain_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePiece {
                piece: PieceId::Monster(MonsterId::new(99)),
                direction: Direction::South,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::MoveRejected {
                piece: PieceId::Monster(MonsterId::new(99)),
                direction: Direction::South,
                reason: MoveError::NotPlaced,
            }]
        );
    }

    #[test]
    fn spawn_anti_stacking_drops_the_second_monster_silently() {
        let mut world = plain_world();
        let first = spawn(&mut world, 0);
        let second = spawn(&mut world, 0);

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(query::monster_view(&world).into_vec().len(), 1);
        assert_eq!(
            query::position_of(&world, PieceId::Monster(first.expect("spawned"))),
            Some(Cell::new(1, 0))
        );
    }

    #[test]
    fn recall_rejects_heroes_without_a_lane() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 2);
        world.hero_mut(hero).lane = None;

        let mut events = Vec::new();
        apply(&mut world, Command::RecallHero { hero }, &mut events);
        assert_eq!(
            events,
            vec![Event::RecallRejected {
                hero,
                reason: RecallError::NoLaneAssigned,
            }]
        );
    }

    #[test]
    fn damage_marks_heroes_down_and_purge_removes_monsters() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 0);
        let monster = spawn(&mut world, 1).expect("spawned");

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyDamage {
                target: PieceId::Hero(hero),
                amount: 150,
            },
            &mut events,
        );
        assert!(events.contains(&Event::HeroDown { hero }));

        events.clear();
        apply(
            &mut world,
            Command::ApplyDamage {
                target: PieceId::Monster(monster),
                amount: 500,
            },
            &mut events,
        );
        apply(&mut world, Command::PurgeDefeated, &mut events);

        assert!(events.iter().any(|event| matches!(
            event,
            Event::MonsterDown { monster: down, .. } if *down == monster
        )));
        assert_eq!(
            query::position_of(&world, PieceId::Monster(monster)),
            None,
            "purged monster entry must be deleted, not marked"
        );
        assert!(query::monster_view(&world).into_vec().is_empty());
    }

    #[test]
    fn revive_restores_vitals_and_reuses_the_recall_placement() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 1);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyDamage {
                target: PieceId::Hero(hero),
                amount: 150,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MovePiece {
                piece: PieceId::Hero(hero),
                direction: Direction::North,
            },
            &mut events,
        );

        events.clear();
        apply(&mut world, Command::ReviveHero { hero }, &mut events);

        let snapshot = query::hero_view(&world).get(hero).cloned().expect("hero");
        assert!(snapshot.alive);
        assert_eq!(snapshot.hit_points, snapshot.max_hit_points);
        assert_eq!(snapshot.mana, snapshot.max_mana);
        assert_eq!(snapshot.cell, Cell::new(3, 7));
    }

    #[test]
    fn restore_vitals_clamps_to_maximums() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyDamage {
                target: PieceId::Hero(hero),
                amount: 30,
            },
            &mut events,
        );

        events.clear();
        apply(
            &mut world,
            Command::RestoreVitals {
                hero,
                hit_points: 500,
                mana: 500,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::VitalsRestored {
                hero,
                hit_points: 100,
                mana: 50,
            }]
        );
    }

    #[test]
    fn victory_requires_an_alive_monster_on_the_hero_row() {
        let mut world = plain_world();
        let _hero = enlist(&mut world, "Aria", 0);
        let monster = spawn(&mut world, 1).expect("spawned");
        let mut events = Vec::new();
        for _ in 0..7 {
            apply(
                &mut world,
                Command::MovePiece {
                    piece: PieceId::Monster(monster),
                    direction: Direction::South,
                },
                &mut events,
            );
        }
        assert_eq!(query::victory(&world), Some(Victory::Monsters));
    }

    #[test]
    fn all_heroes_dead_is_a_monster_victory() {
        let mut world = plain_world();
        let hero = enlist(&mut world, "Aria", 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyDamage {
                target: PieceId::Hero(hero),
                amount: 1_000,
            },
            &mut events,
        );
        assert_eq!(query::victory(&world), Some(Victory::Monsters));
    }

    #[test]
    fn terrain_multiplier_is_a_pure_query() {
        let world = World::new();
        let board = query::board(&world);
        let mut koulou = None;
        for column in 0..8 {
            for row in 0..8 {
                let cell = Cell::new(column, row);
                if board.tile(cell).kind() == TileKind::Koulou {
                    koulou = Some(cell);
                }
            }
        }
        let cell = koulou.expect("default mix produces koulou terrain");

        let strength =
            query::terrain_multiplier(&world, cell, valor_core::StatAxis::Strength);
        let agility = query::terrain_multiplier(&world, cell, valor_core::StatAxis::Agility);
        assert!((strength - 1.10).abs() < f32::EPSILON);
        assert!((agility - 1.0).abs() < f32::EPSILON);
    }
}
