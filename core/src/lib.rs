#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Legends of Valor engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Rule violations travel as
//! rejection events carrying a reason enum; they are expected outcomes of
//! play, never panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of lanes carved into the board.
pub const LANE_COUNT: usize = 3;

/// Unique identifier assigned to a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroId(u32);

impl HeroId {
    /// Creates a new hero identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a lane within the board, counted from the west edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(u8);

impl LaneId {
    /// Creates a new lane identifier with the provided index.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based lane index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Position of the lane identifier within lane-indexed arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifies either side of the board's piece roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// A member of the hero party.
    Hero,
    /// A monster advancing down a lane.
    Monster,
}

/// Identifier for any positioned piece, hero or monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceId {
    /// A hero identified by its party id.
    Hero(HeroId),
    /// A monster identified by its spawn id.
    Monster(MonsterId),
}

impl PieceId {
    /// Reports which roster the piece belongs to.
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        match self {
            Self::Hero(_) => PieceKind::Hero,
            Self::Monster(_) => PieceKind::Monster,
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// Row zero is the monster nexus at the north edge; rows grow southward
/// toward the hero nexus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: u32,
    row: u32,
}

impl Cell {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: Cell) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Reports whether two cells are within eight-directional attack range.
    ///
    /// A piece is considered in range of the cell it stands on.
    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.chebyshev_distance(other) <= 1
    }

    /// Returns the neighbouring cell in the provided direction.
    ///
    /// Yields `None` when the step would cross the north or west board edge;
    /// the south and east edges are bounded by the board itself.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Cell> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| Cell::new(self.column, row)),
            Direction::South => Some(Cell::new(self.column, self.row + 1)),
            Direction::East => Some(Cell::new(self.column + 1, self.row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Cell::new(column, self.row)),
        }
    }
}

/// Cardinal movement directions available to pieces.
///
/// North points at the monster nexus, south at the hero nexus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Discrete terrain classification applied to a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Spawn row cell belonging to one of the nexuses.
    Nexus,
    /// Featureless traversable ground.
    Plain,
    /// Bush terrain granting a dexterity bonus.
    Bush,
    /// Cave terrain granting an agility bonus.
    Cave,
    /// Koulou terrain granting a strength bonus.
    Koulou,
    /// Traversal-blocking debris that can be cleared by an adjacent piece.
    Obstacle,
    /// Wall cell that is permanently inaccessible.
    Inaccessible,
}

impl TileKind {
    /// Reports whether a piece may stand on a cell of this kind.
    #[must_use]
    pub const fn is_traversable(&self) -> bool {
        !matches!(self, Self::Inaccessible | Self::Obstacle)
    }
}

/// Combat stat axis that terrain bonuses can amplify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatAxis {
    /// Physical attack stat.
    Strength,
    /// Dodge and ranged accuracy stat.
    Dexterity,
    /// Evasion stat.
    Agility,
}

/// Multiplicative stat bonus carried by a terrain cell.
///
/// Exactly one axis is boosted per terrain kind. The bonus is a pure query
/// value; standing on terrain never mutates a piece's stored stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerrainBonus {
    /// Strength multiplier granted by koulou terrain.
    Strength(f32),
    /// Dexterity multiplier granted by bush terrain.
    Dexterity(f32),
    /// Agility multiplier granted by cave terrain.
    Agility(f32),
}

impl TerrainBonus {
    /// Derives the bonus carried by the provided terrain kind, if any.
    #[must_use]
    pub fn for_terrain(kind: TileKind, fraction: f32) -> Option<Self> {
        match kind {
            TileKind::Koulou => Some(Self::Strength(fraction)),
            TileKind::Bush => Some(Self::Dexterity(fraction)),
            TileKind::Cave => Some(Self::Agility(fraction)),
            _ => None,
        }
    }

    /// Stat axis amplified by this bonus.
    #[must_use]
    pub const fn axis(&self) -> StatAxis {
        match self {
            Self::Strength(_) => StatAxis::Strength,
            Self::Dexterity(_) => StatAxis::Dexterity,
            Self::Agility(_) => StatAxis::Agility,
        }
    }

    /// Bonus fraction added on top of the neutral 1.0 multiplier.
    #[must_use]
    pub const fn fraction(&self) -> f32 {
        match self {
            Self::Strength(value) | Self::Dexterity(value) | Self::Agility(value) => *value,
        }
    }

    /// Multiplier applied to the provided stat axis.
    ///
    /// Axes the bonus does not cover multiply by exactly 1.0.
    #[must_use]
    pub fn multiplier_for(&self, axis: StatAxis) -> f32 {
        if self.axis() == axis {
            1.0 + self.fraction()
        } else {
            1.0
        }
    }
}

/// Marks a nexus cell and records which side owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NexusMarker {
    side: NexusSide,
    lane: LaneId,
    market: bool,
}

impl NexusMarker {
    /// Creates a nexus marker for the provided side and lane.
    #[must_use]
    pub const fn new(side: NexusSide, lane: LaneId, market: bool) -> Self {
        Self { side, lane, market }
    }

    /// Side of the board that owns the nexus.
    #[must_use]
    pub const fn side(&self) -> NexusSide {
        self.side
    }

    /// Lane the nexus cell belongs to.
    #[must_use]
    pub const fn lane(&self) -> LaneId {
        self.lane
    }

    /// Reports whether a market is reachable from this nexus cell.
    #[must_use]
    pub const fn has_market(&self) -> bool {
        self.market
    }
}

/// Side of the board a nexus row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NexusSide {
    /// Hero home row at the south edge.
    Hero,
    /// Monster spawn row at the north edge.
    Monster,
}

/// Optional feature attached to a board cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TileFeature {
    /// Terrain stat bonus for pieces standing on the cell.
    Terrain(TerrainBonus),
    /// Nexus marker for spawn rows.
    Nexus(NexusMarker),
}

/// Species of monster that can spawn at a monster nexus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Heavy bruiser with the largest health pool.
    Dragon,
    /// Armoured skirmisher.
    Exoskeleton,
    /// Evasive caster.
    Spirit,
}

impl MonsterKind {
    /// All spawnable kinds, in template order.
    pub const ALL: [MonsterKind; 3] = [
        MonsterKind::Dragon,
        MonsterKind::Exoskeleton,
        MonsterKind::Spirit,
    ];

    /// Hit points granted to a freshly spawned monster of this kind.
    #[must_use]
    pub fn hit_points_for(self, level: u32) -> u32 {
        let base = match self {
            Self::Dragon => 120,
            Self::Exoskeleton => 110,
            Self::Spirit => 100,
        };
        level.saturating_mul(base)
    }
}

/// Terrain distribution ratios applied to each lane interior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainMix {
    /// Fraction of interior cells assigned bush terrain.
    pub bush: f32,
    /// Fraction of interior cells assigned cave terrain.
    pub cave: f32,
    /// Fraction of interior cells assigned koulou terrain.
    pub koulou: f32,
    /// Fraction of interior cells assigned obstacles.
    pub obstacle: f32,
}

impl Default for TerrainMix {
    fn default() -> Self {
        Self {
            bush: 0.20,
            cave: 0.20,
            koulou: 0.20,
            obstacle: 0.10,
        }
    }
}

impl TerrainMix {
    /// A mix that fills every interior cell with plain ground.
    #[must_use]
    pub const fn all_plain() -> Self {
        Self {
            bush: 0.0,
            cave: 0.0,
            koulou: 0.0,
            obstacle: 0.0,
        }
    }
}

/// Static topology and terrain parameters used to generate a board.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    /// Side length of the square board.
    pub size: u32,
    /// West and east column of each lane, in lane order.
    pub lane_columns: [[u32; 2]; LANE_COUNT],
    /// Permanently inaccessible columns separating the lanes.
    pub wall_columns: [u32; 2],
    /// Terrain distribution applied independently per lane.
    pub terrain_mix: TerrainMix,
    /// Bonus fraction carried by every terrain cell.
    pub bonus_fraction: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 8,
            lane_columns: [[0, 1], [3, 4], [6, 7]],
            wall_columns: [2, 5],
            terrain_mix: TerrainMix::default(),
            bonus_fraction: 0.10,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the board from the provided topology and seed.
    ConfigureBoard {
        /// Topology and terrain parameters for the new board.
        config: BoardConfig,
        /// Seed driving the per-lane terrain shuffle.
        seed: u64,
    },
    /// Adds a hero to the party and places it at its lane nexus.
    EnlistHero {
        /// Display name shown by adapters.
        name: String,
        /// Lane the hero is bound to until re-enlisted.
        lane: LaneId,
        /// Maximum hit points granted at enlistment.
        max_hit_points: u32,
        /// Maximum mana granted at enlistment.
        max_mana: u32,
        /// Experience level used by external reward math.
        level: u32,
    },
    /// Requests that a piece advance a single step in a direction.
    MovePiece {
        /// Piece attempting to move.
        piece: PieceId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests a cross-lane teleport beside another hero.
    TeleportHero {
        /// Hero attempting the teleport.
        hero: HeroId,
        /// Hero whose lane is being joined.
        target: HeroId,
    },
    /// Returns a hero to its bound lane's nexus spawn cell.
    RecallHero {
        /// Hero being recalled.
        hero: HeroId,
    },
    /// Requests clearing of an obstacle adjacent to a piece.
    RemoveObstacle {
        /// Piece performing the clearing action.
        piece: PieceId,
        /// Direction from the piece to the obstacle cell.
        direction: Direction,
    },
    /// Spawns a monster at a lane's monster nexus cell.
    SpawnMonster {
        /// Lane receiving the monster.
        lane: LaneId,
        /// Species template for the monster.
        kind: MonsterKind,
        /// Level scaling the monster's hit points.
        level: u32,
    },
    /// Applies damage computed by the external combat layer.
    ApplyDamage {
        /// Piece receiving the damage.
        target: PieceId,
        /// Hit points to subtract, saturating at zero.
        amount: u32,
    },
    /// Deletes every defeated monster from the roster and registry.
    PurgeDefeated,
    /// Revives a dead hero at full vitals and recalls it to its nexus.
    ReviveHero {
        /// Hero being revived.
        hero: HeroId,
    },
    /// Restores a hero's vitals by the provided clamped amounts.
    RestoreVitals {
        /// Hero recovering vitals.
        hero: HeroId,
        /// Hit points regained, clamped to the hero's maximum.
        hit_points: u32,
        /// Mana regained, clamped to the hero's maximum.
        mana: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the board was regenerated.
    BoardConfigured {
        /// Side length of the new board.
        size: u32,
    },
    /// Confirms that a hero joined the party.
    HeroEnlisted {
        /// Identifier assigned to the hero.
        hero: HeroId,
        /// Lane the hero is bound to.
        lane: LaneId,
        /// Nexus cell the hero occupies after placement.
        cell: Cell,
    },
    /// Confirms that a piece advanced by one cell.
    PieceMoved {
        /// Piece that moved.
        piece: PieceId,
        /// Cell the piece occupied before the step.
        from: Cell,
        /// Cell the piece occupies after the step.
        to: Cell,
    },
    /// Reports that a movement request was rejected.
    MoveRejected {
        /// Piece whose movement was rejected.
        piece: PieceId,
        /// Direction that was requested.
        direction: Direction,
        /// Specific rule the request violated.
        reason: MoveError,
    },
    /// Confirms that a hero teleported beside another hero.
    HeroTeleported {
        /// Hero that teleported.
        hero: HeroId,
        /// Cell the hero occupied before the jump.
        from: Cell,
        /// Cell the hero occupies after the jump.
        to: Cell,
    },
    /// Reports that a teleport request was rejected.
    TeleportRejected {
        /// Hero whose teleport was rejected.
        hero: HeroId,
        /// Hero that was targeted.
        target: HeroId,
        /// Specific rule the request violated.
        reason: TeleportError,
    },
    /// Confirms that a hero returned to its lane nexus.
    HeroRecalled {
        /// Hero that was recalled.
        hero: HeroId,
        /// Nexus cell the hero now occupies.
        cell: Cell,
    },
    /// Reports that a recall request was rejected.
    RecallRejected {
        /// Hero whose recall was rejected.
        hero: HeroId,
        /// Specific rule the request violated.
        reason: RecallError,
    },
    /// Confirms that an obstacle was cleared to plain ground.
    ObstacleCleared {
        /// Cell that held the obstacle.
        cell: Cell,
    },
    /// Reports that an obstacle-clearing request was rejected.
    ObstacleRejected {
        /// Piece that attempted the clearing.
        piece: PieceId,
        /// Specific rule the request violated.
        reason: ObstacleError,
    },
    /// Confirms that a monster spawned at a lane nexus.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Species template used for the spawn.
        kind: MonsterKind,
        /// Level scaling the monster's hit points.
        level: u32,
        /// Lane the monster spawned into.
        lane: LaneId,
        /// Nexus cell the monster occupies.
        cell: Cell,
    },
    /// Confirms that damage was applied to a piece.
    DamageApplied {
        /// Piece that received the damage.
        target: PieceId,
        /// Hit points subtracted.
        amount: u32,
        /// Hit points remaining after the hit.
        remaining: u32,
    },
    /// Announces that a hero's hit points reached zero.
    HeroDown {
        /// Hero that fell.
        hero: HeroId,
    },
    /// Announces that a defeated monster left the board.
    MonsterDown {
        /// Monster that was purged.
        monster: MonsterId,
        /// Species the monster belonged to.
        kind: MonsterKind,
        /// Level of the purged monster, for external reward math.
        level: u32,
    },
    /// Confirms that a hero was revived at its lane nexus.
    HeroRevived {
        /// Hero that was revived.
        hero: HeroId,
        /// Nexus cell the hero now occupies.
        cell: Cell,
    },
    /// Confirms that a hero recovered vitals.
    VitalsRestored {
        /// Hero that recovered.
        hero: HeroId,
        /// Hit points after the recovery, clamped to maximum.
        hit_points: u32,
        /// Mana after the recovery, clamped to maximum.
        mana: u32,
    },
}

/// Reasons a movement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// The piece has never been placed on the board.
    #[error("piece has never been placed on the board")]
    NotPlaced,
    /// The destination cell is outside the board or not traversable.
    #[error("destination cell is not accessible")]
    Inaccessible,
    /// Another hero already occupies the destination cell.
    #[error("destination cell is held by another hero")]
    BlockedByHero,
    /// A monster occupies the destination or guards the traversed column.
    #[error("an undefeated monster blocks the path")]
    BlockedByMonster,
    /// Another monster already occupies the destination cell.
    #[error("destination cell is held by another monster")]
    BlockedByOtherMonster,
}

/// Reasons a teleport request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum TeleportError {
    /// The hero or its target has never been placed on the board.
    #[error("hero has never been placed on the board")]
    NotPlaced,
    /// Both heroes already share a lane; teleport is cross-lane only.
    #[error("teleport target is in the same lane")]
    SameLane,
    /// No accessible, unoccupied cell beside the target satisfies the rules.
    #[error("no valid teleport destination beside the target")]
    NoValidDestination,
}

/// Reasons a recall request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RecallError {
    /// The hero was never bound to a lane by a placement.
    #[error("hero has no lane assignment")]
    NoLaneAssigned,
}

/// Reasons an obstacle-clearing request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ObstacleError {
    /// The piece has never been placed on the board.
    #[error("piece has never been placed on the board")]
    NotPlaced,
    /// The targeted cell lies outside the board.
    #[error("targeted cell is outside the board")]
    OutOfBounds,
    /// The targeted cell does not hold an obstacle.
    #[error("targeted cell does not hold an obstacle")]
    NotAnObstacle,
}

/// Terminal outcome of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Victory {
    /// A hero reached the monster nexus row.
    Heroes,
    /// An alive monster reached the hero nexus row, or the party fell.
    Monsters,
}

/// Immutable representation of a single hero's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Unique identifier assigned to the hero.
    pub id: HeroId,
    /// Display name shown by adapters.
    pub name: String,
    /// Board cell currently occupied by the hero.
    pub cell: Cell,
    /// Lane the hero is bound to, if ever placed at a nexus.
    pub lane: Option<LaneId>,
    /// Current hit points.
    pub hit_points: u32,
    /// Maximum hit points.
    pub max_hit_points: u32,
    /// Current mana.
    pub mana: u32,
    /// Maximum mana.
    pub max_mana: u32,
    /// Experience level used by external reward math.
    pub level: u32,
    /// Reports whether the hero is currently alive.
    pub alive: bool,
}

/// Read-only snapshot describing the whole hero party.
#[derive(Clone, Debug, Default)]
pub struct HeroView {
    snapshots: Vec<HeroSnapshot>,
}

impl HeroView {
    /// Creates a new hero view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HeroSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured hero snapshots in party order.
    pub fn iter(&self) -> impl Iterator<Item = &HeroSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single hero snapshot by identifier.
    #[must_use]
    pub fn get(&self, hero: HeroId) -> Option<&HeroSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == hero)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HeroSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single monster's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Unique identifier assigned to the monster.
    pub id: MonsterId,
    /// Species template the monster spawned from.
    pub kind: MonsterKind,
    /// Level scaling the monster's hit points.
    pub level: u32,
    /// Board cell currently occupied by the monster.
    pub cell: Cell,
    /// Lane the monster spawned into.
    pub lane: LaneId,
    /// Current hit points.
    pub hit_points: u32,
    /// Maximum hit points.
    pub max_hit_points: u32,
    /// Reports whether the monster still fights; dead monsters await purge.
    pub alive: bool,
}

/// Read-only snapshot describing every monster on the board.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured monster snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single monster snapshot by identifier.
    #[must_use]
    pub fn get(&self, monster: MonsterId) -> Option<&MonsterSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.id == monster)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Capability shared by every positioned, living piece on the board.
pub trait Positioned {
    /// Board cell the piece currently occupies.
    fn position(&self) -> Cell;

    /// Reports whether the piece is currently alive.
    fn is_alive(&self) -> bool;
}

impl Positioned for HeroSnapshot {
    fn position(&self) -> Cell {
        self.cell
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Positioned for MonsterSnapshot {
    fn position(&self) -> Cell {
        self.cell
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Injectable source of randomness for boards, spawns, and target picks.
///
/// Every stochastic decision in the engine draws from this port so that
/// tests can substitute a deterministic stream.
pub trait Rng {
    /// Produces the next raw 64-bit value in the stream.
    fn next_u64(&mut self) -> u64;

    /// Produces a value uniformly distributed in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
        let value = self.next_u64() >> 11;
        (value as f64) * SCALE
    }

    /// Produces an index uniformly distributed in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics when `bound` is zero; callers pick from non-empty sets.
    fn next_index(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "next_index requires a non-zero bound");
        (self.next_u64() % bound as u64) as usize
    }

    /// Shuffles the provided slice in place with a Fisher-Yates pass.
    ///
    /// Sized-only so the trait stays usable as `&mut dyn Rng`; callers that
    /// shuffle take the concrete stream.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for index in (1..items.len()).rev() {
            let swap_index = self.next_index(index + 1);
            items.swap(index, swap_index);
        }
    }
}

/// Deterministic splitmix64 stream used as the default [`Rng`] source.
#[derive(Clone, Copy, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a new stream seeded with the provided value.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }
}

impl Rng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}
