//! Static board topology: lanes, walls, nexus rows, and terrain tiles.

use valor_core::{
    BoardConfig, Cell, LaneId, NexusMarker, NexusSide, Rng, TerrainBonus, TileFeature, TileKind,
    LANE_COUNT,
};

/// State of a single board cell: terrain kind plus an optional feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    kind: TileKind,
    feature: Option<TileFeature>,
}

impl Tile {
    const fn new(kind: TileKind, feature: Option<TileFeature>) -> Self {
        Self { kind, feature }
    }

    /// Terrain kind of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Feature attached to the tile, if any.
    #[must_use]
    pub const fn feature(&self) -> Option<TileFeature> {
        self.feature
    }

    /// Reports whether a piece may stand on this tile.
    #[must_use]
    pub const fn is_traversable(&self) -> bool {
        self.kind.is_traversable()
    }
}

/// Immutable-shape board holding the lane, wall, and nexus topology.
///
/// Tiles are written once at generation time; the only later mutation is the
/// one-way obstacle-to-plain transition.
#[derive(Clone, Debug)]
pub struct Board {
    size: u32,
    lane_columns: [[u32; 2]; LANE_COUNT],
    tiles: Vec<Tile>,
}

impl Board {
    /// Generates a fully populated board from the provided configuration.
    ///
    /// Wall columns are written first, lane interiors are filled from the
    /// ratio distribution shuffled per lane with the injected RNG, and the
    /// nexus rows are written last so the fill never overwrites them.
    #[must_use]
    pub fn generate<R: Rng>(config: &BoardConfig, rng: &mut R) -> Self {
        let size = config.size;
        let capacity = (size as usize).saturating_mul(size as usize);
        let mut tiles = vec![Tile::new(TileKind::Inaccessible, None); capacity];

        let mut board = Self {
            size,
            lane_columns: config.lane_columns,
            tiles: Vec::new(),
        };

        for (lane_index, columns) in config.lane_columns.iter().enumerate() {
            let lane = LaneId::new(lane_index as u8);
            fill_lane_interior(&mut tiles, &board_shape(size), *columns, config, rng);
            write_nexus_rows(&mut tiles, &board_shape(size), *columns, lane);
        }

        board.tiles = tiles;
        board
    }

    /// Side length of the square board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Row index of the monster nexus at the north edge.
    #[must_use]
    pub const fn monster_nexus_row(&self) -> u32 {
        0
    }

    /// Row index of the hero nexus at the south edge.
    #[must_use]
    pub const fn hero_nexus_row(&self) -> u32 {
        self.size.saturating_sub(1)
    }

    /// Reports whether the cell lies inside the board.
    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Reports whether a piece may stand on the cell.
    ///
    /// Out-of-bounds cells short-circuit to inaccessible; this query never
    /// panics.
    #[must_use]
    pub fn is_accessible(&self, cell: Cell) -> bool {
        self.try_tile(cell)
            .map_or(false, |tile| tile.is_traversable())
    }

    /// Looks up the tile at the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the board; passing an unchecked
    /// coordinate here is a caller bug, not a game outcome.
    #[must_use]
    pub fn tile(&self, cell: Cell) -> &Tile {
        self.try_tile(cell)
            .unwrap_or_else(|| panic!("tile lookup outside board bounds: {cell:?}"))
    }

    /// Looks up the tile at the provided cell, yielding `None` out of bounds.
    #[must_use]
    pub fn try_tile(&self, cell: Cell) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    /// Resolves the lane that owns the provided column.
    ///
    /// Wall columns and columns outside the board yield `None`.
    #[must_use]
    pub fn lane_index_of(&self, column: u32) -> Option<LaneId> {
        self.lane_columns
            .iter()
            .position(|columns| columns.contains(&column))
            .map(|index| LaneId::new(index as u8))
    }

    /// West and east columns of the provided lane.
    #[must_use]
    pub fn lane_columns(&self, lane: LaneId) -> [u32; 2] {
        self.lane_columns[lane.index()]
    }

    /// Hero spawn cell for the lane: west column on the hero nexus row.
    #[must_use]
    pub fn hero_spawn_cell(&self, lane: LaneId) -> Cell {
        Cell::new(self.lane_columns(lane)[0], self.hero_nexus_row())
    }

    /// Monster spawn cell for the lane: east column on the monster nexus row.
    #[must_use]
    pub fn monster_spawn_cell(&self, lane: LaneId) -> Cell {
        Cell::new(self.lane_columns(lane)[1], self.monster_nexus_row())
    }

    /// Transitions an obstacle tile to plain ground with no feature.
    ///
    /// Returns `false` without mutating when the cell does not hold an
    /// obstacle; the transition is one-way and never reversed.
    pub(crate) fn clear_obstacle(&mut self, cell: Cell) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        let Some(tile) = self.tiles.get_mut(index) else {
            return false;
        };
        if tile.kind != TileKind::Obstacle {
            return false;
        }
        *tile = Tile::new(TileKind::Plain, None);
        true
    }

    #[cfg(feature = "scenario_scaffolding")]
    pub(crate) fn force_tile(&mut self, cell: Cell, kind: TileKind, bonus_fraction: f32) {
        let index = self
            .index(cell)
            .unwrap_or_else(|| panic!("forced tile outside board bounds: {cell:?}"));
        let feature = TerrainBonus::for_terrain(kind, bonus_fraction).map(TileFeature::Terrain);
        self.tiles[index] = Tile::new(kind, feature);
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy)]
struct BoardShape {
    size: u32,
}

impl BoardShape {
    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.column() < self.size && cell.row() < self.size {
            Some((cell.row() as usize) * (self.size as usize) + cell.column() as usize)
        } else {
            None
        }
    }
}

const fn board_shape(size: u32) -> BoardShape {
    BoardShape { size }
}

fn fill_lane_interior<R: Rng>(
    tiles: &mut [Tile],
    shape: &BoardShape,
    columns: [u32; 2],
    config: &BoardConfig,
    rng: &mut R,
) {
    let interior_rows = config.size.saturating_sub(2);
    let interior_count = (interior_rows as usize).saturating_mul(columns.len());
    if interior_count == 0 {
        return;
    }

    let mut kinds = distribute_terrain(interior_count, config);
    rng.shuffle(&mut kinds);

    let mut next = kinds.into_iter();
    for row in 1..config.size.saturating_sub(1) {
        for column in columns {
            let Some(kind) = next.next() else {
                return;
            };
            let feature =
                TerrainBonus::for_terrain(kind, config.bonus_fraction).map(TileFeature::Terrain);
            if let Some(index) = shape.index(Cell::new(column, row)) {
                tiles[index] = Tile::new(kind, feature);
            }
        }
    }
}

/// Builds the per-lane terrain deck: rounded counts per special kind, with
/// the remainder assigned plain ground.
fn distribute_terrain(interior_count: usize, config: &BoardConfig) -> Vec<TileKind> {
    let mix = config.terrain_mix;
    let count_for = |ratio: f32| -> usize {
        if ratio <= 0.0 {
            return 0;
        }
        (interior_count as f32 * ratio).round() as usize
    };

    let mut kinds = Vec::with_capacity(interior_count);
    for (kind, ratio) in [
        (TileKind::Bush, mix.bush),
        (TileKind::Cave, mix.cave),
        (TileKind::Koulou, mix.koulou),
        (TileKind::Obstacle, mix.obstacle),
    ] {
        let remaining = interior_count.saturating_sub(kinds.len());
        kinds.extend(std::iter::repeat(kind).take(count_for(ratio).min(remaining)));
    }
    let remainder = interior_count.saturating_sub(kinds.len());
    kinds.extend(std::iter::repeat(TileKind::Plain).take(remainder));
    kinds
}

fn write_nexus_rows(tiles: &mut [Tile], shape: &BoardShape, columns: [u32; 2], lane: LaneId) {
    let hero_row = shape.size.saturating_sub(1);
    for column in columns {
        if let Some(index) = shape.index(Cell::new(column, 0)) {
            let marker = NexusMarker::new(NexusSide::Monster, lane, false);
            tiles[index] = Tile::new(TileKind::Nexus, Some(TileFeature::Nexus(marker)));
        }
        if let Some(index) = shape.index(Cell::new(column, hero_row)) {
            let marker = NexusMarker::new(NexusSide::Hero, lane, true);
            tiles[index] = Tile::new(TileKind::Nexus, Some(TileFeature::Nexus(marker)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_core::SplitMix64;

    fn default_board(seed: u64) -> Board {
        let mut rng = SplitMix64::new(seed);
        Board::generate(&BoardConfig::default(), &mut rng)
    }

    #[test]
    fn wall_columns_are_never_accessible() {
        let board = default_board(7);
        for wall_column in [2, 5] {
            for row in 0..8 {
                let cell = Cell::new(wall_column, row);
                assert!(!board.is_accessible(cell));
                assert_eq!(board.tile(cell).kind(), TileKind::Inaccessible);
                assert!(board.tile(cell).feature().is_none());
            }
        }
    }

    #[test]
    fn nexus_rows_survive_the_terrain_fill() {
        let board = default_board(11);
        for lane_index in 0..3 {
            let lane = LaneId::new(lane_index);
            for column in board.lane_columns(lane) {
                assert_eq!(board.tile(Cell::new(column, 0)).kind(), TileKind::Nexus);
                assert_eq!(board.tile(Cell::new(column, 7)).kind(), TileKind::Nexus);
            }
        }
    }

    #[test]
    fn lane_interiors_follow_the_ratio_distribution() {
        let board = default_board(23);
        for lane_index in 0..3u8 {
            let lane = LaneId::new(lane_index);
            let mut counts = [0usize; 5];
            for column in board.lane_columns(lane) {
                for row in 1..7 {
                    match board.tile(Cell::new(column, row)).kind() {
                        TileKind::Bush => counts[0] += 1,
                        TileKind::Cave => counts[1] += 1,
                        TileKind::Koulou => counts[2] += 1,
                        TileKind::Obstacle => counts[3] += 1,
                        TileKind::Plain => counts[4] += 1,
                        other => panic!("unexpected interior kind {other:?}"),
                    }
                }
            }
            // 12 interior cells per lane: 20% bush/cave/koulou, 10% obstacle.
            assert_eq!(counts, [2, 2, 2, 1, 5]);
        }
    }

    #[test]
    fn generation_is_deterministic_for_same_seed() {
        let first = default_board(0xfeed);
        let second = default_board(0xfeed);
        for row in 0..8 {
            for column in 0..8 {
                let cell = Cell::new(column, row);
                assert_eq!(first.tile(cell).kind(), second.tile(cell).kind());
            }
        }
    }

    #[test]
    fn out_of_bounds_is_inaccessible_without_panicking() {
        let board = default_board(3);
        assert!(!board.is_accessible(Cell::new(8, 0)));
        assert!(!board.is_accessible(Cell::new(0, 8)));
        assert!(board.try_tile(Cell::new(99, 99)).is_none());
    }

    #[test]
    fn lane_index_reports_walls_as_none() {
        let board = default_board(5);
        assert_eq!(board.lane_index_of(0), Some(LaneId::new(0)));
        assert_eq!(board.lane_index_of(4), Some(LaneId::new(1)));
        assert_eq!(board.lane_index_of(7), Some(LaneId::new(2)));
        assert_eq!(board.lane_index_of(2), None);
        assert_eq!(board.lane_index_of(5), None);
        assert_eq!(board.lane_index_of(42), None);
    }

    #[test]
    fn clear_obstacle_is_one_way_and_reports_failure() {
        let mut board = default_board(17);
        let mut obstacle = None;
        'search: for column in 0..8 {
            for row in 0..8 {
                let cell = Cell::new(column, row);
                if board.tile(cell).kind() == TileKind::Obstacle {
                    obstacle = Some(cell);
                    break 'search;
                }
            }
        }
        let cell = obstacle.expect("default mix produces obstacles");

        assert!(board.clear_obstacle(cell));
        assert_eq!(board.tile(cell).kind(), TileKind::Plain);
        assert!(board.tile(cell).feature().is_none());
        assert!(!board.clear_obstacle(cell));
    }

    #[test]
    fn spawn_cells_sit_on_the_nexus_rows() {
        let board = default_board(29);
        let lane = LaneId::new(1);
        assert_eq!(board.hero_spawn_cell(lane), Cell::new(3, 7));
        assert_eq!(board.monster_spawn_cell(lane), Cell::new(4, 0));
    }
}
