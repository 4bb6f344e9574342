#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides monster actions from world snapshots.
//!
//! Each monster phase works against the views captured at phase start, in
//! spawn order. A monster adjacent to at least one living hero emits a
//! strike intent; everyone else advances toward the hero nexus. The world
//! re-validates every movement command, so a step planned against stale
//! occupancy is rejected there rather than corrupting state.

use valor_core::{
    Cell, Command, Direction, HeroId, HeroView, MonsterId, MonsterView, PieceId, Rng,
};

/// Attack intent produced for a monster standing in range of a hero.
///
/// The orchestrator resolves the intent through its combat layer; this
/// system never computes damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    /// Monster performing the strike.
    pub monster: MonsterId,
    /// Hero selected as the victim.
    pub hero: HeroId,
}

/// Pure system that plans one action per living monster.
#[derive(Debug, Default)]
pub struct MonsterAi {
    victim_scratch: Vec<HeroId>,
}

impl MonsterAi {
    /// Creates a new monster AI system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the monster phase against the provided snapshots.
    ///
    /// `preferred_step` is the pathing hook: given a monster's cell it may
    /// suggest a direction toward the hero nexus, or `None` to fall back to
    /// the built-in advance rule. `is_cell_blocked` must report cells that
    /// are inaccessible or occupied as seen at phase start.
    pub fn handle<P, B>(
        &mut self,
        monster_view: &MonsterView,
        hero_view: &HeroView,
        lane_west_column: impl Fn(MonsterId) -> u32,
        mut preferred_step: P,
        is_cell_blocked: B,
        rng: &mut dyn Rng,
        out_strikes: &mut Vec<Strike>,
        out_commands: &mut Vec<Command>,
    ) where
        P: FnMut(Cell) -> Option<Direction>,
        B: Fn(Cell) -> bool,
    {
        for monster in monster_view.iter() {
            if !monster.alive {
                continue;
            }

            self.victim_scratch.clear();
            self.victim_scratch.extend(
                hero_view
                    .iter()
                    .filter(|hero| hero.alive && hero.cell.is_adjacent(monster.cell))
                    .map(|hero| hero.id),
            );
            if !self.victim_scratch.is_empty() {
                let pick = rng.next_index(self.victim_scratch.len());
                out_strikes.push(Strike {
                    monster: monster.id,
                    hero: self.victim_scratch[pick],
                });
                continue;
            }

            let direction = plan_step(
                monster.cell,
                lane_west_column(monster.id),
                &mut preferred_step,
                &is_cell_blocked,
            );
            out_commands.push(Command::MovePiece {
                piece: PieceId::Monster(monster.id),
                direction,
            });
        }
    }
}

/// Chooses the advance direction for a monster that found no victim.
///
/// The pathing hook wins when it names an unblocked step. Otherwise the
/// monster presses south, and when south is blocked it side-steps within
/// its lane: east from the lane's west column, west from the east column.
fn plan_step<P, B>(
    cell: Cell,
    lane_west_column: u32,
    preferred_step: &mut P,
    is_cell_blocked: &B,
) -> Direction
where
    P: FnMut(Cell) -> Option<Direction>,
    B: Fn(Cell) -> bool,
{
    if let Some(direction) = preferred_step(cell) {
        if step_is_open(cell, direction, is_cell_blocked) {
            return direction;
        }
    }

    if step_is_open(cell, Direction::South, is_cell_blocked) {
        return Direction::South;
    }

    if (cell.column() - lane_west_column) % 2 == 0 {
        Direction::East
    } else {
        Direction::West
    }
}

fn step_is_open<B>(cell: Cell, direction: Direction, is_cell_blocked: &B) -> bool
where
    B: Fn(Cell) -> bool,
{
    cell.step(direction)
        .map_or(false, |target| !is_cell_blocked(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_core::{LaneId, MonsterKind, MonsterSnapshot, SplitMix64};

    fn monster_at(id: u32, cell: Cell) -> MonsterSnapshot {
        MonsterSnapshot {
            id: MonsterId::new(id),
            kind: MonsterKind::Dragon,
            level: 1,
            cell,
            lane: LaneId::new(0),
            hit_points: 120,
            max_hit_points: 120,
            alive: true,
        }
    }

    fn hero_at(id: u32, cell: Cell, alive: bool) -> valor_core::HeroSnapshot {
        valor_core::HeroSnapshot {
            id: HeroId::new(id),
            name: format!("hero-{id}"),
            cell,
            lane: Some(LaneId::new(0)),
            hit_points: if alive { 100 } else { 0 },
            max_hit_points: 100,
            mana: 50,
            max_mana: 50,
            level: 1,
            alive,
        }
    }

    fn run(
        monsters: Vec<MonsterSnapshot>,
        heroes: Vec<valor_core::HeroSnapshot>,
        blocked: &[Cell],
    ) -> (Vec<Strike>, Vec<Command>) {
        let mut system = MonsterAi::new();
        let mut rng = SplitMix64::new(5);
        let mut strikes = Vec::new();
        let mut commands = Vec::new();
        system.handle(
            &MonsterView::from_snapshots(monsters),
            &HeroView::from_snapshots(heroes),
            |_| 0,
            |_| None,
            |cell| blocked.contains(&cell),
            &mut rng,
            &mut strikes,
            &mut commands,
        );
        (strikes, commands)
    }

    #[test]
    fn adjacent_hero_draws_a_strike_instead_of_a_step() {
        let (strikes, commands) = run(
            vec![monster_at(0, Cell::new(1, 3))],
            vec![hero_at(0, Cell::new(0, 4), true)],
            &[],
        );
        assert_eq!(
            strikes,
            vec![Strike {
                monster: MonsterId::new(0),
                hero: HeroId::new(0),
            }]
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn dead_heroes_are_not_victims() {
        let (strikes, commands) = run(
            vec![monster_at(0, Cell::new(1, 3))],
            vec![hero_at(0, Cell::new(0, 4), false)],
            &[],
        );
        assert!(strikes.is_empty());
        assert_eq!(
            commands,
            vec![Command::MovePiece {
                piece: PieceId::Monster(MonsterId::new(0)),
                direction: Direction::South,
            }]
        );
    }

    #[test]
    fn blocked_south_falls_back_to_parity_side_step() {
        // West lane column: parity even steps east.
        let (_, commands) = run(
            vec![monster_at(0, Cell::new(0, 3))],
            Vec::new(),
            &[Cell::new(0, 4)],
        );
        assert_eq!(
            commands,
            vec![Command::MovePiece {
                piece: PieceId::Monster(MonsterId::new(0)),
                direction: Direction::East,
            }]
        );

        // East lane column steps back west.
        let (_, commands) = run(
            vec![monster_at(0, Cell::new(1, 3))],
            Vec::new(),
            &[Cell::new(1, 4)],
        );
        assert_eq!(
            commands,
            vec![Command::MovePiece {
                piece: PieceId::Monster(MonsterId::new(0)),
                direction: Direction::West,
            }]
        );
    }

    #[test]
    fn pathing_hook_wins_when_its_step_is_open() {
        let mut system = MonsterAi::new();
        let mut rng = SplitMix64::new(5);
        let mut strikes = Vec::new();
        let mut commands = Vec::new();
        system.handle(
            &MonsterView::from_snapshots(vec![monster_at(0, Cell::new(1, 3))]),
            &HeroView::from_snapshots(Vec::new()),
            |_| 0,
            |_| Some(Direction::West),
            |_| false,
            &mut rng,
            &mut strikes,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::MovePiece {
                piece: PieceId::Monster(MonsterId::new(0)),
                direction: Direction::West,
            }]
        );
    }

    #[test]
    fn spawn_order_is_preserved_across_the_phase() {
        let (_, commands) = run(
            vec![
                monster_at(1, Cell::new(4, 2)),
                monster_at(0, Cell::new(3, 2)),
            ],
            Vec::new(),
            &[],
        );
        let order: Vec<PieceId> = commands
            .iter()
            .map(|command| match command {
                Command::MovePiece { piece, .. } => *piece,
                other => panic!("unexpected command: {other:?}"),
            })
            .collect();
        assert_eq!(
            order,
            vec![
                PieceId::Monster(MonsterId::new(0)),
                PieceId::Monster(MonsterId::new(1)),
            ]
        );
    }
}
