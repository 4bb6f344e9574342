//! Text rendering for the board and its occupants.

use std::fmt::Write as _;

use valor_core::{Cell, PieceKind, TileKind};
use valor_world::{query, World};

/// Renders the board as one character per cell, north row first.
///
/// Heroes print as `H`, monsters as `M`, and a shared engagement cell as
/// `*`. Empty cells show their terrain.
pub(crate) fn board(world: &World) -> String {
    let board = query::board(world);
    let size = board.size();
    let mut out = String::with_capacity(((size + 1) * size * 2) as usize);

    for row in 0..size {
        for column in 0..size {
            let cell = Cell::new(column, row);
            let hero = query::piece_at(world, cell, PieceKind::Hero).is_some();
            let monster = query::piece_at(world, cell, PieceKind::Monster).is_some();
            let glyph = match (hero, monster) {
                (true, true) => '*',
                (true, false) => 'H',
                (false, true) => 'M',
                (false, false) => tile_glyph(board.tile(cell).kind()),
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }

    let _ = write!(out, "rows run north to south; lanes west to east");
    out
}

const fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Nexus => 'N',
        TileKind::Plain => '.',
        TileKind::Bush => 'B',
        TileKind::Cave => 'C',
        TileKind::Koulou => 'K',
        TileKind::Obstacle => 'X',
        TileKind::Inaccessible => '#',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_core::{BoardConfig, Command, LaneId, TerrainMix};
    use valor_world::apply;

    #[test]
    fn rendered_board_marks_walls_and_heroes() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBoard {
                config: BoardConfig {
                    terrain_mix: TerrainMix::all_plain(),
                    ..BoardConfig::default()
                },
                seed: 1,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::EnlistHero {
                name: "Gaerdal".to_owned(),
                lane: LaneId::new(0),
                max_hit_points: 100,
                max_mana: 60,
                level: 1,
            },
            &mut events,
        );

        let rendered = board(&world);
        let rows: Vec<&str> = rendered.lines().collect();
        assert!(rows[0].starts_with("N N # N N # N N"));
        assert!(rows[7].starts_with("H N # N N # N N"));
    }
}
