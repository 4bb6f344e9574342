#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave system responsible for emitting monster spawn commands.

use valor_core::{Command, HeroView, LaneId, MonsterKind, Rng, LANE_COUNT};

/// Default number of rounds between monster waves.
pub const DEFAULT_WAVE_INTERVAL: u32 = 8;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    wave_interval: u32,
}

impl Config {
    /// Creates a new configuration using the provided wave cadence.
    #[must_use]
    pub const fn new(wave_interval: u32) -> Self {
        Self { wave_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_WAVE_INTERVAL)
    }
}

/// Pure system that emits one spawn command per lane on wave rounds.
#[derive(Debug)]
pub struct Spawning {
    wave_interval: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            wave_interval: config.wave_interval,
        }
    }

    /// Emits `Command::SpawnMonster` entries when the round opens a wave.
    ///
    /// The first round always spawns; afterwards a wave opens every
    /// `wave_interval` rounds. Species are drawn uniformly per lane and the
    /// wave level tracks the strongest living hero so late waves stay
    /// dangerous.
    pub fn handle(
        &mut self,
        round: u32,
        hero_view: &HeroView,
        rng: &mut dyn Rng,
        out: &mut Vec<Command>,
    ) {
        if self.wave_interval == 0 || round % self.wave_interval != 1 {
            return;
        }

        let level = wave_level(hero_view);
        for lane in 0..LANE_COUNT {
            let kind = MonsterKind::ALL[rng.next_index(MonsterKind::ALL.len())];
            out.push(Command::SpawnMonster {
                lane: LaneId::new(lane as u8),
                kind,
                level,
            });
        }
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn wave_level(hero_view: &HeroView) -> u32 {
    hero_view
        .iter()
        .filter(|hero| hero.alive)
        .map(|hero| hero.level)
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_core::{Cell, HeroId, HeroSnapshot, SplitMix64};

    fn party(levels: &[u32]) -> HeroView {
        let snapshots = levels
            .iter()
            .enumerate()
            .map(|(index, level)| HeroSnapshot {
                id: HeroId::new(index as u32),
                name: format!("hero-{index}"),
                cell: Cell::new(0, 7),
                lane: None,
                hit_points: 100,
                max_hit_points: 100,
                mana: 50,
                max_mana: 50,
                level: *level,
                alive: true,
            })
            .collect();
        HeroView::from_snapshots(snapshots)
    }

    #[test]
    fn waves_open_on_the_first_round_and_every_interval_after() {
        let mut system = Spawning::default();
        let mut rng = SplitMix64::new(3);
        let heroes = party(&[1]);

        let mut spawning_rounds = Vec::new();
        for round in 1..=17 {
            let mut out = Vec::new();
            system.handle(round, &heroes, &mut rng, &mut out);
            if !out.is_empty() {
                assert_eq!(out.len(), LANE_COUNT);
                spawning_rounds.push(round);
            }
        }
        assert_eq!(spawning_rounds, vec![1, 9, 17]);
    }

    #[test]
    fn every_lane_receives_exactly_one_spawn() {
        let mut system = Spawning::default();
        let mut rng = SplitMix64::new(9);
        let mut out = Vec::new();
        system.handle(1, &party(&[2]), &mut rng, &mut out);

        let mut lanes: Vec<u8> = out
            .iter()
            .map(|command| match command {
                Command::SpawnMonster { lane, .. } => lane.get(),
                other => panic!("unexpected command: {other:?}"),
            })
            .collect();
        lanes.sort_unstable();
        assert_eq!(lanes, vec![0, 1, 2]);
    }

    #[test]
    fn wave_level_tracks_the_strongest_living_hero() {
        let mut system = Spawning::default();
        let mut rng = SplitMix64::new(1);
        let mut out = Vec::new();
        system.handle(1, &party(&[2, 5, 3]), &mut rng, &mut out);

        for command in &out {
            match command {
                Command::SpawnMonster { level, .. } => assert_eq!(*level, 5),
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn identical_seeds_draw_identical_waves() {
        let heroes = party(&[1]);
        let mut first_out = Vec::new();
        let mut second_out = Vec::new();

        let mut system = Spawning::default();
        let mut rng = SplitMix64::new(77);
        system.handle(1, &heroes, &mut rng, &mut first_out);

        let mut system = Spawning::default();
        let mut rng = SplitMix64::new(77);
        system.handle(1, &heroes, &mut rng, &mut second_out);

        assert_eq!(first_out, second_out);
    }
}
