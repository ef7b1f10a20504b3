#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawning system responsible for emitting monster spawn commands.
//!
//! Waves are triggered by [`Event::RoundEnded`]: when the round number is a
//! multiple of the configured interval, every lane receives one monster at
//! its spawn cell, or at the other column of the same row when a living
//! monster already holds the primary cell. The opening wave seeds the same
//! formation with level-one monsters before the first round.

use std::collections::BTreeSet;

use nexus_lanes_core::{wave_level, CellCoord, Command, Difficulty, Event, Lane, MonsterPayload};
use nexus_lanes_world::{query, World};
use rand::Rng;
use tracing::{debug, warn};

/// Source of monster payloads for a requested level.
pub trait MonsterTemplates {
    /// Produces a fresh monster of `level`, or `None` when no template exists at all.
    fn monster_for_level<R: Rng + ?Sized>(&self, level: u32, rng: &mut R)
        -> Option<MonsterPayload>;
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: u32,
}

impl Config {
    /// Creates a configuration spawning a wave every `spawn_interval` rounds.
    #[must_use]
    pub const fn new(spawn_interval: u32) -> Self {
        Self { spawn_interval }
    }

    /// Creates the configuration matching a difficulty tier.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.spawn_interval())
    }
}

/// Pure system that emits one spawn command per lane on wave rounds.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
        }
    }

    /// Consumes round events and the current world to emit spawn commands.
    pub fn handle<T, R>(
        &mut self,
        events: &[Event],
        world: &World,
        templates: &T,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        T: MonsterTemplates + ?Sized,
        R: Rng + ?Sized,
    {
        for round in self.wave_rounds(events) {
            debug!(round, "wave triggered");
            spawn_wave(wave_level(round), world, templates, rng, out);
        }
    }

    /// Emits the initial monster roster: one level-one monster per lane.
    pub fn opening_wave<T, R>(
        &self,
        world: &World,
        templates: &T,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        T: MonsterTemplates + ?Sized,
        R: Rng + ?Sized,
    {
        spawn_wave(wave_level(0), world, templates, rng, out);
    }

    fn wave_rounds(&self, events: &[Event]) -> Vec<u32> {
        if self.spawn_interval == 0 {
            return Vec::new();
        }
        events
            .iter()
            .filter_map(|event| match event {
                Event::RoundEnded { round } if *round % self.spawn_interval == 0 => Some(*round),
                _ => None,
            })
            .collect()
    }
}

fn spawn_wave<T, R>(
    level: u32,
    world: &World,
    templates: &T,
    rng: &mut R,
    out: &mut Vec<Command>,
) where
    T: MonsterTemplates + ?Sized,
    R: Rng + ?Sized,
{
    let mut occupied: BTreeSet<CellCoord> =
        query::monster_positions(world).into_values().collect();

    for lane in Lane::ALL {
        let Some(cell) = select_cell(world, lane, &occupied) else {
            debug!(%lane, level, "both spawn cells occupied, lane skipped");
            continue;
        };
        let Some(payload) = templates.monster_for_level(level, rng) else {
            warn!(level, "no monster template available");
            return;
        };
        let _ = occupied.insert(cell);
        out.push(Command::SpawnMonster { cell, payload });
    }
}

fn select_cell(world: &World, lane: Lane, occupied: &BTreeSet<CellCoord>) -> Option<CellCoord> {
    let board = query::board(world);
    let primary = board.monster_spawn(lane);
    let alternate = lane
        .partner_column(primary.column())
        .map(|column| CellCoord::new(column, primary.row()));
    std::iter::once(primary).chain(alternate).find(|cell| {
        !occupied.contains(cell) && board.is_accessible(*cell) && !query::is_obstacle(world, *cell)
    })
}
