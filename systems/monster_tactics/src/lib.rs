#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides what each monster does on its turn.
//!
//! A monster fights an engaged hero if it has one. Otherwise it advances
//! south, or sidesteps within its lane when the forward cell is illegal, and
//! strikes once if the step brought a hero into range. A monster that can
//! neither fight nor move holds and is reported as stuck.

use nexus_lanes_core::{CellCoord, Command, Direction, Side, UnitId};
use nexus_lanes_world::{query, World};
use rand::Rng;
use tracing::trace;

/// Decides monster actions from read-only world queries.
#[derive(Debug, Default)]
pub struct MonsterTactics;

impl MonsterTactics {
    /// Emits the commands making up `monster`'s turn.
    ///
    /// Dead or unknown monsters produce nothing. The lateral coin flip is only
    /// drawn when the forward step is illegal.
    pub fn handle<R: Rng + ?Sized>(
        &self,
        world: &World,
        monster: UnitId,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        let Some(view) = query::unit(world, monster).filter(|view| view.alive) else {
            return;
        };

        if let Some(target) = query::engaged_hero(world, monster) {
            out.push(Command::Attack {
                attacker: monster,
                target,
            });
            return;
        }

        let Some((direction, destination)) = choose_step(world, monster, view.cell, rng) else {
            trace!(%monster, cell = %view.cell, "no legal step");
            out.push(Command::Hold { unit: monster });
            return;
        };

        out.push(Command::MoveMonster { monster, direction });
        if let Some(target) = query::engaged_opponent(world, Side::Monster, destination) {
            out.push(Command::Attack {
                attacker: monster,
                target,
            });
        }
    }
}

fn choose_step<R: Rng + ?Sized>(
    world: &World,
    monster: UnitId,
    from: CellCoord,
    rng: &mut R,
) -> Option<(Direction, CellCoord)> {
    let legal = |direction: Direction| {
        from.step(direction)
            .filter(|cell| query::can_enter(world, monster, *cell))
            .map(|cell| (direction, cell))
    };

    if let Some(forward) = legal(Direction::South) {
        return Some(forward);
    }
    let sides = if rng.gen_bool(0.5) {
        [Direction::West, Direction::East]
    } else {
        [Direction::East, Direction::West]
    };
    sides.into_iter().find_map(legal)
}
