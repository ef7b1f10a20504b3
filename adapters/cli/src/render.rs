//! Plain-text rendering of the board, the roster and hero inventories.

use std::fmt::Write as _;

use nexus_lanes_core::{CellCoord, HeroPayload, Side, TerrainKind, UnitId};
use nexus_lanes_world::{query, World};

/// Draws the board with one bracketed cell per column: terrain glyph, then
/// the hero and monster standing there.
pub(crate) fn board(world: &World) -> String {
    let board = query::board(world);
    let heroes = query::hero_positions(world);
    let monsters = query::monster_positions(world);
    let occupant = |positions: &std::collections::BTreeMap<UnitId, CellCoord>, cell| {
        positions
            .iter()
            .find(|(_, at)| **at == cell)
            .map_or_else(|| "  ".to_owned(), |(id, _)| id.to_string())
    };

    let mut out = String::from("     ");
    for column in 0..board.columns() {
        let _ = write!(out, "   {column}    ");
    }
    out.push('\n');
    for row in 0..board.rows() {
        let _ = write!(out, "{row:>3}  ");
        for column in 0..board.columns() {
            let cell = CellCoord::new(column, row);
            let glyph = match board.terrain(cell) {
                Some(TerrainKind::Obstacle) if !query::is_obstacle(world, cell) => '.',
                Some(kind) => kind.glyph(),
                None => ' ',
            };
            if glyph == TerrainKind::Wall.glyph() {
                out.push_str("|XXXXX| ");
            } else {
                let _ = write!(
                    out,
                    "[{glyph}{:<2}{:<2}] ",
                    occupant(&heroes, cell),
                    occupant(&monsters, cell)
                );
            }
        }
        out.push('\n');
    }
    out
}

/// One status line per unit on both sides.
pub(crate) fn roster(world: &World) -> String {
    let mut out = String::new();
    for side in [Side::Hero, Side::Monster] {
        for unit in query::units(world, side) {
            if !unit.alive {
                let _ = writeln!(out, "{:<3} {:<22} fallen", unit.id.to_string(), unit.name);
                continue;
            }
            let _ = write!(
                out,
                "{:<3} {:<22} lvl {:<2} hp {:>4}/{:<4} ",
                unit.id.to_string(),
                unit.name,
                unit.level,
                unit.hp,
                unit.max_hp
            );
            if side == Side::Hero {
                let _ = write!(out, "mp {:>4}/{:<4} ", unit.mp, unit.max_mp);
            }
            let _ = write!(
                out,
                "atk {} def {} dodge {:.0}% at {}",
                unit.attack,
                unit.defense,
                unit.dodge * 100.0,
                unit.cell
            );
            if let Some(stat) = query::active_terrain_effect(world, unit.id) {
                let _ = write!(out, " [{stat:?} +]");
            }
            out.push('\n');
        }
    }
    out
}

/// Equipment, gold and the indexed inventory of a hero.
pub(crate) fn inventory(hero: &HeroPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (level {}, {} xp to next), {} gold",
        hero.name,
        hero.level,
        hero.experience_to_next_level(),
        hero.gold
    );
    let slot = |name: Option<&str>| name.unwrap_or("-").to_owned();
    let _ = writeln!(
        out,
        "  main hand: {}  off hand: {}  armor: {}",
        slot(hero.main_hand.as_ref().map(|weapon| weapon.name.as_str())),
        slot(hero.off_hand.as_ref().map(|weapon| weapon.name.as_str())),
        slot(hero.armor.as_ref().map(|armor| armor.name.as_str())),
    );
    if hero.inventory.is_empty() {
        out.push_str("  (inventory empty)\n");
    }
    for (index, item) in hero.inventory.iter() {
        let _ = writeln!(out, "  {index:>2}: {item}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_lanes_core::{Difficulty, Lane, Stats};
    use nexus_lanes_world::Board;

    fn hero(name: &str) -> HeroPayload {
        HeroPayload::new(
            name,
            1,
            Stats {
                max_hp: 100,
                max_mp: 50,
                ..Stats::default()
            },
            120,
        )
    }

    #[test]
    fn board_marks_heroes_walls_and_obstacles() {
        let mut world = World::new(Board::standard(), Difficulty::Medium);
        let _ = world.add_hero(Lane::Left, hero("Ayla")).expect("home free");
        let text = board(&world);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 8);
        assert!(lines[8].starts_with("  7  [NH1  ]"));
        assert!(lines[5].contains("[O    ]"));
        assert!(lines.iter().skip(1).all(|line| line.matches("|XXXXX|").count() == 2));
    }

    #[test]
    fn roster_lists_mana_for_heroes_only() {
        let mut world = World::new(Board::standard(), Difficulty::Medium);
        let _ = world.add_hero(Lane::Left, hero("Ayla")).expect("home free");
        let text = roster(&world);
        assert!(text.starts_with("H1  Ayla"));
        assert!(text.contains("mp   50/50"));
    }

    #[test]
    fn inventory_shows_empty_slots() {
        let text = inventory(&hero("Ayla"));
        assert!(text.contains("(level 1, 50 xp to next), 120 gold"));
        assert!(text.contains("main hand: -"));
        assert!(text.contains("(inventory empty)"));
    }
}
