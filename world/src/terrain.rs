//! Terrain effect bookkeeping.
//!
//! Every unit carries at most one active terrain effect. Entering a cell first
//! reverses whatever effect is recorded for the unit and then applies the
//! effect of the new cell, so a unit's buff accumulators always equal the buff
//! of the cell it stands on.

use std::collections::BTreeMap;

use nexus_lanes_core::{Side, StatKind, TerrainKind, UnitId, TERRAIN_BUFF};

use crate::units::LaneUnit;

#[derive(Clone, Debug)]
pub(crate) struct TerrainEffects {
    active: BTreeMap<UnitId, StatKind>,
    allow_monster_buffs: bool,
}

impl TerrainEffects {
    pub(crate) fn new(allow_monster_buffs: bool) -> Self {
        Self {
            active: BTreeMap::new(),
            allow_monster_buffs,
        }
    }

    pub(crate) fn on_spawn(&mut self, unit: &mut LaneUnit, terrain: TerrainKind) {
        self.apply(unit, terrain);
    }

    pub(crate) fn on_move(&mut self, unit: &mut LaneUnit, terrain: TerrainKind) {
        self.remove(unit);
        self.apply(unit, terrain);
    }

    pub(crate) fn active(&self, unit: UnitId) -> Option<StatKind> {
        self.active.get(&unit).copied()
    }

    fn remove(&mut self, unit: &mut LaneUnit) {
        if let Some(stat) = self.active.remove(&unit.id) {
            unit.buffs.add(stat, -TERRAIN_BUFF);
        }
    }

    fn apply(&mut self, unit: &mut LaneUnit, terrain: TerrainKind) {
        if unit.id.side() == Side::Monster && !self.allow_monster_buffs {
            return;
        }
        if let Some(stat) = terrain.buff() {
            unit.buffs.add(stat, TERRAIN_BUFF);
            let _ = self.active.insert(unit.id, stat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_lanes_core::{CellCoord, HeroPayload, MonsterPayload, Payload, Stats};

    fn hero() -> LaneUnit {
        LaneUnit::new(
            UnitId::hero(1),
            CellCoord::new(0, 6),
            Some(CellCoord::new(0, 7)),
            Payload::Hero(HeroPayload::new(
                "Rillifane",
                1,
                Stats {
                    max_hp: 100,
                    ..Stats::default()
                },
                0,
            )),
        )
    }

    fn monster() -> LaneUnit {
        LaneUnit::new(
            UnitId::monster(1),
            CellCoord::new(1, 0),
            None,
            Payload::Monster(MonsterPayload::new(
                "Natsunomeryu",
                1,
                Stats {
                    max_hp: 100,
                    ..Stats::default()
                },
                10,
                1,
                0.1,
            )),
        )
    }

    #[test]
    fn moving_swaps_one_buff_for_another() {
        let mut effects = TerrainEffects::new(true);
        let mut unit = hero();
        effects.on_spawn(&mut unit, TerrainKind::Bush);
        assert_eq!(unit.buffs.dexterity, TERRAIN_BUFF);

        effects.on_move(&mut unit, TerrainKind::Koulou);
        assert_eq!(unit.buffs.dexterity, 0);
        assert_eq!(unit.buffs.strength, TERRAIN_BUFF);
        assert_eq!(effects.active(unit.id), Some(StatKind::Strength));

        effects.on_move(&mut unit, TerrainKind::Plain);
        assert!(unit.buffs.is_zero());
        assert_eq!(effects.active(unit.id), None);
    }

    #[test]
    fn re_entering_the_same_terrain_does_not_stack() {
        let mut effects = TerrainEffects::new(true);
        let mut unit = hero();
        effects.on_spawn(&mut unit, TerrainKind::Cave);
        effects.on_move(&mut unit, TerrainKind::Cave);
        effects.on_move(&mut unit, TerrainKind::Cave);
        assert_eq!(unit.buffs.agility, TERRAIN_BUFF);
    }

    #[test]
    fn monsters_ignore_terrain_when_buffs_are_disabled() {
        let mut effects = TerrainEffects::new(false);
        let mut unit = monster();
        effects.on_spawn(&mut unit, TerrainKind::Koulou);
        effects.on_move(&mut unit, TerrainKind::Bush);
        assert!(unit.buffs.is_zero());

        let mut hero = hero();
        effects.on_move(&mut hero, TerrainKind::Koulou);
        assert_eq!(hero.buffs.strength, TERRAIN_BUFF);
    }
}
