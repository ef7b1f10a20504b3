//! Lane units owned by the world.

use nexus_lanes_core::{CellCoord, Payload, StatBuffs, UnitId};

use crate::combat::effective_dodge;

/// A hero or monster standing on the board.
#[derive(Clone, Debug)]
pub(crate) struct LaneUnit {
    pub(crate) id: UnitId,
    pub(crate) cell: CellCoord,
    pub(crate) alive: bool,
    pub(crate) buffs: StatBuffs,
    /// Respawn and recall cell; heroes only.
    pub(crate) home: Option<CellCoord>,
    pub(crate) payload: Payload,
}

impl LaneUnit {
    pub(crate) fn new(
        id: UnitId,
        cell: CellCoord,
        home: Option<CellCoord>,
        payload: Payload,
    ) -> Self {
        Self {
            id,
            cell,
            alive: payload.hp() > 0,
            buffs: StatBuffs::default(),
            home,
            payload,
        }
    }

    /// Payload attack plus the strength buff, never negative.
    pub(crate) fn effective_attack(&self) -> u32 {
        buffed(self.payload.attack(), self.buffs.strength)
    }

    /// Spell damage plus the dexterity buff, never negative.
    pub(crate) fn spell_power(&self, spell_damage: u32) -> u32 {
        buffed(spell_damage, self.buffs.dexterity)
    }

    pub(crate) fn effective_dodge(&self) -> f64 {
        effective_dodge(self.payload.dodge_chance(), self.buffs.agility)
    }

    /// Subtracts hit points and flips the alive flag when they run out.
    pub(crate) fn take_hit(&mut self, damage: u32) -> u32 {
        let remaining = self.payload.take_damage(damage);
        if remaining == 0 {
            self.alive = false;
        }
        remaining
    }
}

fn buffed(base: u32, delta: i32) -> u32 {
    let total = i64::from(base) + i64::from(delta);
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_lanes_core::{MonsterPayload, Stats, MAX_DODGE_CHANCE};

    fn monster(hp: u32) -> LaneUnit {
        LaneUnit::new(
            UnitId::monster(1),
            CellCoord::new(1, 0),
            None,
            Payload::Monster(MonsterPayload::new(
                "Casper",
                1,
                Stats {
                    max_hp: hp,
                    strength: 2,
                    ..Stats::default()
                },
                8,
                1,
                0.1,
            )),
        )
    }

    #[test]
    fn strength_buff_raises_attack_and_never_underflows() {
        let mut unit = monster(10);
        assert_eq!(unit.effective_attack(), 10);
        unit.buffs.strength = 3;
        assert_eq!(unit.effective_attack(), 13);
        unit.buffs.strength = -50;
        assert_eq!(unit.effective_attack(), 0);
    }

    #[test]
    fn agility_buff_adds_one_percent_per_point() {
        let mut unit = monster(10);
        unit.buffs.agility = 3;
        assert!((unit.effective_dodge() - 0.13).abs() < 1e-9);
        unit.buffs.agility = 100;
        assert!((unit.effective_dodge() - MAX_DODGE_CHANCE).abs() < 1e-9);
    }

    #[test]
    fn lethal_hit_flips_alive_flag() {
        let mut unit = monster(5);
        assert_eq!(unit.take_hit(3), 2);
        assert!(unit.alive);
        assert_eq!(unit.take_hit(3), 0);
        assert!(!unit.alive);
    }
}
