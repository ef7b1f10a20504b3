//! Engagement and damage resolution shared by attacks and spells.

use nexus_lanes_core::{CellCoord, StrikeOutcome, DODGE_PER_AGILITY_BUFF, MAX_DODGE_CHANCE};
use rand::Rng;

use crate::units::LaneUnit;

/// Reports whether units on the two cells can fight: same lane and at most one step apart.
#[must_use]
pub fn in_engagement_range(first: CellCoord, second: CellCoord) -> bool {
    match (first.lane(), second.lane()) {
        (Some(a), Some(b)) => a == b && first.manhattan_distance(second) <= 1,
        _ => false,
    }
}

/// Dodge probability after the agility buff, clamped to `[0, MAX_DODGE_CHANCE]`.
#[must_use]
pub fn effective_dodge(base: f64, agility_buff: i32) -> f64 {
    let raw = base + DODGE_PER_AGILITY_BUFF * f64::from(agility_buff);
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_DODGE_CHANCE)
}

/// Damage left after the defender's flat reduction; a landed hit always deals at least 1.
#[must_use]
pub fn damage_after_defense(power: u32, defense: u32) -> u32 {
    power.saturating_sub(defense).max(1)
}

/// Rolls dodge and applies damage. The roll is drawn even when dodge is zero
/// so the random stream advances identically for every strike.
pub(crate) fn resolve_strike<R: Rng + ?Sized>(
    power: u32,
    defender: &mut LaneUnit,
    rng: &mut R,
) -> StrikeOutcome {
    let roll: f64 = rng.gen();
    if roll < defender.effective_dodge() {
        return StrikeOutcome::Dodged;
    }
    let damage = damage_after_defense(power, defender.payload.defense());
    let remaining_hp = defender.take_hit(damage);
    StrikeOutcome::Hit {
        damage,
        remaining_hp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_lanes_core::{MonsterPayload, Payload, Stats, UnitId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn defender(dodge: f64, defense: u32) -> LaneUnit {
        LaneUnit::new(
            UnitId::monster(1),
            CellCoord::new(0, 3),
            None,
            Payload::Monster(MonsterPayload::new(
                "Chrysophylax",
                2,
                Stats {
                    max_hp: 40,
                    ..Stats::default()
                },
                10,
                defense,
                dodge,
            )),
        )
    }

    #[test]
    fn engagement_requires_shared_lane_and_adjacency() {
        let origin = CellCoord::new(0, 4);
        assert!(in_engagement_range(origin, origin));
        assert!(in_engagement_range(origin, CellCoord::new(1, 4)));
        assert!(in_engagement_range(origin, CellCoord::new(0, 3)));
        assert!(!in_engagement_range(origin, CellCoord::new(1, 3)));
        assert!(!in_engagement_range(CellCoord::new(1, 4), CellCoord::new(3, 4)));
        assert!(!in_engagement_range(CellCoord::new(4, 4), CellCoord::new(5, 4)));
    }

    #[test]
    fn defense_never_reduces_damage_below_one() {
        assert_eq!(damage_after_defense(10, 4), 6);
        assert_eq!(damage_after_defense(3, 9), 1);
        assert_eq!(damage_after_defense(0, 0), 1);
    }

    #[test]
    fn zero_dodge_always_lands() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut target = defender(0.0, 2);
        for _ in 0..3 {
            let outcome = resolve_strike(12, &mut target, &mut rng);
            assert!(matches!(outcome, StrikeOutcome::Hit { damage: 10, .. }));
        }
        assert_eq!(target.payload.hp(), 10);
        let outcome = resolve_strike(12, &mut target, &mut rng);
        assert_eq!(
            outcome,
            StrikeOutcome::Hit {
                damage: 10,
                remaining_hp: 0
            }
        );
        assert!(!target.alive);
    }

    #[test]
    fn capped_dodge_still_lets_some_hits_through() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut target = defender(5.0, 0);
        target.payload = Payload::Monster(MonsterPayload::new(
            "Wall",
            1,
            Stats {
                max_hp: 1_000_000,
                ..Stats::default()
            },
            0,
            0,
            5.0,
        ));
        let landed = (0..400)
            .filter(|_| {
                matches!(
                    resolve_strike(1, &mut target, &mut rng),
                    StrikeOutcome::Hit { .. }
                )
            })
            .count();
        assert!(landed > 100, "landed only {landed} of 400 strikes");
        assert!(landed < 250, "landed {landed} of 400 strikes");
    }
}
