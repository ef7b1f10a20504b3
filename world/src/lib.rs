#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Nexus Lanes.
//!
//! The [`World`] owns every unit, the board, the removable-obstacle set and the
//! terrain effect bookkeeping. All gameplay mutations flow through [`apply`],
//! which validates a [`Command`], executes it, and reports [`Event`]s. Read-only
//! access for systems and adapters lives in [`query`].

mod board;
pub mod combat;
mod legality;
mod terrain;
mod units;

use std::collections::BTreeSet;

use nexus_lanes_core::{
    ActionError, CellCoord, Command, Difficulty, Direction, Event, HeroPayload, Item, ItemKind,
    Lane, MonsterPayload, Payload, Side, TerrainKind, UnitId, EXPERIENCE_PER_MONSTER_LEVEL,
    GOLD_PER_MONSTER_LEVEL,
};
use rand::Rng;
use tracing::{debug, trace};

pub use board::{Board, BoardError};

use combat::{in_engagement_range, resolve_strike};
use terrain::TerrainEffects;
use units::LaneUnit;

/// Represents the authoritative Nexus Lanes world state.
#[derive(Debug)]
pub struct World {
    board: Board,
    difficulty: Difficulty,
    heroes: Vec<LaneUnit>,
    monsters: Vec<LaneUnit>,
    next_monster_number: u32,
    obstacles: BTreeSet<CellCoord>,
    effects: TerrainEffects,
}

impl World {
    /// Creates an empty world on the provided board.
    ///
    /// Every obstacle glyph on the board starts out as an active obstacle.
    #[must_use]
    pub fn new(board: Board, difficulty: Difficulty) -> Self {
        let obstacles = board.obstacle_cells().collect();
        Self {
            board,
            difficulty,
            heroes: Vec::new(),
            monsters: Vec::new(),
            next_monster_number: 1,
            obstacles,
            effects: TerrainEffects::new(difficulty.allows_monster_buffs()),
        }
    }

    /// Adds a hero at the home nexus of `lane`, which becomes its respawn and recall cell.
    pub fn add_hero(&mut self, lane: Lane, payload: HeroPayload) -> Result<UnitId, ActionError> {
        let home = self.board.hero_home(lane);
        if self.living_at(Side::Hero, home).is_some() {
            return Err(ActionError::HomeOccupied(home));
        }
        let id = UnitId::hero(self.heroes.len() as u32 + 1);
        let terrain = self.terrain_at(home);
        let mut unit = LaneUnit::new(id, home, Some(home), Payload::Hero(payload));
        self.effects.on_spawn(&mut unit, terrain);
        self.heroes.push(unit);
        Ok(id)
    }

    /// Adds a monster on `cell`, allocating the next monster identifier.
    pub fn add_monster(
        &mut self,
        cell: CellCoord,
        payload: MonsterPayload,
    ) -> Result<UnitId, ActionError> {
        if !self.board.contains(cell) {
            return Err(ActionError::OutOfBounds);
        }
        if !self.board.is_accessible(cell) {
            return Err(ActionError::Inaccessible(cell));
        }
        if self.obstacles.contains(&cell) {
            return Err(ActionError::Obstructed(cell));
        }
        if cell.lane().is_none() {
            return Err(ActionError::NoLane(cell));
        }
        if self.living_at(Side::Monster, cell).is_some() {
            return Err(ActionError::SpawnOccupied(cell));
        }
        let id = UnitId::monster(self.next_monster_number);
        self.next_monster_number += 1;
        let terrain = self.terrain_at(cell);
        let mut unit = LaneUnit::new(id, cell, None, Payload::Monster(payload));
        self.effects.on_spawn(&mut unit, terrain);
        self.monsters.push(unit);
        Ok(id)
    }

    fn roster(&self, side: Side) -> &[LaneUnit] {
        match side {
            Side::Hero => &self.heroes,
            Side::Monster => &self.monsters,
        }
    }

    fn unit(&self, id: UnitId) -> Option<&LaneUnit> {
        self.roster(id.side()).iter().find(|unit| unit.id == id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut LaneUnit> {
        let roster = match id.side() {
            Side::Hero => &mut self.heroes,
            Side::Monster => &mut self.monsters,
        };
        roster.iter_mut().find(|unit| unit.id == id)
    }

    fn hero_payload_mut(&mut self, hero: UnitId) -> Option<&mut HeroPayload> {
        self.unit_mut(hero)?.payload.as_hero_mut()
    }

    fn living(&self, id: UnitId) -> Result<&LaneUnit, ActionError> {
        let unit = self.unit(id).ok_or(ActionError::UnknownUnit(id))?;
        if unit.alive {
            Ok(unit)
        } else {
            Err(ActionError::UnitDown(id))
        }
    }

    fn living_on(&self, id: UnitId, side: Side) -> Result<&LaneUnit, ActionError> {
        if id.side() != side {
            return Err(ActionError::WrongSide(id));
        }
        self.living(id)
    }

    fn living_hero(&self, id: UnitId) -> Result<(&LaneUnit, &HeroPayload), ActionError> {
        let unit = self.living_on(id, Side::Hero)?;
        let payload = unit.payload.as_hero().ok_or(ActionError::WrongSide(id))?;
        Ok((unit, payload))
    }

    fn living_at(&self, side: Side, cell: CellCoord) -> Option<&LaneUnit> {
        self.roster(side)
            .iter()
            .find(|unit| unit.alive && unit.cell == cell)
    }

    fn terrain_at(&self, cell: CellCoord) -> TerrainKind {
        self.board.terrain(cell).unwrap_or(TerrainKind::Plain)
    }

    /// Moves a unit and lets the terrain bookkeeping swap its buffs.
    fn relocate(&mut self, id: UnitId, to: CellCoord) {
        let terrain = self.terrain_at(to);
        let Self {
            heroes,
            monsters,
            effects,
            ..
        } = self;
        let roster = match id.side() {
            Side::Hero => heroes,
            Side::Monster => monsters,
        };
        if let Some(unit) = roster.iter_mut().find(|unit| unit.id == id) {
            unit.cell = to;
            effects.on_move(unit, terrain);
        }
    }

    fn step(
        &mut self,
        unit: UnitId,
        side: Side,
        direction: Direction,
    ) -> Result<(CellCoord, CellCoord), ActionError> {
        let from = self.living_on(unit, side)?.cell;
        let to = from.step(direction).ok_or(ActionError::OutOfBounds)?;
        self.check_destination(unit, to)?;
        self.relocate(unit, to);
        Ok((from, to))
    }

    fn teleport(
        &mut self,
        hero: UnitId,
        ally: UnitId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let from = self.living_on(hero, Side::Hero)?.cell;
        if ally == hero {
            return Err(ActionError::SelfTarget);
        }
        let ally_cell = self.living_on(ally, Side::Hero)?.cell;
        if from.lane() == ally_cell.lane() {
            return Err(ActionError::SameLane);
        }
        let to = self.teleport_destination(hero, ally, ally_cell)?;
        self.relocate(hero, to);
        out_events.push(Event::HeroTeleported {
            hero,
            ally,
            from,
            to,
        });
        Ok(())
    }

    fn recall(&mut self, hero: UnitId, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        let unit = self.living_on(hero, Side::Hero)?;
        let from = unit.cell;
        let home = unit.home.ok_or(ActionError::WrongSide(hero))?;
        if self
            .living_at(Side::Hero, home)
            .is_some_and(|other| other.id != hero)
        {
            return Err(ActionError::HomeOccupied(home));
        }
        self.relocate(hero, home);
        out_events.push(Event::HeroRecalled {
            hero,
            from,
            to: home,
        });
        Ok(())
    }

    fn clear_obstacle(
        &mut self,
        hero: UnitId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let from = self.living_on(hero, Side::Hero)?.cell;
        if from.manhattan_distance(cell) != 1 {
            return Err(ActionError::NotAdjacent(cell));
        }
        if !self.obstacles.remove(&cell) {
            return Err(ActionError::NoObstacle(cell));
        }
        out_events.push(Event::ObstacleCleared { hero, cell });
        Ok(())
    }

    fn attack<R: Rng + ?Sized>(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if attacker == target {
            return Err(ActionError::SelfTarget);
        }
        let attacking = self.living(attacker)?;
        if target.side() == attacker.side() {
            return Err(ActionError::WrongSide(target));
        }
        let defending = self.living(target)?;
        if !in_engagement_range(attacking.cell, defending.cell) {
            return Err(ActionError::NotEngaged { attacker, target });
        }
        let power = attacking.effective_attack();
        self.strike(attacker, target, power, None, rng, out_events)
    }

    fn cast_spell<R: Rng + ?Sized>(
        &mut self,
        caster: UnitId,
        index: usize,
        target: UnitId,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let (casting, hero) = self.living_hero(caster)?;
        if target.side() != Side::Monster {
            return Err(ActionError::WrongSide(target));
        }
        let spell = match hero.inventory.get(index) {
            Some(Item::Spell(spell)) => spell.clone(),
            Some(_) => {
                return Err(ActionError::WrongItemKind {
                    index,
                    expected: ItemKind::Spell,
                })
            }
            None => return Err(ActionError::NoSuchItem(index)),
        };
        hero.check_level(spell.required_level)?;
        let defending = self.living(target)?;
        if !in_engagement_range(casting.cell, defending.cell) {
            return Err(ActionError::NotEngaged {
                attacker: caster,
                target,
            });
        }
        if hero.mp < spell.mana_cost {
            return Err(ActionError::InsufficientMana {
                required: spell.mana_cost,
                available: hero.mp,
            });
        }
        let power = casting.spell_power(spell.damage);

        self.hero_payload_mut(caster)
            .ok_or(ActionError::UnknownUnit(caster))?
            .spend_mana(spell.mana_cost)?;
        self.strike(caster, target, power, Some(spell.name), rng, out_events)
    }

    fn strike<R: Rng + ?Sized>(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        power: u32,
        spell: Option<String>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let defender = self
            .unit_mut(target)
            .ok_or(ActionError::UnknownUnit(target))?;
        let outcome = resolve_strike(power, defender, rng);
        let died = !defender.alive;
        let level = defender.payload.level();
        out_events.push(Event::Struck {
            attacker,
            target,
            spell,
            outcome,
        });
        if died {
            out_events.push(Event::UnitDied { unit: target });
            if target.side() == Side::Monster {
                self.reward(attacker, level, out_events);
            }
        }
        Ok(())
    }

    /// Pays the hero that slew a monster of `level`.
    fn reward(&mut self, hero: UnitId, level: u32, out_events: &mut Vec<Event>) {
        let Some(payload) = self.hero_payload_mut(hero) else {
            return;
        };
        let gold = level.saturating_mul(GOLD_PER_MONSTER_LEVEL);
        let experience = level.saturating_mul(EXPERIENCE_PER_MONSTER_LEVEL);
        let reached = payload.earn(gold, experience);
        out_events.push(Event::RewardEarned {
            hero,
            gold,
            experience,
        });
        for level in reached {
            debug!(%hero, level, "hero levelled up");
            out_events.push(Event::HeroLevelledUp { hero, level });
        }
    }

    fn use_potion(
        &mut self,
        hero: UnitId,
        index: usize,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let (_, payload) = self.living_hero(hero)?;
        let potion = match payload.inventory.get(index) {
            Some(Item::Potion(potion)) => potion.clone(),
            Some(_) => {
                return Err(ActionError::WrongItemKind {
                    index,
                    expected: ItemKind::Potion,
                })
            }
            None => return Err(ActionError::NoSuchItem(index)),
        };
        let payload = self
            .hero_payload_mut(hero)
            .ok_or(ActionError::UnknownUnit(hero))?;
        payload.drink(&potion)?;
        let _ = payload.inventory.remove(index);
        out_events.push(Event::PotionUsed {
            hero,
            item: potion.name,
        });
        Ok(())
    }

    fn equip(
        &mut self,
        hero: UnitId,
        index: usize,
        expected: ItemKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let (_, payload) = self.living_hero(hero)?;
        let item = payload
            .inventory
            .get(index)
            .ok_or(ActionError::NoSuchItem(index))?;
        if item.kind() != expected {
            return Err(ActionError::WrongItemKind { index, expected });
        }
        payload.check_level(item.required_level())?;

        let payload = self
            .hero_payload_mut(hero)
            .ok_or(ActionError::UnknownUnit(hero))?;
        let event = match payload.inventory.remove(index) {
            Some(Item::Weapon(weapon)) => {
                let item = weapon.name.clone();
                for displaced in payload.equip_weapon(weapon)? {
                    payload.inventory.add(Item::Weapon(displaced));
                }
                Event::WeaponEquipped { hero, item }
            }
            Some(Item::Armor(armor)) => {
                let item = armor.name.clone();
                if let Some(previous) = payload.equip_armor(armor)? {
                    payload.inventory.add(Item::Armor(previous));
                }
                Event::ArmorEquipped { hero, item }
            }
            Some(_) | None => return Err(ActionError::NoSuchItem(index)),
        };
        out_events.push(event);
        Ok(())
    }

    fn open_market(&self, hero: UnitId, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        let cell = self.living_on(hero, Side::Hero)?.cell;
        if cell.row() != self.board.last_row() {
            return Err(ActionError::NotOnHomeRow);
        }
        out_events.push(Event::MarketOpened { hero });
        Ok(())
    }

    fn begin_round(&mut self, round: u32, out_events: &mut Vec<Event>) {
        out_events.push(Event::RoundStarted { round });
        let fallen: Vec<(UnitId, Option<CellCoord>)> = self
            .heroes
            .iter()
            .filter(|hero| !hero.alive)
            .map(|hero| (hero.id, hero.home))
            .collect();
        for (hero, home) in fallen {
            let Some(home) = home else {
                continue;
            };
            if self.living_at(Side::Hero, home).is_some() {
                debug!(%hero, cell = %home, "home nexus occupied, respawn deferred");
                continue;
            }
            if let Some(unit) = self.unit_mut(hero) {
                if let Payload::Hero(payload) = &mut unit.payload {
                    payload.refill();
                }
                unit.alive = unit.payload.hp() > 0;
            }
            self.relocate(hero, home);
            out_events.push(Event::HeroRespawned { hero, cell: home });
        }
    }

    fn end_round(&mut self, round: u32, out_events: &mut Vec<Event>) {
        for unit in self.heroes.iter_mut().filter(|unit| unit.alive) {
            if let Payload::Hero(payload) = &mut unit.payload {
                let hp = payload.heal(regeneration(payload.stats.max_hp));
                let mp = payload.restore_mana(regeneration(payload.stats.max_mp));
                out_events.push(Event::HeroRegenerated {
                    hero: unit.id,
                    hp,
                    mp,
                });
            }
        }
        out_events.push(Event::RoundEnded { round });
    }
}

/// Ten percent of `max`, rounded up, and never less than one point.
fn regeneration(max: u32) -> u32 {
    max.div_ceil(10).max(1)
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and emit no events.
pub fn apply<R: Rng + ?Sized>(
    world: &mut World,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> Result<(), ActionError> {
    let actor = command.actor();
    let first_new = out_events.len();
    let result = match command {
        Command::MoveHero { hero, direction } => world
            .step(hero, Side::Hero, direction)
            .map(|(from, to)| out_events.push(Event::HeroMoved { hero, from, to })),
        Command::MoveMonster { monster, direction } => world
            .step(monster, Side::Monster, direction)
            .map(|(from, to)| out_events.push(Event::MonsterMoved { monster, from, to })),
        Command::TeleportHero { hero, ally } => world.teleport(hero, ally, out_events),
        Command::RecallHero { hero } => world.recall(hero, out_events),
        Command::ClearObstacle { hero, cell } => world.clear_obstacle(hero, cell, out_events),
        Command::Attack { attacker, target } => world.attack(attacker, target, rng, out_events),
        Command::CastSpell {
            caster,
            spell,
            target,
        } => world.cast_spell(caster, spell, target, rng, out_events),
        Command::UsePotion { hero, potion } => world.use_potion(hero, potion, out_events),
        Command::EquipWeapon { hero, item } => {
            world.equip(hero, item, ItemKind::Weapon, out_events)
        }
        Command::EquipArmor { hero, item } => world.equip(hero, item, ItemKind::Armor, out_events),
        Command::OpenMarket { hero } => world.open_market(hero, out_events),
        Command::Hold { unit } => world
            .living(unit)
            .map(|_| out_events.push(Event::Held { unit })),
        Command::BeginRound { round } => {
            world.begin_round(round, out_events);
            Ok(())
        }
        Command::EndRound { round } => {
            world.end_round(round, out_events);
            Ok(())
        }
        Command::SpawnMonster { cell, payload } => {
            let level = payload.level;
            world.add_monster(cell, payload).and_then(|monster| {
                let lane = cell.lane().ok_or(ActionError::NoLane(cell))?;
                out_events.push(Event::MonsterSpawned {
                    monster,
                    lane,
                    cell,
                    level,
                });
                Ok(())
            })
        }
    };

    match &result {
        Ok(()) => {
            for event in &out_events[first_new..] {
                debug!(%event, "world event");
            }
        }
        Err(error) => trace!(actor = ?actor, %error, "command rejected"),
    }
    result
}

/// Grants the market collaborator mutable access to a hero's payload.
///
/// Only the round orchestrator calls this, right after an accepted
/// [`Command::OpenMarket`].
pub fn market_access(world: &mut World, hero: UnitId) -> Option<&mut HeroPayload> {
    world.hero_payload_mut(hero)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeMap;

    use nexus_lanes_core::{
        CellCoord, Difficulty, Direction, GameOutcome, HeroPayload, Lane, Side, StatBuffs,
        StatKind, UnitId,
    };

    use super::{combat::in_engagement_range, units::LaneUnit, Board, World};

    /// Read-only snapshot of a unit.
    #[derive(Clone, Debug, PartialEq)]
    pub struct UnitView {
        /// Unit identifier.
        pub id: UnitId,
        /// Payload name.
        pub name: String,
        /// Payload level.
        pub level: u32,
        /// Current cell.
        pub cell: CellCoord,
        /// Whether the unit is alive.
        pub alive: bool,
        /// Current hit points.
        pub hp: u32,
        /// Maximum hit points.
        pub max_hp: u32,
        /// Current mana; monsters report zero.
        pub mp: u32,
        /// Maximum mana; monsters report zero.
        pub max_mp: u32,
        /// Attack including the strength buff.
        pub attack: u32,
        /// Flat damage reduction.
        pub defense: u32,
        /// Dodge chance including the agility buff.
        pub dodge: f64,
        /// Active terrain buffs.
        pub buffs: StatBuffs,
        /// Home nexus cell for heroes.
        pub home: Option<CellCoord>,
    }

    impl UnitView {
        fn capture(unit: &LaneUnit) -> Self {
            let (mp, max_mp) = unit
                .payload
                .as_hero()
                .map_or((0, 0), |hero| (hero.mp, hero.stats.max_mp));
            Self {
                id: unit.id,
                name: unit.payload.name().to_owned(),
                level: unit.payload.level(),
                cell: unit.cell,
                alive: unit.alive,
                hp: unit.payload.hp(),
                max_hp: unit.payload.max_hp(),
                mp,
                max_mp,
                attack: unit.effective_attack(),
                defense: unit.payload.defense(),
                dodge: unit.effective_dodge(),
                buffs: unit.buffs,
                home: unit.home,
            }
        }
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Difficulty the world was created with.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Positions of all living heroes.
    #[must_use]
    pub fn hero_positions(world: &World) -> BTreeMap<UnitId, CellCoord> {
        positions(world, Side::Hero)
    }

    /// Positions of all living monsters.
    #[must_use]
    pub fn monster_positions(world: &World) -> BTreeMap<UnitId, CellCoord> {
        positions(world, Side::Monster)
    }

    fn positions(world: &World, side: Side) -> BTreeMap<UnitId, CellCoord> {
        world
            .roster(side)
            .iter()
            .filter(|unit| unit.alive)
            .map(|unit| (unit.id, unit.cell))
            .collect()
    }

    /// Identifiers of every unit on `side`, dead or alive, in roster order.
    #[must_use]
    pub fn roster(world: &World, side: Side) -> Vec<UnitId> {
        world.roster(side).iter().map(|unit| unit.id).collect()
    }

    /// Snapshot of a single unit.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<UnitView> {
        world.unit(id).map(UnitView::capture)
    }

    /// Snapshots of every unit on `side` in roster order.
    #[must_use]
    pub fn units(world: &World, side: Side) -> Vec<UnitView> {
        world.roster(side).iter().map(UnitView::capture).collect()
    }

    /// Reports whether the unit exists and is alive.
    #[must_use]
    pub fn is_alive(world: &World, id: UnitId) -> bool {
        world.unit(id).is_some_and(|unit| unit.alive)
    }

    /// Hero payload, including inventory and equipment.
    #[must_use]
    pub fn hero_payload(world: &World, hero: UnitId) -> Option<&HeroPayload> {
        world.unit(hero)?.payload.as_hero()
    }

    /// Living unit of the opposite side that a unit of `side` standing on
    /// `cell` can fight. A co-located opponent wins, then roster order.
    #[must_use]
    pub fn engaged_opponent(world: &World, side: Side, cell: CellCoord) -> Option<UnitId> {
        let mut in_range = world
            .roster(side.opponent())
            .iter()
            .filter(|unit| unit.alive && in_engagement_range(cell, unit.cell));
        let first = in_range.next()?;
        if first.cell == cell {
            return Some(first.id);
        }
        Some(
            in_range
                .find(|unit| unit.cell == cell)
                .map_or(first.id, |unit| unit.id),
        )
    }

    /// Monster the living hero is currently engaged with.
    #[must_use]
    pub fn engaged_monster(world: &World, hero: UnitId) -> Option<UnitId> {
        let unit = world.unit(hero).filter(|unit| unit.alive)?;
        engaged_opponent(world, Side::Hero, unit.cell)
    }

    /// Hero the living monster is currently engaged with.
    #[must_use]
    pub fn engaged_hero(world: &World, monster: UnitId) -> Option<UnitId> {
        let unit = world.unit(monster).filter(|unit| unit.alive)?;
        engaged_opponent(world, Side::Monster, unit.cell)
    }

    /// First active obstacle orthogonally adjacent to the living hero.
    #[must_use]
    pub fn adjacent_obstacle(world: &World, hero: UnitId) -> Option<CellCoord> {
        let unit = world.unit(hero).filter(|unit| unit.alive)?;
        Direction::ALL
            .into_iter()
            .filter_map(|direction| unit.cell.step(direction))
            .find(|cell| world.obstacles.contains(cell))
    }

    /// Reports whether the cell still holds an uncleared obstacle.
    #[must_use]
    pub fn is_obstacle(world: &World, cell: CellCoord) -> bool {
        world.obstacles.contains(&cell)
    }

    /// Reports whether `unit` may legally end a step on `cell`.
    #[must_use]
    pub fn can_enter(world: &World, unit: UnitId, cell: CellCoord) -> bool {
        world.check_destination(unit, cell).is_ok()
    }

    /// Row of the nearest living opponent of `side` in `lane`.
    #[must_use]
    pub fn lane_front(world: &World, side: Side, lane: Lane) -> Option<u32> {
        world.lane_front(side, lane)
    }

    /// Terrain buff currently recorded for the unit.
    #[must_use]
    pub fn active_terrain_effect(world: &World, unit: UnitId) -> Option<StatKind> {
        world.effects.active(unit)
    }

    /// Terminal outcome, if one has been reached: a living hero on row 0 wins
    /// before a living monster on the last row loses.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        let last_row = world.board.last_row();
        if world
            .heroes
            .iter()
            .any(|hero| hero.alive && hero.cell.row() == 0)
        {
            Some(GameOutcome::Victory)
        } else if world
            .monsters
            .iter()
            .any(|monster| monster.alive && monster.cell.row() == last_row)
        {
            Some(GameOutcome::Defeat)
        } else {
            None
        }
    }
}
