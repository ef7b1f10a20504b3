//! Stat payloads and inventory items carried by lane units.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ActionError;

/// Upper bound on the base dodge heroes derive from agility.
const HERO_DODGE_CAP: f64 = 0.40;

/// Gold awarded per level of a slain monster.
pub const GOLD_PER_MONSTER_LEVEL: u32 = 20;

/// Experience awarded per level of a slain monster.
pub const EXPERIENCE_PER_MONSTER_LEVEL: u32 = 10;

/// Experience needed per current hero level to reach the next one.
pub const EXPERIENCE_PER_HERO_LEVEL: u32 = 50;

/// Base attribute growth applied on every level up.
pub const LEVEL_UP_GROWTH: Stats = Stats {
    max_hp: 10,
    max_mp: 5,
    strength: 3,
    dexterity: 2,
    agility: 2,
};

/// Base attributes shared by heroes and monsters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Maximum hit points.
    pub max_hp: u32,
    /// Maximum mana points.
    #[serde(default)]
    pub max_mp: u32,
    /// Strength attribute.
    #[serde(default)]
    pub strength: u32,
    /// Dexterity attribute.
    #[serde(default)]
    pub dexterity: u32,
    /// Agility attribute.
    #[serde(default)]
    pub agility: u32,
}

impl Stats {
    /// Raises every attribute by the matching field of `growth`.
    pub fn grow(&mut self, growth: Self) {
        self.max_hp = self.max_hp.saturating_add(growth.max_hp);
        self.max_mp = self.max_mp.saturating_add(growth.max_mp);
        self.strength = self.strength.saturating_add(growth.strength);
        self.dexterity = self.dexterity.saturating_add(growth.dexterity);
        self.agility = self.agility.saturating_add(growth.agility);
    }
}

/// Weapon that can be held in one or both hands.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    /// Display name.
    pub name: String,
    /// Market price in gold.
    pub price: u32,
    /// Minimum hero level required to equip.
    pub required_level: u32,
    /// Damage contributed to the hero's attack.
    pub damage: u32,
    /// Hands occupied: 1 or 2.
    pub hands: u8,
}

impl Weapon {
    /// Reports whether the weapon occupies both hands.
    #[must_use]
    pub const fn is_two_handed(&self) -> bool {
        self.hands >= 2
    }
}

/// Body armor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Armor {
    /// Display name.
    pub name: String,
    /// Market price in gold.
    pub price: u32,
    /// Minimum hero level required to equip.
    pub required_level: u32,
    /// Flat damage subtracted from every incoming hit.
    pub damage_reduction: u32,
}

/// Attribute restored or raised by a potion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotionStat {
    /// Restores hit points up to the maximum.
    Hp,
    /// Restores mana points up to the maximum.
    Mp,
    /// Permanently raises base strength.
    Strength,
    /// Permanently raises base dexterity.
    Dexterity,
    /// Permanently raises base agility.
    Agility,
}

/// Single-use consumable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Potion {
    /// Display name.
    pub name: String,
    /// Market price in gold.
    pub price: u32,
    /// Minimum hero level required to drink.
    pub required_level: u32,
    /// Amount restored or added.
    pub amount: u32,
    /// Attribute affected.
    pub stat: PotionStat,
}

/// Flavour of a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    /// Calming ice.
    Stillness,
    /// Scorching fire.
    Breakdown,
    /// Piercing light.
    Clarity,
    /// Crackling storm.
    Confusion,
}

/// Reusable spell kept in the inventory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spell {
    /// Display name.
    pub name: String,
    /// Market price in gold.
    pub price: u32,
    /// Minimum hero level required to cast.
    pub required_level: u32,
    /// Base damage before the caster's dexterity buff.
    pub damage: u32,
    /// Mana spent per cast.
    pub mana_cost: u32,
    /// Spell flavour.
    pub kind: SpellKind,
}

/// Discriminant of an [`Item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A [`Weapon`].
    Weapon,
    /// An [`Armor`].
    Armor,
    /// A [`Potion`].
    Potion,
    /// A [`Spell`].
    Spell,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Potion => "potion",
            Self::Spell => "spell",
        };
        f.write_str(label)
    }
}

/// Anything a hero can carry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    /// Weapon item.
    Weapon(Weapon),
    /// Armor item.
    Armor(Armor),
    /// Potion item.
    Potion(Potion),
    /// Spell item.
    Spell(Spell),
}

impl Item {
    /// Display name of the item.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Weapon(weapon) => &weapon.name,
            Self::Armor(armor) => &armor.name,
            Self::Potion(potion) => &potion.name,
            Self::Spell(spell) => &spell.name,
        }
    }

    /// Market price in gold.
    #[must_use]
    pub const fn price(&self) -> u32 {
        match self {
            Self::Weapon(weapon) => weapon.price,
            Self::Armor(armor) => armor.price,
            Self::Potion(potion) => potion.price,
            Self::Spell(spell) => spell.price,
        }
    }

    /// Minimum level required to use the item.
    #[must_use]
    pub const fn required_level(&self) -> u32 {
        match self {
            Self::Weapon(weapon) => weapon.required_level,
            Self::Armor(armor) => armor.required_level,
            Self::Potion(potion) => potion.required_level,
            Self::Spell(spell) => spell.required_level,
        }
    }

    /// Discriminant of the item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Weapon(_) => ItemKind::Weapon,
            Self::Armor(_) => ItemKind::Armor,
            Self::Potion(_) => ItemKind::Potion,
            Self::Spell(_) => ItemKind::Spell,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon(weapon) => write!(
                f,
                "{} (weapon, dmg {}, {}h, lvl {})",
                weapon.name, weapon.damage, weapon.hands, weapon.required_level
            ),
            Self::Armor(armor) => write!(
                f,
                "{} (armor, -{} dmg, lvl {})",
                armor.name, armor.damage_reduction, armor.required_level
            ),
            Self::Potion(potion) => write!(
                f,
                "{} (potion, +{} {:?}, lvl {})",
                potion.name, potion.amount, potion.stat, potion.required_level
            ),
            Self::Spell(spell) => write!(
                f,
                "{} (spell, dmg {}, {} mp, lvl {})",
                spell.name, spell.damage, spell.mana_cost, spell.required_level
            ),
        }
    }
}

/// Ordered bag of items addressed by index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item.
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Removes and returns the item at `index`, shifting later items down.
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Iterates over items with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Item)> + '_ {
        self.items.iter().enumerate()
    }

    /// Iterates over potions with their inventory indices.
    pub fn potions(&self) -> impl Iterator<Item = (usize, &Potion)> + '_ {
        self.iter().filter_map(|(index, item)| match item {
            Item::Potion(potion) => Some((index, potion)),
            _ => None,
        })
    }

    /// Iterates over spells with their inventory indices.
    pub fn spells(&self) -> impl Iterator<Item = (usize, &Spell)> + '_ {
        self.iter().filter_map(|(index, item)| match item {
            Item::Spell(spell) => Some((index, spell)),
            _ => None,
        })
    }

    /// Number of items carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether the inventory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Stat payload of a hero.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroPayload {
    /// Display name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Base attributes.
    pub stats: Stats,
    /// Current hit points.
    pub hp: u32,
    /// Current mana points.
    pub mp: u32,
    /// Gold available for the market.
    pub gold: u32,
    /// Accumulated experience.
    pub experience: u32,
    /// Weapon held in the main hand.
    pub main_hand: Option<Weapon>,
    /// Weapon held in the off hand.
    pub off_hand: Option<Weapon>,
    /// Worn armor.
    pub armor: Option<Armor>,
    /// Carried items.
    pub inventory: Inventory,
}

impl HeroPayload {
    /// Creates a hero at full hit points and mana with nothing equipped.
    #[must_use]
    pub fn new(name: impl Into<String>, level: u32, stats: Stats, gold: u32) -> Self {
        Self {
            name: name.into(),
            level,
            stats,
            hp: stats.max_hp,
            mp: stats.max_mp,
            gold,
            experience: 0,
            main_hand: None,
            off_hand: None,
            armor: None,
            inventory: Inventory::new(),
        }
    }

    /// Sum of equipped weapon damage.
    #[must_use]
    pub fn attack(&self) -> u32 {
        self.main_hand
            .iter()
            .chain(self.off_hand.iter())
            .map(|weapon| weapon.damage)
            .sum()
    }

    /// Damage reduction of the equipped armor.
    #[must_use]
    pub fn defense(&self) -> u32 {
        self.armor.as_ref().map_or(0, |armor| armor.damage_reduction)
    }

    /// Base dodge chance derived from agility.
    #[must_use]
    pub fn dodge_chance(&self) -> f64 {
        (f64::from(self.stats.agility / 5) * 0.01).min(HERO_DODGE_CAP)
    }

    /// Equips a weapon, returning whatever it displaced.
    ///
    /// Two-handed weapons take the main hand and empty the off hand. A
    /// one-handed weapon fills the main hand, then the off hand, and
    /// replaces the main hand when both are full.
    pub fn equip_weapon(&mut self, weapon: Weapon) -> Result<Vec<Weapon>, ActionError> {
        self.check_level(weapon.required_level)?;
        let mut displaced = Vec::new();
        if weapon.is_two_handed() {
            displaced.extend(self.main_hand.replace(weapon));
            displaced.extend(self.off_hand.take());
        } else if self.main_hand.as_ref().map_or(true, Weapon::is_two_handed) {
            displaced.extend(self.main_hand.replace(weapon));
        } else if self.off_hand.is_none() {
            self.off_hand = Some(weapon);
        } else {
            displaced.extend(self.main_hand.replace(weapon));
        }
        Ok(displaced)
    }

    /// Wears armor, returning the previous piece.
    pub fn equip_armor(&mut self, armor: Armor) -> Result<Option<Armor>, ActionError> {
        self.check_level(armor.required_level)?;
        Ok(self.armor.replace(armor))
    }

    /// Applies a potion's effect.
    pub fn drink(&mut self, potion: &Potion) -> Result<(), ActionError> {
        self.check_level(potion.required_level)?;
        match potion.stat {
            PotionStat::Hp => {
                let _ = self.heal(potion.amount);
            }
            PotionStat::Mp => {
                let _ = self.restore_mana(potion.amount);
            }
            PotionStat::Strength => {
                self.stats.strength = self.stats.strength.saturating_add(potion.amount);
            }
            PotionStat::Dexterity => {
                self.stats.dexterity = self.stats.dexterity.saturating_add(potion.amount);
            }
            PotionStat::Agility => {
                self.stats.agility = self.stats.agility.saturating_add(potion.amount);
            }
        }
        Ok(())
    }

    /// Restores hit points, clamped to the maximum. Returns the amount gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.stats.max_hp);
        self.hp - before
    }

    /// Restores mana, clamped to the maximum. Returns the amount gained.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mp;
        self.mp = self.mp.saturating_add(amount).min(self.stats.max_mp);
        self.mp - before
    }

    /// Deducts mana for a spell or fails without touching the pool.
    pub fn spend_mana(&mut self, amount: u32) -> Result<(), ActionError> {
        if self.mp < amount {
            return Err(ActionError::InsufficientMana {
                required: amount,
                available: self.mp,
            });
        }
        self.mp -= amount;
        Ok(())
    }

    /// Experience still needed to reach the next level.
    #[must_use]
    pub const fn experience_to_next_level(&self) -> u32 {
        self.level
            .saturating_mul(EXPERIENCE_PER_HERO_LEVEL)
            .saturating_sub(self.experience)
    }

    /// Adds gold and experience, levelling up as often as the experience
    /// allows. Each level up grows the base stats and refills hp and mana.
    /// Returns the levels reached, lowest first.
    pub fn earn(&mut self, gold: u32, experience: u32) -> Vec<u32> {
        self.gold = self.gold.saturating_add(gold);
        self.experience = self.experience.saturating_add(experience);
        let mut reached = Vec::new();
        loop {
            let needed = self.level.saturating_mul(EXPERIENCE_PER_HERO_LEVEL);
            if needed == 0 || self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level += 1;
            self.stats.grow(LEVEL_UP_GROWTH);
            self.refill();
            reached.push(self.level);
        }
        reached
    }

    /// Resets hit points and mana to their maxima.
    pub fn refill(&mut self) {
        self.hp = self.stats.max_hp;
        self.mp = self.stats.max_mp;
    }

    /// Fails when the hero is below `required`.
    pub fn check_level(&self, required: u32) -> Result<(), ActionError> {
        if self.level < required {
            Err(ActionError::LevelTooLow {
                required,
                level: self.level,
            })
        } else {
            Ok(())
        }
    }
}

/// Stat payload of a monster.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterPayload {
    /// Display name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Base attributes.
    pub stats: Stats,
    /// Current hit points.
    pub hp: u32,
    /// Damage before the strength bonus.
    pub base_damage: u32,
    /// Flat damage subtracted from every incoming hit.
    pub defense: u32,
    /// Raw dodge probability.
    pub dodge_chance: f64,
}

impl MonsterPayload {
    /// Creates a monster at full hit points.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        level: u32,
        stats: Stats,
        base_damage: u32,
        defense: u32,
        dodge_chance: f64,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            stats,
            hp: stats.max_hp,
            base_damage,
            defense,
            dodge_chance,
        }
    }

    /// Base damage plus strength.
    #[must_use]
    pub const fn attack(&self) -> u32 {
        self.base_damage.saturating_add(self.stats.strength)
    }
}

/// Tagged stat payload owned by a lane unit.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Hero payload.
    Hero(HeroPayload),
    /// Monster payload.
    Monster(MonsterPayload),
}

impl Payload {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Hero(hero) => &hero.name,
            Self::Monster(monster) => &monster.name,
        }
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        match self {
            Self::Hero(hero) => hero.level,
            Self::Monster(monster) => monster.level,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        match self {
            Self::Hero(hero) => hero.hp,
            Self::Monster(monster) => monster.hp,
        }
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        match self {
            Self::Hero(hero) => hero.stats.max_hp,
            Self::Monster(monster) => monster.stats.max_hp,
        }
    }

    /// Unbuffed attack.
    #[must_use]
    pub fn attack(&self) -> u32 {
        match self {
            Self::Hero(hero) => hero.attack(),
            Self::Monster(monster) => monster.attack(),
        }
    }

    /// Flat damage reduction.
    #[must_use]
    pub fn defense(&self) -> u32 {
        match self {
            Self::Hero(hero) => hero.defense(),
            Self::Monster(monster) => monster.defense,
        }
    }

    /// Unbuffed dodge chance.
    #[must_use]
    pub fn dodge_chance(&self) -> f64 {
        match self {
            Self::Hero(hero) => hero.dodge_chance(),
            Self::Monster(monster) => monster.dodge_chance,
        }
    }

    /// Subtracts hit points, saturating at zero, and returns the remainder.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let hp = match self {
            Self::Hero(hero) => &mut hero.hp,
            Self::Monster(monster) => &mut monster.hp,
        };
        *hp = hp.saturating_sub(amount);
        *hp
    }

    /// Hero payload, if this is a hero.
    #[must_use]
    pub const fn as_hero(&self) -> Option<&HeroPayload> {
        match self {
            Self::Hero(hero) => Some(hero),
            Self::Monster(_) => None,
        }
    }

    /// Mutable hero payload, if this is a hero.
    pub fn as_hero_mut(&mut self) -> Option<&mut HeroPayload> {
        match self {
            Self::Hero(hero) => Some(hero),
            Self::Monster(_) => None,
        }
    }

    /// Monster payload, if this is a monster.
    #[must_use]
    pub const fn as_monster(&self) -> Option<&MonsterPayload> {
        match self {
            Self::Hero(_) => None,
            Self::Monster(monster) => Some(monster),
        }
    }
}
