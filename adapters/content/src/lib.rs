#![deny(unsafe_code, missing_docs, dead_code, unused_results, non_snake_case, unreachable_pub)]

//! Content repository for Nexus Lanes.
//!
//! Heroes, monster templates and the market stock are declared in a TOML
//! manifest and loaded once into a [`Catalog`] before a session starts. A
//! default manifest ships embedded in the crate.

mod market;

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use nexus_lanes_core::{
    ActionError, Armor, HeroPayload, Item, MonsterPayload, Potion, Spell, Stats, Weapon,
};
use nexus_lanes_system_spawning::MonsterTemplates;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use market::{Market, MarketError};

/// Manifest version understood by this loader.
pub const SUPPORTED_CONTENT_VERSION: u32 = 1;

/// Number of heroes fielded when no explicit party is requested.
pub const PARTY_SIZE: usize = 3;

const EMBEDDED_CONTENT: &str = include_str!("../data/default.toml");

/// Failures raised while loading or querying content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The manifest file could not be read.
    #[error("failed to read content manifest {}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid TOML or does not match the schema.
    #[error("failed to parse content manifest")]
    Parse(#[from] toml::de::Error),
    /// The manifest declares a version this loader does not support.
    #[error("unsupported content version {found} (expected {SUPPORTED_CONTENT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the manifest.
        found: u32,
    },
    /// A required section is empty.
    #[error("content defines no {0}")]
    Empty(&'static str),
    /// Two entries in one section share a name.
    #[error("duplicate {section} named {name}")]
    Duplicate {
        /// Section holding the duplicate.
        section: &'static str,
        /// Offending name.
        name: String,
    },
    /// An entry carries a value outside its valid range.
    #[error("{section} {name}: {reason}")]
    Invalid {
        /// Section holding the entry.
        section: &'static str,
        /// Entry name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A hero was requested by a name the catalog does not know.
    #[error("unknown hero {0}")]
    UnknownHero(String),
    /// Fewer heroes are available than a party needs.
    #[error("party needs {needed} heroes but only {available} are defined")]
    NotEnoughHeroes {
        /// Heroes required.
        needed: usize,
        /// Heroes available.
        available: usize,
    },
    /// The starter kit could not be equipped.
    #[error("starter kit rejected for {hero}")]
    StarterKit {
        /// Hero receiving the kit.
        hero: String,
        /// Underlying rejection.
        #[source]
        source: ActionError,
    },
}

/// Hero blueprint as declared in the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HeroDefinition {
    /// Display name.
    pub name: String,
    /// Starting level.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Starting gold.
    #[serde(default)]
    pub gold: u32,
    /// Base attributes.
    #[serde(flatten)]
    pub stats: Stats,
}

/// Monster template as declared in the manifest.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonsterDefinition {
    /// Display name.
    pub name: String,
    /// Level the template is tuned for.
    pub level: u32,
    /// Base attributes.
    #[serde(flatten)]
    pub stats: Stats,
    /// Damage before the strength bonus.
    pub base_damage: u32,
    /// Flat damage reduction.
    #[serde(default)]
    pub defense: u32,
    /// Raw dodge probability in `[0, 1]`.
    #[serde(default)]
    pub dodge: f64,
}

impl MonsterDefinition {
    /// Instantiates a fresh monster at `level`.
    #[must_use]
    pub fn spawn(&self, level: u32) -> MonsterPayload {
        MonsterPayload::new(
            self.name.clone(),
            level,
            self.stats,
            self.base_damage,
            self.defense,
            self.dodge,
        )
    }
}

/// Items every hero receives before the first round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct StarterKit {
    /// Copies of the first listed potion.
    #[serde(default = "default_potion_copies")]
    pub potion_copies: u32,
}

impl Default for StarterKit {
    fn default() -> Self {
        Self {
            potion_copies: default_potion_copies(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentManifest {
    version: u32,
    #[serde(default)]
    starter: StarterKit,
    #[serde(default, rename = "hero")]
    heroes: Vec<HeroDefinition>,
    #[serde(default, rename = "monster")]
    monsters: Vec<MonsterDefinition>,
    #[serde(default, rename = "weapon")]
    weapons: Vec<Weapon>,
    #[serde(default, rename = "armor")]
    armors: Vec<Armor>,
    #[serde(default, rename = "potion")]
    potions: Vec<Potion>,
    #[serde(default, rename = "spell")]
    spells: Vec<Spell>,
}

/// Loaded content: hero roster, monster templates and market stock.
#[derive(Clone, Debug)]
pub struct Catalog {
    heroes: Vec<HeroDefinition>,
    monsters: Vec<MonsterDefinition>,
    stock: Vec<Item>,
    starter: StarterKit,
}

impl Catalog {
    /// Loads the manifest bundled with the crate.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_toml_str(EMBEDDED_CONTENT)
    }

    /// Reads and validates a manifest from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded content manifest");
        Ok(catalog)
    }

    /// Parses and validates a manifest held in memory.
    pub fn from_toml_str(contents: &str) -> Result<Self, ContentError> {
        let manifest: ContentManifest = toml::from_str(contents)?;
        if manifest.version != SUPPORTED_CONTENT_VERSION {
            return Err(ContentError::UnsupportedVersion {
                found: manifest.version,
            });
        }
        validate_heroes(&manifest.heroes)?;
        validate_monsters(&manifest.monsters)?;

        let stock: Vec<Item> = manifest
            .weapons
            .into_iter()
            .map(Item::Weapon)
            .chain(manifest.armors.into_iter().map(Item::Armor))
            .chain(manifest.potions.into_iter().map(Item::Potion))
            .chain(manifest.spells.into_iter().map(Item::Spell))
            .collect();
        validate_stock(&stock)?;

        Ok(Self {
            heroes: manifest.heroes,
            monsters: manifest.monsters,
            stock,
            starter: manifest.starter,
        })
    }

    /// Hero blueprints in declaration order.
    #[must_use]
    pub fn heroes(&self) -> &[HeroDefinition] {
        &self.heroes
    }

    /// Monster templates in declaration order.
    #[must_use]
    pub fn monsters(&self) -> &[MonsterDefinition] {
        &self.monsters
    }

    /// Market stock: weapons, armor, potions, then spells.
    #[must_use]
    pub fn stock(&self) -> &[Item] {
        &self.stock
    }

    /// Builds a hero by name with the starter kit applied.
    pub fn hero(&self, name: &str) -> Result<HeroPayload, ContentError> {
        let definition = self
            .heroes
            .iter()
            .find(|hero| hero.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ContentError::UnknownHero(name.to_owned()))?;
        self.outfit(definition)
    }

    /// Builds the party fielded in lane order.
    ///
    /// An empty `names` slice selects the first [`PARTY_SIZE`] heroes.
    pub fn party(&self, names: &[String]) -> Result<Vec<HeroPayload>, ContentError> {
        if names.is_empty() {
            if self.heroes.len() < PARTY_SIZE {
                return Err(ContentError::NotEnoughHeroes {
                    needed: PARTY_SIZE,
                    available: self.heroes.len(),
                });
            }
            return self.heroes[..PARTY_SIZE]
                .iter()
                .map(|definition| self.outfit(definition))
                .collect();
        }
        names.iter().map(|name| self.hero(name)).collect()
    }

    fn outfit(&self, definition: &HeroDefinition) -> Result<HeroPayload, ContentError> {
        let mut hero = HeroPayload::new(
            definition.name.clone(),
            definition.level,
            definition.stats,
            definition.gold,
        );
        self.apply_starter_kit(&mut hero)?;
        Ok(hero)
    }

    /// Equips the cheapest usable weapon and adds the starter potions.
    pub fn apply_starter_kit(&self, hero: &mut HeroPayload) -> Result<(), ContentError> {
        let weapon = self
            .stock
            .iter()
            .filter_map(|item| match item {
                Item::Weapon(weapon) if weapon.required_level <= hero.level => Some(weapon),
                _ => None,
            })
            .min_by_key(|weapon| weapon.price);
        if let Some(weapon) = weapon {
            let displaced = hero
                .equip_weapon(weapon.clone())
                .map_err(|source| ContentError::StarterKit {
                    hero: hero.name.clone(),
                    source,
                })?;
            for previous in displaced {
                hero.inventory.add(Item::Weapon(previous));
            }
        }

        let potion = self.stock.iter().find_map(|item| match item {
            Item::Potion(potion) => Some(potion),
            _ => None,
        });
        if let Some(potion) = potion {
            for _ in 0..self.starter.potion_copies {
                hero.inventory.add(Item::Potion(potion.clone()));
            }
        }
        Ok(())
    }

    /// Opens the market over this catalog's stock.
    #[must_use]
    pub fn market(&self) -> Market<'_> {
        Market::new(&self.stock)
    }
}

impl MonsterTemplates for Catalog {
    fn monster_for_level<R: Rng + ?Sized>(
        &self,
        level: u32,
        rng: &mut R,
    ) -> Option<MonsterPayload> {
        let template_level = self
            .monsters
            .iter()
            .map(|monster| monster.level)
            .filter(|candidate| *candidate <= level)
            .max()
            .or_else(|| self.monsters.iter().map(|monster| monster.level).min())?;
        let candidates: Vec<&MonsterDefinition> = self
            .monsters
            .iter()
            .filter(|monster| monster.level == template_level)
            .collect();
        let pick = candidates[rng.gen_range(0..candidates.len())];
        debug!(
            template = %pick.name,
            template_level,
            level,
            "picked monster template"
        );
        Some(pick.spawn(level))
    }
}

fn validate_heroes(heroes: &[HeroDefinition]) -> Result<(), ContentError> {
    if heroes.is_empty() {
        return Err(ContentError::Empty("heroes"));
    }
    check_unique("hero", heroes.iter().map(|hero| hero.name.as_str()))?;
    for hero in heroes {
        if hero.level == 0 {
            return Err(invalid("hero", &hero.name, "level must be at least 1"));
        }
        if hero.stats.max_hp == 0 {
            return Err(invalid("hero", &hero.name, "max_hp must be positive"));
        }
    }
    Ok(())
}

fn validate_monsters(monsters: &[MonsterDefinition]) -> Result<(), ContentError> {
    if monsters.is_empty() {
        return Err(ContentError::Empty("monsters"));
    }
    check_unique("monster", monsters.iter().map(|monster| monster.name.as_str()))?;
    for monster in monsters {
        if monster.level == 0 {
            return Err(invalid("monster", &monster.name, "level must be at least 1"));
        }
        if monster.stats.max_hp == 0 {
            return Err(invalid("monster", &monster.name, "max_hp must be positive"));
        }
        if !(0.0..=1.0).contains(&monster.dodge) {
            return Err(invalid("monster", &monster.name, "dodge must lie in [0, 1]"));
        }
    }
    Ok(())
}

fn validate_stock(stock: &[Item]) -> Result<(), ContentError> {
    check_unique("item", stock.iter().map(Item::name))?;
    for item in stock {
        if let Item::Weapon(weapon) = item {
            if !(1..=2).contains(&weapon.hands) {
                return Err(invalid("weapon", &weapon.name, "hands must be 1 or 2"));
            }
        }
    }
    Ok(())
}

fn check_unique<'a>(
    section: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ContentError::Duplicate {
                section,
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

fn invalid(section: &'static str, name: &str, reason: &'static str) -> ContentError {
    ContentError::Invalid {
        section,
        name: name.to_owned(),
        reason,
    }
}

const fn default_level() -> u32 {
    1
}

const fn default_potion_copies() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SMALL: &str = r#"
        version = 1

        [[hero]]
        name = "Ayla"
        max_hp = 100
        max_mp = 50
        agility = 100
        gold = 300

        [[monster]]
        name = "Low"
        level = 1
        max_hp = 50
        base_damage = 10

        [[monster]]
        name = "Mid"
        level = 3
        max_hp = 150
        base_damage = 30
        dodge = 0.2

        [[weapon]]
        name = "Club"
        price = 90
        required_level = 1
        damage = 40
        hands = 1

        [[weapon]]
        name = "Stick"
        price = 10
        required_level = 1
        damage = 5
        hands = 1

        [[weapon]]
        name = "Halberd"
        price = 5
        required_level = 4
        damage = 200
        hands = 2

        [[potion]]
        name = "Tonic"
        price = 20
        required_level = 1
        amount = 30
        stat = "hp"
    "#;

    #[test]
    fn embedded_manifest_loads() {
        let catalog = Catalog::embedded().expect("embedded content");
        assert!(catalog.heroes().len() >= PARTY_SIZE);
        assert!(catalog.monsters().iter().any(|monster| monster.level == 1));
        assert!(!catalog.stock().is_empty());
    }

    #[test]
    fn starter_kit_equips_cheapest_usable_weapon() {
        let catalog = Catalog::from_toml_str(SMALL).expect("content");
        let hero = catalog.hero("ayla").expect("hero");
        assert_eq!(hero.level, 1);
        assert_eq!(hero.main_hand.as_ref().map(|w| w.name.as_str()), Some("Stick"));
        assert_eq!(hero.inventory.potions().count(), 2);
        assert_eq!(hero.hp, 100);
    }

    #[test]
    fn missing_level_falls_back_to_closest_lower_template() {
        let catalog = Catalog::from_toml_str(SMALL).expect("content");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let monster = catalog.monster_for_level(2, &mut rng).expect("template");
        assert_eq!(monster.name, "Low");
        assert_eq!(monster.level, 2);
        let monster = catalog.monster_for_level(9, &mut rng).expect("template");
        assert_eq!(monster.name, "Mid");
        assert_eq!(monster.level, 9);
    }

    #[test]
    fn level_below_every_template_uses_the_lowest() {
        let raised = SMALL.replace(
            "level = 1\n        max_hp = 50",
            "level = 2\n        max_hp = 50",
        );
        let catalog = Catalog::from_toml_str(&raised).expect("content");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let monster = catalog.monster_for_level(1, &mut rng).expect("template");
        assert_eq!(monster.name, "Low");
        assert_eq!(monster.level, 1);
    }

    #[test]
    fn rejects_wrong_version() {
        let error = Catalog::from_toml_str(&SMALL.replace("version = 1", "version = 2"))
            .expect_err("version");
        assert!(matches!(error, ContentError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn rejects_duplicate_items() {
        let error = Catalog::from_toml_str(&SMALL.replace("\"Club\"", "\"Stick\""))
            .expect_err("duplicate");
        assert!(matches!(error, ContentError::Duplicate { section: "item", .. }));
    }

    #[test]
    fn rejects_out_of_range_dodge() {
        let error = Catalog::from_toml_str(&SMALL.replace("dodge = 0.2", "dodge = 1.5"))
            .expect_err("dodge");
        assert!(matches!(error, ContentError::Invalid { section: "monster", .. }));
    }

    #[test]
    fn small_roster_cannot_field_a_default_party() {
        let catalog = Catalog::from_toml_str(SMALL).expect("content");
        assert!(matches!(
            catalog.party(&[]),
            Err(ContentError::NotEnoughHeroes {
                needed: 3,
                available: 1
            })
        ));
        let party = catalog.party(&["Ayla".to_owned()]).expect("named party");
        assert_eq!(party.len(), 1);
        assert!(matches!(
            catalog.party(&["Nobody".to_owned()]),
            Err(ContentError::UnknownHero(_))
        ));
    }
}
