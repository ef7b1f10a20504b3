#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nexus Lanes engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Controllers submit [`Command`] values
//! describing desired unit actions, the world validates and executes those
//! commands via its `apply` entry point, and then reports [`Event`] values that
//! systems and presentation layers consume. Rejected commands surface as
//! [`ActionError`] values and never mutate state.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

mod payload;

pub use payload::{
    Armor, HeroPayload, Inventory, Item, ItemKind, MonsterPayload, Payload, Potion, PotionStat,
    Spell, SpellKind, Stats, Weapon, EXPERIENCE_PER_HERO_LEVEL, EXPERIENCE_PER_MONSTER_LEVEL,
    GOLD_PER_MONSTER_LEVEL, LEVEL_UP_GROWTH,
};

/// Number of columns every lane board spans: three two-column lanes and two wall columns.
pub const BOARD_COLUMNS: u32 = 8;

/// Columns permanently occupied by lane-separating walls.
pub const WALL_COLUMNS: [u32; 2] = [2, 5];

/// Stat bonus granted while a unit stands on buff terrain.
pub const TERRAIN_BUFF: i32 = 3;

/// Upper bound applied to every effective dodge probability.
pub const MAX_DODGE_CHANCE: f64 = 0.60;

/// Dodge probability gained per accumulated agility buff point.
pub const DODGE_PER_AGILITY_BUFF: f64 = 0.01;

/// Side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Heroes start on the last row and advance toward row 0.
    Hero,
    /// Monsters start on row 0 and advance toward the last row.
    Monster,
}

impl Side {
    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Hero => Self::Monster,
            Self::Monster => Self::Hero,
        }
    }

    /// Letter prefix used when formatting unit identifiers.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Hero => 'H',
            Self::Monster => 'M',
        }
    }
}

/// Stable identifier assigned to a unit, formatted as `H1`, `M2` and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    side: Side,
    number: u32,
}

impl UnitId {
    /// Creates a hero identifier with the provided 1-based number.
    #[must_use]
    pub const fn hero(number: u32) -> Self {
        Self {
            side: Side::Hero,
            number,
        }
    }

    /// Creates a monster identifier with the provided 1-based number.
    #[must_use]
    pub const fn monster(number: u32) -> Self {
        Self {
            side: Side::Monster,
            number,
        }
    }

    /// Side the identified unit belongs to.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Numeric part of the identifier.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.prefix(), self.number)
    }
}

/// Reasons a textual unit identifier could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a unit identifier (expected H<n> or M<n>)")]
pub struct UnitIdParseError(String);

impl FromStr for UnitId {
    type Err = UnitIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        let side = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('H') => Side::Hero,
            Some('M') => Side::Monster,
            _ => return Err(UnitIdParseError(trimmed.to_owned())),
        };
        let number: u32 = chars
            .as_str()
            .parse()
            .map_err(|_| UnitIdParseError(trimmed.to_owned()))?;
        if number == 0 {
            return Err(UnitIdParseError(trimmed.to_owned()));
        }
        Ok(Self { side, number })
    }
}

/// Cardinal movement directions available to units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices (the monster nexus).
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices (the hero nexus).
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in the order teleport candidates are examined.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell in the provided direction.
    ///
    /// Steps that would underflow row or column zero yield `None`; upper bounds
    /// are checked by the board that owns the coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Lane containing the cell, if the column lies inside one.
    #[must_use]
    pub const fn lane(self) -> Option<Lane> {
        lane_for_column(self.column)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

/// One of the three parallel corridors separated by wall columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    /// Columns 0 and 1.
    Left,
    /// Columns 3 and 4.
    Middle,
    /// Columns 6 and 7.
    Right,
}

impl Lane {
    /// All lanes in left-to-right order.
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Middle, Lane::Right];

    /// Zero-based lane index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }

    /// The two columns that make up the lane.
    #[must_use]
    pub const fn columns(self) -> [u32; 2] {
        match self {
            Self::Left => [0, 1],
            Self::Middle => [3, 4],
            Self::Right => [6, 7],
        }
    }

    /// Returns the other column of the lane, if `column` belongs to it.
    #[must_use]
    pub const fn partner_column(self, column: u32) -> Option<u32> {
        let [first, second] = self.columns();
        if column == first {
            Some(second)
        } else if column == second {
            Some(first)
        } else {
            None
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.index())
    }
}

/// Maps a board column onto its lane; wall columns and anything past the board yield `None`.
#[must_use]
pub const fn lane_for_column(column: u32) -> Option<Lane> {
    match column {
        0 | 1 => Some(Lane::Left),
        3 | 4 => Some(Lane::Middle),
        6 | 7 => Some(Lane::Right),
        _ => None,
    }
}

/// Attributes that terrain can buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKind {
    /// Adds to physical attack.
    Strength,
    /// Adds to spell power.
    Dexterity,
    /// Adds to dodge probability.
    Agility,
}

/// Accumulated terrain buff deltas carried by a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StatBuffs {
    /// Strength delta.
    pub strength: i32,
    /// Dexterity delta.
    pub dexterity: i32,
    /// Agility delta.
    pub agility: i32,
}

impl StatBuffs {
    /// Reads the delta accumulated for a single stat.
    #[must_use]
    pub const fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Strength => self.strength,
            StatKind::Dexterity => self.dexterity,
            StatKind::Agility => self.agility,
        }
    }

    /// Adds `delta` to the accumulator for `stat`.
    pub fn add(&mut self, stat: StatKind, delta: i32) {
        let slot = match stat {
            StatKind::Strength => &mut self.strength,
            StatKind::Dexterity => &mut self.dexterity,
            StatKind::Agility => &mut self.agility,
        };
        *slot = slot.saturating_add(delta);
    }

    /// Reports whether every accumulator is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.strength == 0 && self.dexterity == 0 && self.agility == 0
    }
}

/// Classification of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Neutral ground.
    Plain,
    /// Overthinking fog; grants dexterity.
    Bush,
    /// Shadowed memories; grants agility.
    Cave,
    /// Ego spire; grants strength.
    Koulou,
    /// Removable rubble that blocks movement until a hero clears it.
    Obstacle,
    /// Permanently impassable lane wall.
    Wall,
    /// Nexus row cell.
    Nexus,
}

impl TerrainKind {
    /// Parses a board glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'P' => Some(Self::Plain),
            'B' => Some(Self::Bush),
            'C' => Some(Self::Cave),
            'K' => Some(Self::Koulou),
            'O' => Some(Self::Obstacle),
            'I' => Some(Self::Wall),
            'N' => Some(Self::Nexus),
            _ => None,
        }
    }

    /// Glyph used to describe the terrain on text boards.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Plain => 'P',
            Self::Bush => 'B',
            Self::Cave => 'C',
            Self::Koulou => 'K',
            Self::Obstacle => 'O',
            Self::Wall => 'I',
            Self::Nexus => 'N',
        }
    }

    /// Stat buffed while a unit stands on this terrain.
    #[must_use]
    pub const fn buff(self) -> Option<StatKind> {
        match self {
            Self::Bush => Some(StatKind::Dexterity),
            Self::Cave => Some(StatKind::Agility),
            Self::Koulou => Some(StatKind::Strength),
            Self::Plain | Self::Obstacle | Self::Wall | Self::Nexus => None,
        }
    }

    /// Reports whether units may ever stand on this terrain.
    ///
    /// Obstacles report `true`: whether one still blocks is tracked separately
    /// by the world because heroes can clear them.
    #[must_use]
    pub const fn is_accessible(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Difficulty tier selecting wave cadence and monster buff policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// A wave every six rounds; monsters ignore terrain buffs.
    Easy,
    /// A wave every four rounds.
    #[default]
    Medium,
    /// A wave every two rounds.
    Hard,
}

impl Difficulty {
    /// Number of rounds between monster waves.
    #[must_use]
    pub const fn spawn_interval(self) -> u32 {
        match self {
            Self::Easy => 6,
            Self::Medium => 4,
            Self::Hard => 2,
        }
    }

    /// Reports whether monsters receive terrain buffs.
    #[must_use]
    pub const fn allows_monster_buffs(self) -> bool {
        !matches!(self, Self::Easy)
    }
}

/// Reasons a difficulty name could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
pub struct DifficultyParseError(String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(DifficultyParseError(other.to_owned())),
        }
    }
}

/// Level assigned to monsters spawned by the wave at the end of `round`.
#[must_use]
pub const fn wave_level(round: u32) -> u32 {
    1 + round / 6
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves a hero a single orthogonal step.
    MoveHero {
        /// Hero attempting to move.
        hero: UnitId,
        /// Direction of the step.
        direction: Direction,
    },
    /// Redeploys a hero next to an ally standing in another lane.
    TeleportHero {
        /// Hero being redeployed.
        hero: UnitId,
        /// Ally the hero lands next to.
        ally: UnitId,
    },
    /// Returns a hero to its home nexus cell.
    RecallHero {
        /// Hero being recalled.
        hero: UnitId,
    },
    /// Permanently removes an obstacle orthogonally adjacent to the hero.
    ClearObstacle {
        /// Hero clearing the obstacle.
        hero: UnitId,
        /// Cell holding the obstacle.
        cell: CellCoord,
    },
    /// Physical attack against an engaged opponent.
    Attack {
        /// Attacking unit.
        attacker: UnitId,
        /// Defending unit.
        target: UnitId,
    },
    /// Casts a spell from the hero's inventory at an engaged monster.
    CastSpell {
        /// Casting hero.
        caster: UnitId,
        /// Inventory index of the spell.
        spell: usize,
        /// Monster receiving the spell.
        target: UnitId,
    },
    /// Drinks a potion from the hero's inventory.
    UsePotion {
        /// Hero drinking the potion.
        hero: UnitId,
        /// Inventory index of the potion.
        potion: usize,
    },
    /// Equips a weapon from the hero's inventory.
    EquipWeapon {
        /// Hero changing weapons.
        hero: UnitId,
        /// Inventory index of the weapon.
        item: usize,
    },
    /// Equips armor from the hero's inventory.
    EquipArmor {
        /// Hero changing armor.
        hero: UnitId,
        /// Inventory index of the armor.
        item: usize,
    },
    /// Opens the nexus market; only valid while the hero stands on its home row.
    OpenMarket {
        /// Hero visiting the market.
        hero: UnitId,
    },
    /// Spends the unit's action without doing anything.
    Hold {
        /// Unit holding position.
        unit: UnitId,
    },
    /// Moves a monster a single orthogonal step.
    MoveMonster {
        /// Monster attempting to move.
        monster: UnitId,
        /// Direction of the step.
        direction: Direction,
    },
    /// Start-of-round upkeep: respawns fallen heroes.
    BeginRound {
        /// Round that is starting (1-based).
        round: u32,
    },
    /// End-of-round upkeep: regenerates living heroes.
    EndRound {
        /// Round that is ending (1-based).
        round: u32,
    },
    /// Adds a new monster to the roster.
    SpawnMonster {
        /// Cell the monster appears on.
        cell: CellCoord,
        /// Stat payload of the new monster.
        payload: MonsterPayload,
    },
}

impl Command {
    /// Unit performing the command, if it is a unit action.
    #[must_use]
    pub const fn actor(&self) -> Option<UnitId> {
        match self {
            Self::MoveHero { hero, .. }
            | Self::TeleportHero { hero, .. }
            | Self::RecallHero { hero }
            | Self::ClearObstacle { hero, .. }
            | Self::UsePotion { hero, .. }
            | Self::EquipWeapon { hero, .. }
            | Self::EquipArmor { hero, .. }
            | Self::OpenMarket { hero } => Some(*hero),
            Self::Attack { attacker, .. } => Some(*attacker),
            Self::CastSpell { caster, .. } => Some(*caster),
            Self::Hold { unit } => Some(*unit),
            Self::MoveMonster { monster, .. } => Some(*monster),
            Self::BeginRound { .. } | Self::EndRound { .. } | Self::SpawnMonster { .. } => None,
        }
    }

    /// Reports whether the command belongs to a hero's per-round action menu.
    #[must_use]
    pub fn is_hero_action(&self) -> bool {
        match self {
            Self::MoveMonster { .. }
            | Self::BeginRound { .. }
            | Self::EndRound { .. }
            | Self::SpawnMonster { .. } => false,
            other => other.actor().map(|unit| unit.side()) == Some(Side::Hero),
        }
    }
}

/// Result of a single attack or spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// The defender dodged; nothing changed.
    Dodged,
    /// The defender took damage.
    Hit {
        /// Damage dealt after defense, never below one.
        damage: u32,
        /// Defender hit points left after the hit.
        remaining_hp: u32,
    },
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// A hero reached the monster nexus row.
    Victory,
    /// A monster reached the hero nexus row.
    Defeat,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new round started.
    RoundStarted {
        /// Round number (1-based).
        round: u32,
    },
    /// A fallen hero returned at its home nexus with full resources.
    HeroRespawned {
        /// Hero that respawned.
        hero: UnitId,
        /// Home nexus cell.
        cell: CellCoord,
    },
    /// A hero stepped to a neighbouring cell.
    HeroMoved {
        /// Hero that moved.
        hero: UnitId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// A hero teleported next to an ally in another lane.
    HeroTeleported {
        /// Hero that teleported.
        hero: UnitId,
        /// Ally used as the anchor.
        ally: UnitId,
        /// Cell occupied before the teleport.
        from: CellCoord,
        /// Landing cell.
        to: CellCoord,
    },
    /// A hero was recalled to its home nexus.
    HeroRecalled {
        /// Hero that was recalled.
        hero: UnitId,
        /// Cell occupied before the recall.
        from: CellCoord,
        /// Home nexus cell.
        to: CellCoord,
    },
    /// A unit spent its action holding position.
    Held {
        /// Unit that held.
        unit: UnitId,
    },
    /// An obstacle was cleared and became plain ground.
    ObstacleCleared {
        /// Hero that cleared it.
        hero: UnitId,
        /// Cell that was cleared.
        cell: CellCoord,
    },
    /// An attack or spell was resolved.
    Struck {
        /// Unit that attacked.
        attacker: UnitId,
        /// Unit that defended.
        target: UnitId,
        /// Spell name when the strike was a spell.
        spell: Option<String>,
        /// Outcome of the strike.
        outcome: StrikeOutcome,
    },
    /// A unit's hit points reached zero.
    UnitDied {
        /// Unit that died.
        unit: UnitId,
    },
    /// A hero was paid for slaying a monster.
    RewardEarned {
        /// Hero that landed the killing blow.
        hero: UnitId,
        /// Gold added.
        gold: u32,
        /// Experience added.
        experience: u32,
    },
    /// A hero reached a new level.
    HeroLevelledUp {
        /// Hero that levelled up.
        hero: UnitId,
        /// Level reached.
        level: u32,
    },
    /// A hero drank a potion.
    PotionUsed {
        /// Hero that drank.
        hero: UnitId,
        /// Potion name.
        item: String,
    },
    /// A hero equipped a weapon.
    WeaponEquipped {
        /// Hero that equipped.
        hero: UnitId,
        /// Weapon name.
        item: String,
    },
    /// A hero equipped armor.
    ArmorEquipped {
        /// Hero that equipped.
        hero: UnitId,
        /// Armor name.
        item: String,
    },
    /// A hero opened the nexus market.
    MarketOpened {
        /// Hero visiting the market.
        hero: UnitId,
    },
    /// A monster stepped to a neighbouring cell.
    MonsterMoved {
        /// Monster that moved.
        monster: UnitId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// End-of-round regeneration restored a living hero.
    HeroRegenerated {
        /// Hero that regenerated.
        hero: UnitId,
        /// Hit points restored.
        hp: u32,
        /// Mana points restored.
        mp: u32,
    },
    /// A monster joined the roster.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: UnitId,
        /// Lane it spawned in.
        lane: Lane,
        /// Spawn cell.
        cell: CellCoord,
        /// Monster level.
        level: u32,
    },
    /// A round finished its end-of-round upkeep.
    RoundEnded {
        /// Round number (1-based).
        round: u32,
    },
    /// The session reached a terminal outcome.
    GameOver {
        /// Victory or defeat.
        outcome: GameOutcome,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted { round } => write!(f, "round {round} begins"),
            Self::HeroRespawned { hero, cell } => write!(f, "{hero} respawns at {cell}"),
            Self::HeroMoved { hero, from, to } | Self::HeroRecalled { hero, from, to } => {
                write!(f, "{hero} moves {from} -> {to}")
            }
            Self::HeroTeleported {
                hero,
                ally,
                from,
                to,
            } => write!(f, "{hero} teleports {from} -> {to} beside {ally}"),
            Self::Held { unit } => match unit.side() {
                Side::Hero => write!(f, "{unit} waits"),
                Side::Monster => write!(f, "{unit} is stuck"),
            },
            Self::ObstacleCleared { hero, cell } => {
                write!(f, "{hero} clears the obstacle at {cell}")
            }
            Self::Struck {
                attacker,
                target,
                spell,
                outcome,
            } => {
                let verb = match spell {
                    Some(name) => format!("casts {name} on"),
                    None => "attacks".to_owned(),
                };
                match outcome {
                    StrikeOutcome::Dodged => write!(f, "{attacker} {verb} {target}, who dodges"),
                    StrikeOutcome::Hit {
                        damage,
                        remaining_hp,
                    } => write!(
                        f,
                        "{attacker} {verb} {target} for {damage} damage ({remaining_hp} hp left)"
                    ),
                }
            }
            Self::UnitDied { unit } => write!(f, "{unit} falls"),
            Self::RewardEarned {
                hero,
                gold,
                experience,
            } => write!(f, "{hero} earns {gold} gold and {experience} xp"),
            Self::HeroLevelledUp { hero, level } => write!(f, "{hero} reaches level {level}"),
            Self::PotionUsed { hero, item } => write!(f, "{hero} drinks {item}"),
            Self::WeaponEquipped { hero, item } | Self::ArmorEquipped { hero, item } => {
                write!(f, "{hero} equips {item}")
            }
            Self::MarketOpened { hero } => write!(f, "{hero} visits the nexus market"),
            Self::MonsterMoved { monster, from, to } => write!(f, "{monster} moves {from} -> {to}"),
            Self::HeroRegenerated { hero, hp, mp } => {
                write!(f, "{hero} regenerates {hp} hp and {mp} mp")
            }
            Self::MonsterSpawned {
                monster,
                lane,
                cell,
                level,
            } => write!(f, "{monster} (level {level}) spawns in {lane} at {cell}"),
            Self::RoundEnded { round } => write!(f, "round {round} ends"),
            Self::GameOver { outcome } => match outcome {
                GameOutcome::Victory => write!(f, "a hero reached the monster nexus: victory"),
                GameOutcome::Defeat => write!(f, "a monster reached the hero nexus: defeat"),
            },
        }
    }
}

/// Reasons the world may reject a command. Rejections never mutate state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// No unit with the identifier exists.
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),
    /// The unit is dead and cannot act or be targeted.
    #[error("unit {0} is down")]
    UnitDown(UnitId),
    /// The unit's side cannot perform the requested command.
    #[error("unit {0} cannot perform that action")]
    WrongSide(UnitId),
    /// The command is not part of the hero action menu.
    #[error("that command is not a hero action")]
    NotAHeroAction,
    /// The command names a different actor than the one whose turn it is.
    #[error("it is {expected}'s turn, not {actor}'s")]
    OutOfTurn {
        /// Unit whose turn it is.
        expected: UnitId,
        /// Unit named by the command.
        actor: UnitId,
    },
    /// The destination lies outside the board.
    #[error("destination lies outside the board")]
    OutOfBounds,
    /// The destination is a wall.
    #[error("cell {0} is not accessible")]
    Inaccessible(CellCoord),
    /// The destination holds an uncleared obstacle.
    #[error("cell {0} is blocked by an obstacle")]
    Obstructed(CellCoord),
    /// The destination is held by a living unit of the same side.
    #[error("cell {0} is already occupied by an ally")]
    Occupied(CellCoord),
    /// The destination lies past the nearest opposing unit in its lane.
    #[error("cell {0} lies past the enemy front in its lane")]
    LaneBlocked(CellCoord),
    /// The cell is not inside any lane.
    #[error("cell {0} is not inside a lane")]
    NoLane(CellCoord),
    /// Teleports must cross into a different lane.
    #[error("teleport target shares the hero's lane")]
    SameLane,
    /// A hero cannot target itself.
    #[error("a unit cannot target itself")]
    SelfTarget,
    /// Every cell around the ally was illegal.
    #[error("no legal landing cell next to {0}")]
    NoTeleportDestination(UnitId),
    /// The cell is not orthogonally adjacent to the hero.
    #[error("cell {0} is not adjacent")]
    NotAdjacent(CellCoord),
    /// The cell holds no obstacle.
    #[error("cell {0} holds no obstacle")]
    NoObstacle(CellCoord),
    /// The target is not within engagement range.
    #[error("{attacker} is not engaged with {target}")]
    NotEngaged {
        /// Unit attempting the strike.
        attacker: UnitId,
        /// Intended target.
        target: UnitId,
    },
    /// The caster lacks the mana for the spell.
    #[error("spell needs {required} mp but only {available} mp is available")]
    InsufficientMana {
        /// Mana cost of the spell.
        required: u32,
        /// Mana the caster has.
        available: u32,
    },
    /// The hero is below the item's required level.
    #[error("item requires level {required} but hero is level {level}")]
    LevelTooLow {
        /// Level the item requires.
        required: u32,
        /// Hero's current level.
        level: u32,
    },
    /// The inventory has no item at the index.
    #[error("no inventory item at index {0}")]
    NoSuchItem(usize),
    /// The inventory item is of a different kind.
    #[error("inventory item {index} is not a {expected}")]
    WrongItemKind {
        /// Inventory index that was named.
        index: usize,
        /// Kind the command required.
        expected: ItemKind,
    },
    /// The market is only reachable from the hero nexus row.
    #[error("the market can only be opened from the home row")]
    NotOnHomeRow,
    /// The home nexus cell is held by another hero.
    #[error("home nexus {0} is occupied")]
    HomeOccupied(CellCoord),
    /// The spawn cell already holds a living monster.
    #[error("spawn cell {0} is occupied")]
    SpawnOccupied(CellCoord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn lane_partition_follows_wall_columns() {
        let lanes: Vec<Option<Lane>> = (0..BOARD_COLUMNS).map(lane_for_column).collect();
        assert_eq!(
            lanes,
            vec![
                Some(Lane::Left),
                Some(Lane::Left),
                None,
                Some(Lane::Middle),
                Some(Lane::Middle),
                None,
                Some(Lane::Right),
                Some(Lane::Right),
            ]
        );
        for wall in WALL_COLUMNS {
            assert!(lane_for_column(wall).is_none());
        }
        assert!(lane_for_column(8).is_none());
    }

    #[test]
    fn partner_column_swaps_within_lane() {
        assert_eq!(Lane::Middle.partner_column(3), Some(4));
        assert_eq!(Lane::Middle.partner_column(4), Some(3));
        assert_eq!(Lane::Middle.partner_column(6), None);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn unit_ids_format_and_parse() {
        assert_eq!(UnitId::hero(1).to_string(), "H1");
        assert_eq!(UnitId::monster(12).to_string(), "M12");
        assert_eq!("h2".parse::<UnitId>(), Ok(UnitId::hero(2)));
        assert_eq!(" M7 ".parse::<UnitId>(), Ok(UnitId::monster(7)));
        assert!("X1".parse::<UnitId>().is_err());
        assert!("H0".parse::<UnitId>().is_err());
        assert!("H".parse::<UnitId>().is_err());
    }

    #[test]
    fn every_buff_terrain_grants_a_distinct_stat() {
        assert_eq!(TerrainKind::Bush.buff(), Some(StatKind::Dexterity));
        assert_eq!(TerrainKind::Cave.buff(), Some(StatKind::Agility));
        assert_eq!(TerrainKind::Koulou.buff(), Some(StatKind::Strength));
        for kind in [
            TerrainKind::Plain,
            TerrainKind::Obstacle,
            TerrainKind::Wall,
            TerrainKind::Nexus,
        ] {
            assert_eq!(kind.buff(), None);
        }
    }

    #[test]
    fn glyphs_round_trip_through_terrain_kinds() {
        for glyph in ['P', 'B', 'C', 'K', 'O', 'I', 'N'] {
            let kind = TerrainKind::from_glyph(glyph).expect("known glyph");
            assert_eq!(kind.glyph(), glyph);
        }
        assert_eq!(TerrainKind::from_glyph('?'), None);
    }

    #[test]
    fn difficulty_tiers_set_wave_interval() {
        assert_eq!(Difficulty::Easy.spawn_interval(), 6);
        assert_eq!(Difficulty::Medium.spawn_interval(), 4);
        assert_eq!(Difficulty::Hard.spawn_interval(), 2);
        assert!(!Difficulty::Easy.allows_monster_buffs());
        assert!(Difficulty::Hard.allows_monster_buffs());
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_deserializes_from_lowercase_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            difficulty: Difficulty,
        }

        let parsed: Wrapper = toml::from_str("difficulty = \"easy\"").expect("valid toml");
        assert_eq!(parsed.difficulty, Difficulty::Easy);
    }

    #[test]
    fn wave_level_grows_every_six_rounds() {
        assert_eq!(wave_level(2), 1);
        assert_eq!(wave_level(5), 1);
        assert_eq!(wave_level(6), 2);
        assert_eq!(wave_level(13), 3);
    }

    #[test]
    fn buffs_accumulate_independently() {
        let mut buffs = StatBuffs::default();
        buffs.add(StatKind::Strength, TERRAIN_BUFF);
        buffs.add(StatKind::Agility, TERRAIN_BUFF);
        buffs.add(StatKind::Strength, -TERRAIN_BUFF);
        assert_eq!(buffs.get(StatKind::Strength), 0);
        assert_eq!(buffs.get(StatKind::Agility), TERRAIN_BUFF);
        assert_eq!(buffs.get(StatKind::Dexterity), 0);
        assert!(!buffs.is_zero());
    }

    #[test]
    fn command_actor_identifies_hero_actions() {
        let hero = UnitId::hero(1);
        let monster = UnitId::monster(2);
        assert!(Command::RecallHero { hero }.is_hero_action());
        assert!(Command::Hold { unit: hero }.is_hero_action());
        assert!(!Command::Hold { unit: monster }.is_hero_action());
        assert!(!Command::MoveMonster {
            monster,
            direction: Direction::South
        }
        .is_hero_action());
        assert!(!Command::BeginRound { round: 1 }.is_hero_action());
        assert_eq!(Command::EndRound { round: 1 }.actor(), None);
    }

    #[test]
    fn monster_log_lines_read_naturally() {
        let moved = Event::MonsterMoved {
            monster: UnitId::monster(2),
            from: CellCoord::new(1, 0),
            to: CellCoord::new(1, 1),
        };
        assert_eq!(moved.to_string(), "M2 moves (0,1) -> (1,1)");

        let stuck = Event::Held {
            unit: UnitId::monster(3),
        };
        assert_eq!(stuck.to_string(), "M3 is stuck");

        let hit = Event::Struck {
            attacker: UnitId::monster(1),
            target: UnitId::hero(2),
            spell: None,
            outcome: StrikeOutcome::Hit {
                damage: 4,
                remaining_hp: 20,
            },
        };
        assert_eq!(hit.to_string(), "M1 attacks H2 for 4 damage (20 hp left)");
    }

    #[test]
    fn reward_lines_name_gold_experience_and_level() {
        let reward = Event::RewardEarned {
            hero: UnitId::hero(1),
            gold: 40,
            experience: 20,
        };
        assert_eq!(reward.to_string(), "H1 earns 40 gold and 20 xp");
        let level = Event::HeroLevelledUp {
            hero: UnitId::hero(1),
            level: 2,
        };
        assert_eq!(level.to_string(), "H1 reaches level 2");
    }
}
