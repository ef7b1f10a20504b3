//! Parses typed hero commands.

use anyhow::{anyhow, bail, Context, Result};
use nexus_lanes_core::{Command, Direction, Side, UnitId};
use nexus_lanes_system_rounds::Decision;
use nexus_lanes_world::{query, World};

pub(crate) const HELP: &str = "\
commands:
  w / a / s / d      move north / west / south / east
  t <H#>             teleport beside an ally in another lane
  r                  recall to your home nexus
  c                  clear an adjacent obstacle
  f [M#]             attack (defaults to the engaged monster)
  cast <slot> [M#]   cast the spell in an inventory slot
  p <slot>           drink the potion in an inventory slot
  ew <slot>          equip the weapon in an inventory slot
  ea <slot>          equip the armor in an inventory slot
  m                  open the nexus market (home row only)
  x                  wait
  i                  view inventory
  q                  quit";

/// Turns one input line into a decision for `hero`.
pub(crate) fn parse(line: &str, world: &World, hero: UnitId) -> Result<Decision> {
    let mut words = line.split_whitespace();
    let verb = words
        .next()
        .ok_or_else(|| anyhow!("type a command (h for help)"))?
        .to_ascii_lowercase();
    let arguments: Vec<&str> = words.collect();
    let allowed = match verb.as_str() {
        "cast" => 2,
        "t" | "f" | "p" | "ew" | "ea" => 1,
        _ => 0,
    };
    if let Some(extra) = arguments.get(allowed) {
        bail!("unexpected argument {extra:?}");
    }
    let argument = arguments.first().copied();

    let act = |command: Command| -> Result<Decision> { Ok(Decision::Act(command)) };
    let step = |direction: Direction| act(Command::MoveHero { hero, direction });
    match verb.as_str() {
        "w" => step(Direction::North),
        "a" => step(Direction::West),
        "s" => step(Direction::South),
        "d" => step(Direction::East),
        "t" => {
            let ally = unit_argument(argument, Side::Hero)?
                .ok_or_else(|| anyhow!("teleport needs an ally, e.g. t H2"))?;
            act(Command::TeleportHero { hero, ally })
        }
        "r" => act(Command::RecallHero { hero }),
        "c" => {
            let cell = query::adjacent_obstacle(world, hero)
                .ok_or_else(|| anyhow!("no obstacle next to {hero}"))?;
            act(Command::ClearObstacle { hero, cell })
        }
        "f" => {
            let target = target(argument, world, hero)?;
            act(Command::Attack {
                attacker: hero,
                target,
            })
        }
        "cast" => {
            let spell = slot(argument)?;
            let target = target(arguments.get(1).copied(), world, hero)?;
            act(Command::CastSpell {
                caster: hero,
                spell,
                target,
            })
        }
        "p" => act(Command::UsePotion {
            hero,
            potion: slot(argument)?,
        }),
        "ew" => act(Command::EquipWeapon {
            hero,
            item: slot(argument)?,
        }),
        "ea" => act(Command::EquipArmor {
            hero,
            item: slot(argument)?,
        }),
        "m" => act(Command::OpenMarket { hero }),
        "x" => act(Command::Hold { unit: hero }),
        "i" => Ok(Decision::ViewInventory),
        "q" => Ok(Decision::Quit),
        other => bail!("unknown command {other:?} (h for help)"),
    }
}

fn slot(argument: Option<&str>) -> Result<usize> {
    let text = argument.ok_or_else(|| anyhow!("missing inventory slot"))?;
    text.parse()
        .with_context(|| format!("{text:?} is not an inventory slot"))
}

fn unit_argument(argument: Option<&str>, side: Side) -> Result<Option<UnitId>> {
    let Some(text) = argument else {
        return Ok(None);
    };
    let id: UnitId = text
        .to_ascii_uppercase()
        .parse()
        .with_context(|| format!("{text:?} is not a unit"))?;
    if id.side() != side {
        bail!("{id} is on the wrong side");
    }
    Ok(Some(id))
}

fn target(argument: Option<&str>, world: &World, hero: UnitId) -> Result<UnitId> {
    match unit_argument(argument, Side::Monster)? {
        Some(id) => Ok(id),
        None => query::engaged_monster(world, hero)
            .ok_or_else(|| anyhow!("no monster in range of {hero}")),
    }
}
