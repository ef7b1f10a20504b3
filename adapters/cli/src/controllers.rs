//! Hero controllers: an interactive terminal prompt and a scripted autopilot.

use std::io::{BufRead, Write};

use nexus_lanes_content::Catalog;
use nexus_lanes_core::{ActionError, Command, Direction, HeroPayload, PotionStat, UnitId};
use nexus_lanes_system_rounds::{Decision, HeroController};
use nexus_lanes_world::{query, World};
use tracing::debug;

use crate::{input, render};

/// Reads hero decisions line by line and writes prompts and views.
pub(crate) struct Terminal<'a, R, W> {
    input: R,
    output: W,
    catalog: &'a Catalog,
    shown: Option<(u32, UnitId)>,
}

impl<'a, R: BufRead, W: Write> Terminal<'a, R, W> {
    pub(crate) fn new(input: R, output: W, catalog: &'a Catalog) -> Self {
        Self {
            input,
            output,
            catalog,
            shown: None,
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }

    fn say(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.output, "{text}");
    }
}

impl<R: BufRead, W: Write> HeroController for Terminal<'_, R, W> {
    fn decide(&mut self, world: &World, hero: UnitId, round: u32) -> Decision {
        if self.shown != Some((round, hero)) {
            self.shown = Some((round, hero));
            self.say(format_args!("\n== round {round}, {hero} to act =="));
            self.say(render::board(world));
            self.say(render::roster(world));
        }
        loop {
            let _ = write!(self.output, "{hero}> ");
            let _ = self.output.flush();
            let Some(line) = self.read_line() else {
                return Decision::Quit;
            };
            if matches!(line.trim(), "h" | "help" | "?") {
                self.say(input::HELP);
                continue;
            }
            match input::parse(&line, world, hero) {
                Ok(decision) => return decision,
                Err(error) => self.say(format_args!("{error:#}")),
            }
        }
    }

    fn rejected(&mut self, hero: UnitId, error: &ActionError) {
        self.say(format_args!("{hero}: {error}"));
    }

    fn show_inventory(&mut self, world: &World, hero: UnitId) {
        match query::hero_payload(world, hero) {
            Some(payload) => self.say(render::inventory(payload)),
            None => self.say(format_args!("{hero} carries nothing")),
        }
    }

    fn open_market(&mut self, hero: UnitId, payload: &mut HeroPayload) {
        let catalog = self.catalog;
        let market = catalog.market();
        loop {
            self.say(format_args!(
                "\n-- nexus market ({hero}, {} gold) --",
                payload.gold
            ));
            for (listing, item) in market.listings(payload.level) {
                self.say(format_args!("  {listing:>2}: {item}, {} gold", item.price()));
            }
            let _ = write!(self.output, "buy <listing>, or enter to leave> ");
            let _ = self.output.flush();
            let Some(line) = self.read_line() else {
                return;
            };
            let choice = line.trim();
            if choice.is_empty() {
                return;
            }
            match choice.parse::<usize>() {
                Ok(listing) => match market.buy(payload, listing) {
                    Ok(item) => self.say(format_args!("bought {}", item.name())),
                    Err(error) => self.say(format_args!("cannot buy: {error}")),
                },
                Err(_) => self.say(format_args!("{choice:?} is not a listing")),
            }
        }
    }
}

/// Plays every hero without input: drink when low, fight when engaged,
/// otherwise push north toward the monster nexus.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    stalled: Option<UnitId>,
}

impl Autopilot {
    fn choose(world: &World, hero: UnitId) -> Command {
        let hold = Command::Hold { unit: hero };
        let Some(view) = query::unit(world, hero) else {
            return hold;
        };
        if view.hp.saturating_mul(10) < view.max_hp.saturating_mul(3) {
            let potion = query::hero_payload(world, hero).and_then(|payload| {
                payload
                    .inventory
                    .potions()
                    .find(|(_, potion)| potion.stat == PotionStat::Hp)
                    .map(|(index, _)| index)
            });
            if let Some(potion) = potion {
                return Command::UsePotion { hero, potion };
            }
        }
        if let Some(target) = query::engaged_monster(world, hero) {
            return Command::Attack {
                attacker: hero,
                target,
            };
        }
        let can_step = |direction: Direction| {
            view.cell
                .step(direction)
                .is_some_and(|cell| query::can_enter(world, hero, cell))
        };
        if can_step(Direction::North) {
            return Command::MoveHero {
                hero,
                direction: Direction::North,
            };
        }
        if let Some(cell) = query::adjacent_obstacle(world, hero) {
            return Command::ClearObstacle { hero, cell };
        }
        for direction in [Direction::West, Direction::East] {
            if can_step(direction) {
                return Command::MoveHero { hero, direction };
            }
        }
        hold
    }
}

impl HeroController for Autopilot {
    fn decide(&mut self, world: &World, hero: UnitId, _round: u32) -> Decision {
        if self.stalled.take() == Some(hero) {
            return Decision::Act(Command::Hold { unit: hero });
        }
        Decision::Act(Self::choose(world, hero))
    }

    fn rejected(&mut self, hero: UnitId, error: &ActionError) {
        debug!(%hero, %error, "autopilot command rejected");
        self.stalled = Some(hero);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_lanes_core::{CellCoord, Difficulty, Item, Lane, MonsterPayload, Potion, Stats};
    use nexus_lanes_world::Board;

    fn world_with_hero() -> (World, UnitId) {
        let mut world = World::new(Board::standard(), Difficulty::Medium);
        let mut payload = HeroPayload::new(
            "Ayla",
            1,
            Stats {
                max_hp: 100,
                ..Stats::default()
            },
            500,
        );
        payload.inventory.add(Item::Potion(Potion {
            name: "Tonic".into(),
            price: 10,
            required_level: 1,
            amount: 50,
            stat: PotionStat::Hp,
        }));
        let hero = world.add_hero(Lane::Left, payload).expect("home free");
        (world, hero)
    }

    #[test]
    fn autopilot_marches_north_then_fights() {
        let (mut world, hero) = world_with_hero();
        let mut pilot = Autopilot::default();
        assert_eq!(
            pilot.decide(&world, hero, 0),
            Decision::Act(Command::MoveHero {
                hero,
                direction: Direction::North
            })
        );
        let monster = world
            .add_monster(
                CellCoord::new(0, 6),
                MonsterPayload::new(
                    "Grudge_Imp",
                    1,
                    Stats {
                        max_hp: 10,
                        ..Stats::default()
                    },
                    1,
                    0,
                    0.0,
                ),
            )
            .expect("spawn");
        assert_eq!(
            pilot.decide(&world, hero, 0),
            Decision::Act(Command::Attack {
                attacker: hero,
                target: monster
            })
        );
    }

    #[test]
    fn autopilot_holds_after_a_rejection() {
        let (world, hero) = world_with_hero();
        let mut pilot = Autopilot::default();
        pilot.rejected(hero, &ActionError::OutOfBounds);
        assert_eq!(
            pilot.decide(&world, hero, 0),
            Decision::Act(Command::Hold { unit: hero })
        );
        assert!(matches!(
            pilot.decide(&world, hero, 0),
            Decision::Act(Command::MoveHero { .. })
        ));
    }

    #[test]
    fn terminal_reprompts_on_bad_input_and_quits_at_eof() {
        let catalog = Catalog::embedded().expect("content");
        let (world, hero) = world_with_hero();
        let mut output = Vec::new();
        let mut terminal = Terminal::new(&b"dance\nh\nw\n"[..], &mut output, &catalog);
        assert_eq!(
            terminal.decide(&world, hero, 0),
            Decision::Act(Command::MoveHero {
                hero,
                direction: Direction::North
            })
        );
        assert_eq!(terminal.decide(&world, hero, 0), Decision::Quit);
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("unknown command \"dance\""));
        assert!(text.contains("commands:"));
        assert_eq!(text.matches("== round 0, H1 to act ==").count(), 1);
    }

    #[test]
    fn terminal_market_buys_until_blank_line() {
        let catalog = Catalog::embedded().expect("content");
        let (_, hero) = world_with_hero();
        let stats = Stats {
            max_hp: 100,
            ..Stats::default()
        };
        let mut payload = HeroPayload::new("Ayla", 1, stats, 500);
        let mut output = Vec::new();
        let mut terminal = Terminal::new(&b"0\n99\n\n"[..], &mut output, &catalog);
        terminal.open_market(hero, &mut payload);
        let first = &catalog.stock()[0];
        assert_eq!(payload.gold, 500 - first.price());
        assert_eq!(payload.inventory.len(), 1);
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains(&format!("bought {}", first.name())));
        assert!(text.contains("cannot buy: no listing 99"));
    }
}
