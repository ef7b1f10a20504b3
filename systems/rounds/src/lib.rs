#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round orchestration for Nexus Lanes.
//!
//! A [`Session`] owns the world and the seeded random stream and walks the
//! round lifecycle: respawn fallen heroes, let every living hero act through a
//! [`HeroController`], check for a winner, let every living monster act, check
//! again, then regenerate heroes and spawn the next wave.

use nexus_lanes_core::{ActionError, Command, Event, GameOutcome, HeroPayload, Side, UnitId};
use nexus_lanes_system_monster_tactics::MonsterTactics;
use nexus_lanes_system_spawning::{Config, MonsterTemplates, Spawning};
use nexus_lanes_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Rejected commands a hero may submit in one turn before it forfeits the
/// turn. Inventory views are free and never count.
pub const MAX_REJECTIONS: u32 = 16;

/// Lifecycle states of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fallen heroes respawn.
    RoundStart,
    /// Every living hero takes one action.
    HeroPhase,
    /// Every living monster takes one action.
    MonsterPhase,
    /// Heroes regenerate and waves spawn.
    RoundEnd,
    /// A hero reached the monster nexus.
    Victory,
    /// A monster reached the hero nexus.
    Defeat,
    /// The player left mid-game.
    Quit,
}

impl Phase {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Quit)
    }
}

impl From<GameOutcome> for Phase {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Victory => Self::Victory,
            GameOutcome::Defeat => Self::Defeat,
        }
    }
}

/// What a controller wants a hero to do next.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// Submit a hero action; it consumes the turn when accepted.
    Act(Command),
    /// Inspect the hero's inventory without spending the turn.
    ViewInventory,
    /// Abandon the session.
    Quit,
}

/// Source of hero decisions, such as an interactive prompt or a script.
pub trait HeroController {
    /// Chooses the next decision for `hero` during `round`.
    fn decide(&mut self, world: &World, hero: UnitId, round: u32) -> Decision;

    /// Called when the world rejected the hero's last command.
    fn rejected(&mut self, _hero: UnitId, _error: &ActionError) {}

    /// Called for [`Decision::ViewInventory`].
    fn show_inventory(&mut self, _world: &World, _hero: UnitId) {}

    /// Market hook invoked after an accepted [`Command::OpenMarket`].
    fn open_market(&mut self, _hero: UnitId, _payload: &mut HeroPayload) {}
}

/// Everything that happened during one call to [`Session::play_round`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundReport {
    /// Round that was played.
    pub round: u32,
    /// Events in the order they occurred.
    pub events: Vec<Event>,
    /// Heroes that forfeited their action.
    pub forfeits: Vec<UnitId>,
}

impl RoundReport {
    /// Events produced by monster turns: moves, strikes, deaths and stuck notices.
    pub fn monster_log(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(|event| match event {
            Event::MonsterMoved { .. } => true,
            Event::Struck { attacker, .. } => attacker.side() == Side::Monster,
            Event::Held { unit } => unit.side() == Side::Monster,
            _ => false,
        })
    }
}

enum HeroPhaseEnd {
    Finished,
    Quit,
}

/// Turn-based session driving the world through rounds.
#[derive(Debug)]
pub struct Session<'a, T: MonsterTemplates> {
    world: World,
    templates: &'a T,
    rng: ChaCha8Rng,
    tactics: MonsterTactics,
    spawning: Spawning,
    round: u32,
    phase: Phase,
}

impl<'a, T: MonsterTemplates> Session<'a, T> {
    /// Creates a session positioned at the start of round 1.
    ///
    /// Every random draw comes from a ChaCha stream seeded with `seed`, so two
    /// sessions with the same seed and the same decisions replay identically.
    #[must_use]
    pub fn new(world: World, templates: &'a T, seed: u64) -> Self {
        let spawning = Spawning::new(Config::for_difficulty(query::difficulty(&world)));
        Self {
            world,
            templates,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tactics: MonsterTactics,
            spawning,
            round: 1,
            phase: Phase::RoundStart,
        }
    }

    /// Spawns the initial monster roster, one level-one monster per lane, and
    /// returns the spawn events. Does nothing once the first round was played.
    pub fn deploy_opening_wave(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.round != 1 || self.phase != Phase::RoundStart {
            return events;
        }
        let mut spawns = Vec::new();
        self.spawning
            .opening_wave(&self.world, self.templates, &mut self.rng, &mut spawns);
        for command in spawns {
            self.execute(command, &mut events);
        }
        info!(monsters = events.len(), "opening wave deployed");
        events
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Round that will be played next, or the round that ended the session.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether the session reached a terminal state.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Plays rounds until the session ends or `max_rounds` rounds were
    /// played, handing each report to `on_round`. Returns the final phase.
    pub fn run<C, F>(
        &mut self,
        controller: &mut C,
        max_rounds: Option<u32>,
        mut on_round: F,
    ) -> Phase
    where
        C: HeroController + ?Sized,
        F: FnMut(&RoundReport),
    {
        let mut played = 0;
        while !self.is_over() && max_rounds.map_or(true, |limit| played < limit) {
            let report = self.play_round(controller);
            on_round(&report);
            played += 1;
        }
        self.phase
    }

    /// Plays one full round. Does nothing once the session is over.
    pub fn play_round<C>(&mut self, controller: &mut C) -> RoundReport
    where
        C: HeroController + ?Sized,
    {
        let round = self.round;
        let mut report = RoundReport {
            round,
            ..RoundReport::default()
        };
        if self.is_over() {
            return report;
        }

        self.phase = Phase::RoundStart;
        info!(round, "round started");
        self.execute(Command::BeginRound { round }, &mut report.events);

        self.phase = Phase::HeroPhase;
        if let HeroPhaseEnd::Quit = self.hero_phase(controller, &mut report) {
            info!(round, "session abandoned");
            self.phase = Phase::Quit;
            return report;
        }
        if self.check_outcome(&mut report) {
            return report;
        }

        self.phase = Phase::MonsterPhase;
        self.monster_phase(&mut report);
        if self.check_outcome(&mut report) {
            return report;
        }

        self.phase = Phase::RoundEnd;
        self.round_end(round, &mut report);
        self.round += 1;
        self.phase = Phase::RoundStart;
        report
    }

    fn hero_phase<C>(&mut self, controller: &mut C, report: &mut RoundReport) -> HeroPhaseEnd
    where
        C: HeroController + ?Sized,
    {
        for hero in query::roster(&self.world, Side::Hero) {
            if !query::is_alive(&self.world, hero) {
                continue;
            }
            let mut rejections = 0;
            loop {
                match controller.decide(&self.world, hero, report.round) {
                    Decision::Quit => return HeroPhaseEnd::Quit,
                    Decision::ViewInventory => controller.show_inventory(&self.world, hero),
                    Decision::Act(command) => {
                        let market = matches!(command, Command::OpenMarket { .. });
                        match self.hero_action(hero, command, &mut report.events) {
                            Ok(()) => {
                                if market {
                                    let visit = world::market_access(&mut self.world, hero);
                                    if let Some(payload) = visit {
                                        controller.open_market(hero, payload);
                                    }
                                }
                                break;
                            }
                            Err(error) => {
                                controller.rejected(hero, &error);
                                rejections += 1;
                                if rejections >= MAX_REJECTIONS {
                                    warn!(%hero, "no accepted action, turn forfeited");
                                    report.forfeits.push(hero);
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }
        HeroPhaseEnd::Finished
    }

    fn hero_action(
        &mut self,
        hero: UnitId,
        command: Command,
        events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if !command.is_hero_action() {
            return Err(ActionError::NotAHeroAction);
        }
        match command.actor() {
            Some(actor) if actor == hero => {}
            Some(actor) => {
                return Err(ActionError::OutOfTurn {
                    expected: hero,
                    actor,
                })
            }
            None => return Err(ActionError::NotAHeroAction),
        }
        world::apply(&mut self.world, command, &mut self.rng, events)
    }

    fn monster_phase(&mut self, report: &mut RoundReport) {
        let mut commands = Vec::new();
        for monster in query::roster(&self.world, Side::Monster) {
            commands.clear();
            self.tactics
                .handle(&self.world, monster, &mut self.rng, &mut commands);
            for command in commands.drain(..) {
                if let Err(error) =
                    world::apply(&mut self.world, command, &mut self.rng, &mut report.events)
                {
                    warn!(%monster, %error, "monster command rejected");
                    break;
                }
            }
        }
    }

    fn round_end(&mut self, round: u32, report: &mut RoundReport) {
        let mut end_events = Vec::new();
        self.execute(Command::EndRound { round }, &mut end_events);

        let mut spawns = Vec::new();
        self.spawning.handle(
            &end_events,
            &self.world,
            self.templates,
            &mut self.rng,
            &mut spawns,
        );
        report.events.append(&mut end_events);
        for command in spawns {
            self.execute(command, &mut report.events);
        }
    }

    fn check_outcome(&mut self, report: &mut RoundReport) -> bool {
        let Some(outcome) = query::outcome(&self.world) else {
            return false;
        };
        info!(round = report.round, ?outcome, "session decided");
        report.events.push(Event::GameOver { outcome });
        self.phase = outcome.into();
        true
    }

    fn execute(&mut self, command: Command, events: &mut Vec<Event>) {
        if let Err(error) = world::apply(&mut self.world, command, &mut self.rng, events) {
            debug!(%error, "upkeep command rejected");
        }
    }
}
