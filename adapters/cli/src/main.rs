#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Nexus Lanes in the terminal.

mod config;
mod controllers;
mod input;
mod render;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use nexus_lanes_content::Catalog;
use nexus_lanes_core::{Difficulty, Lane};
use nexus_lanes_system_rounds::{Phase, RoundReport, Session};
use nexus_lanes_world::{Board, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{LaunchConfig, Settings},
    controllers::{Autopilot, Terminal},
};

const DEFAULT_LOG_FILTER: &str = "nexus_lanes=info";

/// Three heroes hold three lanes against waves of monsters.
#[derive(Debug, Parser)]
#[command(name = "nexus-lanes", version, about)]
pub(crate) struct Args {
    /// Difficulty tier: easy, medium or hard.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for dodge rolls, tie-breaks and wave picks.
    #[arg(long)]
    seed: Option<u64>,

    /// Content manifest replacing the embedded heroes, monsters and items.
    #[arg(long, value_name = "TOML")]
    content: Option<PathBuf>,

    /// Launch config file; flags override its values.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Stop after this many rounds.
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Let the autopilot play every hero.
    #[arg(long)]
    auto: bool,

    /// Hero to field, once per lane in order. Defaults to the first three.
    #[arg(long = "hero", value_name = "NAME")]
    heroes: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => LaunchConfig::load(path)?,
        None => LaunchConfig::default(),
    };
    let settings = Settings::resolve(args, config, rand::random);
    run(&settings)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(settings: &Settings) -> Result<()> {
    let catalog = match &settings.content {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("failed to load content from {}", path.display()))?,
        None => Catalog::embedded().context("failed to load embedded content")?,
    };
    let party = catalog
        .party(&settings.heroes)
        .context("failed to assemble the hero party")?;
    if party.len() > Lane::ALL.len() {
        bail!(
            "{} heroes requested but only {} lanes exist",
            party.len(),
            Lane::ALL.len()
        );
    }

    let mut world = World::new(Board::standard(), settings.difficulty);
    for (lane, hero) in Lane::ALL.into_iter().zip(party) {
        let name = hero.name.clone();
        let id = world
            .add_hero(lane, hero)
            .with_context(|| format!("failed to place {name} in {lane}"))?;
        info!(%id, %name, %lane, "hero takes the field");
    }

    info!(
        seed = settings.seed,
        difficulty = ?settings.difficulty,
        auto = settings.auto,
        "starting session"
    );
    let mut session = Session::new(world, &catalog, settings.seed);
    let stdout = io::stdout();
    let mut opening = String::from("-- deployment --\n");
    for event in session.deploy_opening_wave() {
        opening.push_str(&format!("  {event}\n"));
    }
    write!(stdout.lock(), "{opening}")?;

    let mut log = RoundLog::new(io::stdout());
    let print = |report: &RoundReport| log.record(report);
    let phase = if settings.auto {
        session.run(&mut Autopilot::default(), settings.max_rounds, print)
    } else {
        let mut terminal = Terminal::new(io::stdin().lock(), io::stdout(), &catalog);
        session.run(&mut terminal, settings.max_rounds, print)
    };
    let last_round = log.finish()?;

    let mut out = stdout.lock();
    writeln!(out, "\n{}", render::board(session.world()))?;
    write!(out, "{}", render::roster(session.world()))?;
    writeln!(out, "{}", closing_line(phase, last_round))?;
    Ok(())
}

/// Writes round reports as they arrive and keeps the first write failure.
struct RoundLog<W> {
    out: W,
    last_round: u32,
    error: Option<io::Error>,
}

impl<W: Write> RoundLog<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            last_round: 0,
            error: None,
        }
    }

    fn record(&mut self, report: &RoundReport) {
        self.last_round = report.round;
        if self.error.is_none() {
            self.error = write!(self.out, "{}", describe(report)).err();
        }
    }

    /// Last round reported, or the first write failure.
    fn finish(self) -> Result<u32> {
        match self.error {
            Some(error) => Err(error).context("failed to write the round log"),
            None => Ok(self.last_round),
        }
    }
}

fn describe(report: &RoundReport) -> String {
    let mut text = format!("-- round {} --\n", report.round);
    for event in &report.events {
        text.push_str(&format!("  {event}\n"));
    }
    for hero in &report.forfeits {
        text.push_str(&format!("  {hero} forfeits its action\n"));
    }
    text
}

fn closing_line(phase: Phase, rounds: u32) -> String {
    match phase {
        Phase::Victory => {
            format!("Victory after {rounds} rounds: a hero reached the monster nexus.")
        }
        Phase::Defeat => {
            format!("Defeat after {rounds} rounds: a monster reached the hero nexus.")
        }
        Phase::Quit => "You left the lanes.".to_owned(),
        _ => format!("Stopped after {rounds} rounds."),
    }
}
