//! Launch configuration: an optional TOML file overridden by command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use nexus_lanes_core::Difficulty;
use serde::Deserialize;

use crate::Args;

/// Settings read from a `--config` file. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LaunchConfig {
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
    max_rounds: Option<u32>,
    content: Option<PathBuf>,
    #[serde(default)]
    heroes: Vec<String>,
}

impl LaunchConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read launch config {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse launch config {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Fully resolved launch settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) max_rounds: Option<u32>,
    pub(crate) content: Option<PathBuf>,
    pub(crate) heroes: Vec<String>,
    pub(crate) auto: bool,
}

impl Settings {
    /// Merges flags over the config file; `fresh_seed` fills in a missing seed.
    pub(crate) fn resolve(
        args: Args,
        config: LaunchConfig,
        fresh_seed: impl FnOnce() -> u64,
    ) -> Self {
        let heroes = if args.heroes.is_empty() {
            config.heroes
        } else {
            args.heroes
        };
        Self {
            difficulty: args.difficulty.or(config.difficulty).unwrap_or_default(),
            seed: args.seed.or(config.seed).unwrap_or_else(fresh_seed),
            max_rounds: args.max_rounds.or(config.max_rounds),
            content: args.content.or(config.content),
            heroes,
            auto: args.auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("nexus-lanes").chain(flags.iter().copied()))
            .expect("valid flags")
    }

    #[test]
    fn parses_every_field() {
        let config = LaunchConfig::parse(
            r#"
                difficulty = "hard"
                seed = 42
                max_rounds = 30
                content = "content/custom.toml"
                heroes = ["Eunoia_Cyn", "Flandal_Steelskin"]
            "#,
        )
        .expect("config");
        assert_eq!(config.difficulty, Some(Difficulty::Hard));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_rounds, Some(30));
        assert_eq!(config.content, Some(PathBuf::from("content/custom.toml")));
        assert_eq!(config.heroes.len(), 2);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(LaunchConfig::parse("difficulty = \"easy\"\nspeed = 3").is_err());
        assert!(LaunchConfig::parse("difficulty = \"brutal\"").is_err());
    }

    #[test]
    fn flags_override_the_file() {
        let config = LaunchConfig::parse("difficulty = \"hard\"\nseed = 5\nmax_rounds = 9")
            .expect("config");
        let settings = Settings::resolve(
            args(&["--difficulty", "easy", "--max-rounds", "3", "--auto"]),
            config,
            || unreachable!("seed comes from the file"),
        );
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.seed, 5);
        assert_eq!(settings.max_rounds, Some(3));
        assert!(settings.auto);
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = Settings::resolve(args(&[]), LaunchConfig::default(), || 77);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.seed, 77);
        assert_eq!(settings.max_rounds, None);
        assert!(settings.heroes.is_empty());
        assert!(!settings.auto);
    }
}
