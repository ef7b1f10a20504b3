//! Nexus market: level-gated listings bought with gold.

use nexus_lanes_core::{HeroPayload, Item};
use thiserror::Error;
use tracing::debug;

/// Reasons a purchase is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MarketError {
    /// No listing exists at the index.
    #[error("no listing {0}")]
    UnknownListing(usize),
    /// The hero is below the item's required level.
    #[error("requires level {required}, hero is level {level}")]
    LevelTooLow {
        /// Level the item needs.
        required: u32,
        /// Hero's current level.
        level: u32,
    },
    /// The hero cannot afford the item.
    #[error("costs {price} gold, hero has {gold}")]
    NotEnoughGold {
        /// Item price.
        price: u32,
        /// Gold carried.
        gold: u32,
    },
}

/// Read-only view over the catalog stock.
#[derive(Clone, Copy, Debug)]
pub struct Market<'a> {
    stock: &'a [Item],
}

impl<'a> Market<'a> {
    pub(crate) fn new(stock: &'a [Item]) -> Self {
        Self { stock }
    }

    /// Listings a hero of `level` may buy, keyed by stock index.
    pub fn listings(&self, level: u32) -> impl Iterator<Item = (usize, &'a Item)> + 'a {
        self.stock
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.required_level() <= level)
    }

    /// Charges the hero and places a copy of the listing in its inventory.
    pub fn buy(&self, hero: &mut HeroPayload, listing: usize) -> Result<&'a Item, MarketError> {
        let item = self
            .stock
            .get(listing)
            .ok_or(MarketError::UnknownListing(listing))?;
        if item.required_level() > hero.level {
            return Err(MarketError::LevelTooLow {
                required: item.required_level(),
                level: hero.level,
            });
        }
        if item.price() > hero.gold {
            return Err(MarketError::NotEnoughGold {
                price: item.price(),
                gold: hero.gold,
            });
        }
        hero.gold -= item.price();
        hero.inventory.add(item.clone());
        debug!(hero = %hero.name, item = item.name(), gold = hero.gold, "market purchase");
        Ok(item)
    }
}
