use nexus_lanes_content::Catalog;
use nexus_lanes_core::{Command, Difficulty, Event, Item, Lane, Side};
use nexus_lanes_system_spawning::{Config, MonsterTemplates, Spawning};
use nexus_lanes_world::{self as world, query, Board, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn default_party_takes_the_field_with_starter_kits() {
    let catalog = Catalog::embedded().expect("embedded content");
    let party = catalog.party(&[]).expect("party");
    let mut world = World::new(Board::standard(), Difficulty::Medium);
    for (lane, hero) in Lane::ALL.into_iter().zip(party) {
        assert!(hero.main_hand.is_some(), "{} has no weapon", hero.name);
        assert_eq!(hero.inventory.potions().count(), 2);
        let _ = world.add_hero(lane, hero).expect("home free");
    }
    assert_eq!(query::roster(&world, Side::Hero).len(), 3);
}

#[test]
fn every_wave_level_resolves_to_a_template() {
    let catalog = Catalog::embedded().expect("embedded content");
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for level in 1..=12 {
        let monster = catalog
            .monster_for_level(level, &mut rng)
            .expect("fallback template");
        assert_eq!(monster.level, level);
        assert_eq!(monster.hp, monster.stats.max_hp);
    }
}

#[test]
fn catalog_drives_a_round_twelve_wave() {
    let catalog = Catalog::embedded().expect("embedded content");
    let mut world = World::new(Board::standard(), Difficulty::Medium);
    let mut spawning = Spawning::new(Config::for_difficulty(Difficulty::Medium));
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::RoundEnded { round: 12 }],
        &world,
        &catalog,
        &mut rng,
        &mut commands,
    );
    assert_eq!(commands.len(), 3);

    let mut events = Vec::new();
    for command in commands {
        assert!(matches!(command, Command::SpawnMonster { .. }));
        world::apply(&mut world, command, &mut rng, &mut events).expect("spawn");
    }
    let levels: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::MonsterSpawned { level, .. } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![3, 3, 3]);
}

#[test]
fn market_offers_grow_with_level() {
    let catalog = Catalog::embedded().expect("embedded content");
    let market = catalog.market();
    let novice = market.listings(1).count();
    let veteran = market.listings(10).count();
    assert!(novice < veteran);
    assert_eq!(veteran, catalog.stock().len());
    assert!(market
        .listings(1)
        .all(|(_, item)| item.required_level() <= 1));
    assert!(catalog
        .stock()
        .iter()
        .any(|item| matches!(item, Item::Spell(_))));
}
