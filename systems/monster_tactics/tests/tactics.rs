use nexus_lanes_core::{
    CellCoord, Command, Difficulty, Direction, Event, HeroPayload, Lane, MonsterPayload, Stats,
    UnitId,
};
use nexus_lanes_system_monster_tactics::MonsterTactics;
use nexus_lanes_world::{self as world, query, Board, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn plain_board() -> Board {
    let rows = [
        "NNINNINN", "PPIPPIPP", "PPIPPIPP", "PPIPPIPP", "PPIPPIPP", "PPIPPIPP", "PPIPPIPP",
        "NNINNINN",
    ];
    let homes = Lane::ALL.map(|lane| CellCoord::new(lane.columns()[0], 7));
    let spawns = Lane::ALL.map(|lane| CellCoord::new(lane.columns()[1], 0));
    Board::from_glyph_rows(&rows, homes, spawns).expect("plain board")
}

fn hero() -> HeroPayload {
    HeroPayload::new(
        "Rapidash",
        1,
        Stats {
            max_hp: 500,
            ..Stats::default()
        },
        0,
    )
}

fn monster() -> MonsterPayload {
    MonsterPayload::new(
        "Desghidorrah",
        1,
        Stats {
            max_hp: 100,
            ..Stats::default()
        },
        7,
        0,
        0.0,
    )
}

fn take_turn(world: &mut World, monster: UnitId, rng: &mut ChaCha8Rng) -> Vec<Command> {
    let mut commands = Vec::new();
    MonsterTactics.handle(world, monster, rng, &mut commands);
    let mut events = Vec::new();
    for command in commands.clone() {
        world::apply(world, command, rng, &mut events).expect("tactics emit legal commands");
    }
    commands
}

#[test]
fn monster_advances_to_the_hero_and_strikes_once_in_range() {
    let mut world = World::new(plain_board(), Difficulty::Medium);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let hero_id = world.add_hero(Lane::Left, hero()).expect("hero");
    let monster_id = world
        .add_monster(CellCoord::new(1, 0), monster())
        .expect("monster");
    let mut events = Vec::new();
    for _ in 0..4 {
        world::apply(
            &mut world,
            Command::MoveHero {
                hero: hero_id,
                direction: Direction::North,
            },
            &mut rng,
            &mut events,
        )
        .expect("hero advance");
    }
    assert_eq!(query::hero_positions(&world)[&hero_id], CellCoord::new(0, 3));

    for expected_row in 1..=2 {
        let commands = take_turn(&mut world, monster_id, &mut rng);
        assert_eq!(
            commands,
            vec![Command::MoveMonster {
                monster: monster_id,
                direction: Direction::South
            }]
        );
        assert_eq!(
            query::monster_positions(&world)[&monster_id].row(),
            expected_row
        );
    }

    let commands = take_turn(&mut world, monster_id, &mut rng);
    assert_eq!(
        commands,
        vec![
            Command::MoveMonster {
                monster: monster_id,
                direction: Direction::South
            },
            Command::Attack {
                attacker: monster_id,
                target: hero_id
            }
        ]
    );

    for _ in 0..5 {
        let commands = take_turn(&mut world, monster_id, &mut rng);
        assert_eq!(
            commands,
            vec![Command::Attack {
                attacker: monster_id,
                target: hero_id
            }]
        );
        assert!(query::monster_positions(&world)[&monster_id].row() <= 3);
    }
    assert_eq!(query::unit(&world, hero_id).map(|view| view.hp), Some(500 - 6 * 7));
}

#[test]
fn blocked_forward_step_sidesteps_within_the_lane() {
    let mut world = World::new(Board::standard(), Difficulty::Medium);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let monster_id = world
        .add_monster(CellCoord::new(1, 3), monster())
        .expect("monster");
    assert!(query::is_obstacle(&world, CellCoord::new(1, 4)));

    let commands = take_turn(&mut world, monster_id, &mut rng);
    assert_eq!(
        commands,
        vec![Command::MoveMonster {
            monster: monster_id,
            direction: Direction::West
        }]
    );
    assert_eq!(
        query::monster_positions(&world)[&monster_id],
        CellCoord::new(0, 3)
    );
}

#[test]
fn boxed_in_monster_is_stuck() {
    let mut world = World::new(Board::standard(), Difficulty::Medium);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let _blocker = world
        .add_monster(CellCoord::new(0, 3), monster())
        .expect("blocker");
    let boxed = world
        .add_monster(CellCoord::new(1, 3), monster())
        .expect("boxed");

    let mut commands = Vec::new();
    MonsterTactics.handle(&world, boxed, &mut rng, &mut commands);
    assert_eq!(commands, vec![Command::Hold { unit: boxed }]);

    let mut events = Vec::new();
    world::apply(&mut world, commands.remove(0), &mut rng, &mut events).expect("hold");
    assert_eq!(events[0].to_string(), format!("{boxed} is stuck"));
    assert!(matches!(events[0], Event::Held { .. }));
}

#[test]
fn dead_monsters_do_nothing() {
    let mut world = World::new(plain_board(), Difficulty::Medium);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut frail = monster();
    frail.hp = 0;
    let corpse = world
        .add_monster(CellCoord::new(1, 0), frail)
        .expect("monster");
    let mut commands = Vec::new();
    MonsterTactics.handle(&world, corpse, &mut rng, &mut commands);
    assert!(commands.is_empty());
}
