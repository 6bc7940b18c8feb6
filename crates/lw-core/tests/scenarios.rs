use lw_core::{
    Direction, DoorState, DungeonGenerator, EmptyContent, Footprint, GatePredicate,
    GenerationState, GeneratorConfig, Position, RoomType, SEED_GATE_COST, StandardContent,
    ascii_map, describe_doors, describe_rooms,
};

fn empty_rooms_dungeon(seed: u64) -> lw_core::Dungeon {
    let config = GeneratorConfig {
        room_budget_primary: 5,
        rng_seed: Some(seed),
        ..GeneratorConfig::default()
    };
    let mut generator = DungeonGenerator::new(config).expect("valid config");
    generator.generate(&mut EmptyContent).expect("budget 5 always fits")
}

#[test]
fn test_budget_five_opening_and_end_gate() {
    let dungeon = empty_rooms_dungeon(1337);
    let graph = dungeon.graph();
    let fp = graph.footprint();
    assert_eq!(fp, Footprint::new(11, 9));

    let start = graph.find_by_position(Position::ORIGIN).expect("start");
    assert_eq!(start.room_type, RoomType::Start);

    let seed1 = graph.id_at(Position::new(11, 0)).expect("first seed room");
    let seed2 = graph.id_at(Position::new(22, 0)).expect("second seed room");
    assert!(graph.room(seed1).expect("seed1").is_primary);

    let seed_gate = graph.connection_between(seed1, seed2).expect("seed gate");
    assert!(seed_gate.has_lock);
    assert_eq!(seed_gate.opening_cost, SEED_GATE_COST);
    assert_eq!(graph.door_state(seed2, Direction::West), DoorState::Closed);

    let path = dungeon.primary_path();
    assert_eq!(path.len(), 5);
    let end = dungeon.end().expect("end room");
    assert_eq!(path.last(), Some(&end));
    let before_end = path[path.len() - 2];

    let end_pos = graph.room(end).expect("end").position;
    let last_pos = graph.room(before_end).expect("last primary").position;
    assert!(
        Direction::ALL
            .into_iter()
            .any(|d| last_pos.step(d, fp) == end_pos)
    );

    let end_gate = graph.connection_between(before_end, end).expect("end gate");
    assert!(end_gate.has_lock);
    assert_eq!(end_gate.opening_cost, 0);
    assert_eq!(end_gate.predicate, GatePredicate::Any);
    assert_eq!(end_gate.label.as_deref(), Some("≥ any"));
}

#[test]
fn test_every_seed_places_the_opening_the_same_way() {
    for seed in 0..25 {
        let dungeon = empty_rooms_dungeon(seed);
        let graph = dungeon.graph();
        assert_eq!(graph.find_by_index(0).map(|r| r.position), Some(Position::ORIGIN));
        assert_eq!(graph.find_by_index(1).map(|r| r.position), Some(Position::new(11, 0)));
        assert_eq!(graph.find_by_index(2).map(|r| r.position), Some(Position::new(22, 0)));
        assert_eq!(graph.find_by_index(1).map(|r| r.room_type), Some(RoomType::Safe));
    }
}

#[test]
fn test_empty_rooms_price_branch_gates_at_zero() {
    let dungeon = empty_rooms_dungeon(99);
    for door in dungeon.doors() {
        let conn = dungeon.graph().connection(door.connection).expect("gate");
        if !conn.fixed_cost {
            assert_eq!(door.opening_cost, 0);
        }
    }
}

#[test]
fn test_secret_passages_are_never_locked() {
    for seed in 0..30 {
        let mut generator = DungeonGenerator::new(GeneratorConfig {
            rng_seed: Some(seed),
            ..GeneratorConfig::default()
        })
        .expect("valid config");
        let dungeon = generator
            .generate(&mut StandardContent::default())
            .expect("default budget fits");
        assert_eq!(generator.state(), GenerationState::Done);
        for (_, conn) in dungeon.graph().connections() {
            if conn.is_secret {
                assert!(!conn.has_lock);
                let far = dungeon.graph().room(conn.destination).expect("room");
                let near = dungeon.graph().room(conn.origin).expect("room");
                let types = [near.room_type, far.room_type];
                assert!(types.contains(&RoomType::Secret));
                assert!(types.contains(&RoomType::Merchant));
            }
        }
    }
}

#[test]
fn test_text_output_mentions_every_room() {
    let dungeon = empty_rooms_dungeon(5);
    let map = ascii_map(dungeon.graph());
    assert!(map.contains('S'));
    assert!(map.contains('E'));
    assert!(map.contains('+'));
    assert_eq!(describe_rooms(&dungeon).lines().count(), dungeon.graph().len());
    assert!(describe_doors(&dungeon).lines().count() >= 2);
}

#[test]
fn test_wide_footprint_keeps_seed_rooms_east() {
    let config = GeneratorConfig {
        room_footprint: Footprint::new(100_000, 9),
        rng_seed: Some(7),
        ..GeneratorConfig::default()
    };
    let mut generator = DungeonGenerator::new(config).expect("valid config");
    let dungeon = generator.generate(&mut EmptyContent).expect("budget 5 always fits");
    let graph = dungeon.graph();
    assert_eq!(
        graph.find_by_index(1).map(|r| r.position),
        Some(Position::new(100_000, 0))
    );
    assert_eq!(
        graph.find_by_index(2).map(|r| r.position),
        Some(Position::new(200_000, 0))
    );
}
