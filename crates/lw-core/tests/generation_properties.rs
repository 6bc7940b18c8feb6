use lw_core::{
    Dungeon, DungeonGenerator, EmptyContent, GateScope, GenerationError, GeneratorConfig,
    RoomSampler, RoomType, StandardContent, Wallet, primary_gate_cost, primary_surplus,
    secondary_gate_cost, secondary_surplus, try_open,
};
use proptest::prelude::*;

fn generate(config: GeneratorConfig) -> Result<Dungeon, GenerationError> {
    let mut generator = DungeonGenerator::new(config)?;
    generator.generate(&mut StandardContent::default())
}

fn config(seed: u64, primary: usize, branch1: usize, branch2: usize) -> GeneratorConfig {
    GeneratorConfig {
        room_budget_primary: primary,
        room_budget_secondary_branch1: branch1,
        room_budget_secondary_branch2: branch2,
        rng_seed: Some(seed),
        ..GeneratorConfig::default()
    }
}

fn assert_single_start_and_end(dungeon: &Dungeon) {
    let graph = dungeon.graph();
    assert_eq!(graph.count_of(RoomType::Start), 1);
    assert_eq!(graph.count_of(RoomType::End), 1);
}

fn assert_connected(dungeon: &Dungeon) {
    let graph = dungeon.graph();
    let start = dungeon.start().expect("start room");
    assert_eq!(graph.reachable_from(start).len(), graph.len());
}

fn assert_mirrored(dungeon: &Dungeon) {
    let graph = dungeon.graph();
    for (id, conn) in graph.connections() {
        let mirror = graph.connection(conn.mirror()).expect("mirror record");
        assert_eq!(mirror.mirror(), id);
        assert_ne!(mirror.is_forward(), conn.is_forward());
        assert_eq!(mirror.direction, conn.direction.opposite());
        assert_eq!(mirror.origin, conn.destination);
        assert_eq!(mirror.destination, conn.origin);
        assert_eq!(mirror.has_lock, conn.has_lock);
        assert_eq!(mirror.opening_cost, conn.opening_cost);
        assert_eq!(mirror.is_secret, conn.is_secret);
        assert_eq!(mirror.is_wall, conn.is_wall);
    }
}

fn assert_one_edge_per_direction(dungeon: &Dungeon) {
    let graph = dungeon.graph();
    for (_, room) in graph.rooms() {
        let mut dirs: Vec<_> = room
            .connections()
            .iter()
            .map(|&c| graph.connection(c).expect("connection").direction)
            .collect();
        let count = dirs.len();
        dirs.sort();
        dirs.dedup();
        assert_eq!(dirs.len(), count);
    }
}

fn assert_prices_recompute(dungeon: &Dungeon) {
    let graph = dungeon.graph();
    for door in dungeon.doors() {
        let conn = graph.connection(door.connection).expect("gate");
        if conn.fixed_cost {
            continue;
        }
        match door.scope {
            GateScope::Primary => {
                let surplus = primary_surplus(graph, door.connection).expect("primary surplus");
                assert_eq!(
                    primary_gate_cost(surplus),
                    (conn.opening_cost, conn.predicate)
                );
            }
            GateScope::Secondary => {
                let surplus =
                    secondary_surplus(graph, door.connection).expect("secondary surplus");
                assert_eq!(secondary_gate_cost(surplus), conn.opening_cost);
            }
        }
    }
}

/// Walk the primary path collecting every room's surplus and opening each door
fn assert_optimal_play_reaches_end(dungeon: &Dungeon) {
    let graph = dungeon.graph();
    let path = dungeon.primary_path();
    let mut wallet = Wallet::default();
    wallet.add(graph.room(path[0]).expect("start").surplus());
    for pair in path.windows(2) {
        let door = graph
            .connection_between(pair[0], pair[1])
            .expect("consecutive primary rooms are connected");
        assert!(
            try_open(door, &mut wallet),
            "could not open {} with {} points",
            door.label.clone().unwrap_or_default(),
            wallet.points()
        );
        wallet.add(graph.room(pair[1]).expect("room").surplus());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_generated_dungeons_hold_graph_invariants(
        seed in any::<u64>(),
        primary in 3usize..24,
        branch1 in 0usize..6,
        branch2 in 0usize..5,
    ) {
        match generate(config(seed, primary, branch1, branch2)) {
            Ok(dungeon) => {
                assert_single_start_and_end(&dungeon);
                assert_connected(&dungeon);
                assert_mirrored(&dungeon);
                assert_one_edge_per_direction(&dungeon);
                assert_prices_recompute(&dungeon);
                assert_optimal_play_reaches_end(&dungeon);
                prop_assert!(dungeon.demoted().is_empty());
                // The opening always places three rooms before End
                prop_assert_eq!(dungeon.primary_path().len(), primary.max(4));
            }
            Err(err) => prop_assert!(
                matches!(err, GenerationError::RetryCapExceeded { attempts: 11 }),
                "unexpected error {}", err
            ),
        }
    }

    #[test]
    fn test_same_seed_gives_same_dungeon(seed in any::<u64>(), primary in 3usize..16) {
        let a = generate(config(seed, primary, 3, 2));
        let b = generate(config(seed, primary, 3, 2));
        match (a, b) {
            (Ok(a), Ok(b)) => prop_assert_eq!(
                serde_json::to_string(&a).expect("serialize"),
                serde_json::to_string(&b).expect("serialize")
            ),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "runs diverged"),
        }
    }

    #[test]
    fn test_type_weights_always_sum_to_one_hundred(seed in any::<u64>(), steps in 1usize..60) {
        let mut rng = lw_core::GameRng::new(seed);
        let mut sampler = RoomSampler::new(steps);
        for step in 0..steps {
            let (room_type, _) = sampler.sample(&mut rng, step);
            prop_assert!(RoomType::SAMPLED.contains(&room_type));
            prop_assert!((sampler.type_weights().total() - 100.0).abs() < 1e-6);
            prop_assert!(sampler.type_weights().entries().iter().all(|&(_, w)| w >= 0.0));
        }
    }
}

#[test]
fn test_minimum_budget_terminates_within_retry_cap() {
    for seed in 0..200 {
        let cfg = GeneratorConfig {
            room_budget_primary: 3,
            extra_tries_clamp: 10,
            rng_seed: Some(seed),
            ..GeneratorConfig::default()
        };
        let mut generator = DungeonGenerator::new(cfg).expect("valid config");
        let result = generator.generate(&mut EmptyContent);

        assert!(generator.attempts() <= 11);
        // Bounded number of primitive draws for the whole run
        assert!(generator.rng_draws() <= 11 * 64);
        match result {
            Ok(dungeon) => {
                assert_eq!(dungeon.primary_path().len(), 4);
                assert_single_start_and_end(&dungeon);
            }
            Err(err) => assert_eq!(err, GenerationError::RetryCapExceeded { attempts: 11 }),
        }
    }
}

#[test]
fn test_long_paths_still_price_every_gate() {
    let dungeon = generate(config(2024, 60, 8, 6));
    if let Ok(dungeon) = dungeon {
        assert_connected(&dungeon);
        assert_prices_recompute(&dungeon);
        assert_optimal_play_reaches_end(&dungeon);
    }
}
