use std::time::Duration;

use hex_tactics_core::{
    Command, Controller, Event, GameConfig, HexCoord, PlayerId, SessionGeneration, TerrainKind,
    TerrainProfile, UnitKind,
};
use hex_tactics_world::{self as world, query, World};

fn grass_config() -> GameConfig {
    let terrain = TerrainKind::ALL
        .iter()
        .map(|kind| {
            let mut profile = TerrainProfile::default_for(*kind);
            profile.threshold = if *kind == TerrainKind::Water { 0.0 } else { 1.0 };
            profile
        })
        .collect();
    GameConfig {
        columns: 12,
        rows: 12,
        jitter: 0.0,
        terrain,
        ..GameConfig::default()
    }
}

fn run(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn two_end_turns_return_to_player_zero_with_fresh_moves() {
    let mut world = World::new(grass_config()).expect("valid config");
    let _ = run(
        &mut world,
        vec![
            Command::Select {
                cell: HexCoord::new(2, 2),
            },
            Command::MoveSelected {
                destination: HexCoord::new(2, 5),
            },
        ],
    );
    let archer = query::occupant_at(&world, HexCoord::new(2, 5), None).expect("archer moved");
    assert_eq!(archer.remaining_moves, 0);

    let events = run(&mut world, vec![Command::EndTurn, Command::EndTurn]);

    assert_eq!(query::turn(&world).active_player, PlayerId::new(0));
    assert_eq!(query::turn(&world).round, 2);
    for unit in query::units_of(&world, PlayerId::new(0)) {
        assert_eq!(unit.remaining_moves, unit.kind.stats().move_allowance());
    }

    let started: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::TurnStarted {
                player, controller, ..
            } => Some((*player, *controller)),
            _ => None,
        })
        .collect();
    assert_eq!(
        started,
        vec![
            (PlayerId::new(1), Controller::Scripted),
            (PlayerId::new(0), Controller::Human),
        ]
    );
}

#[test]
fn end_turn_drops_a_pending_selection() {
    let mut world = World::new(grass_config()).expect("valid config");
    let events = run(
        &mut world,
        vec![
            Command::Select {
                cell: HexCoord::new(3, 3),
            },
            Command::EndTurn,
        ],
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::SelectionCleared { .. })));
    assert!(query::reachable_for_selection(&world).is_none());
}

#[test]
fn matching_pass_ends_the_scripted_turn() {
    let mut world = World::new(grass_config()).expect("valid config");
    let _ = run(&mut world, vec![Command::EndTurn]);
    let turn = query::turn(&world);
    assert_eq!(turn.controller, Controller::Scripted);

    let events = run(
        &mut world,
        vec![Command::PassTurn {
            generation: turn.generation,
            player: turn.active_player,
            round: turn.round,
        }],
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TurnEnded { player } if *player == PlayerId::new(1))));
    assert_eq!(query::turn(&world).active_player, PlayerId::new(0));
}

#[test]
fn pass_from_a_superseded_session_is_ignored() {
    let mut world = World::new(grass_config()).expect("valid config");
    let _ = run(&mut world, vec![Command::EndTurn]);
    let stale = query::turn(&world);

    let _ = run(
        &mut world,
        vec![
            Command::NewGame {
                config: grass_config(),
            },
            Command::EndTurn,
        ],
    );
    assert_eq!(query::turn(&world).active_player, PlayerId::new(1));

    let events = run(
        &mut world,
        vec![Command::PassTurn {
            generation: stale.generation,
            player: stale.active_player,
            round: stale.round,
        }],
    );
    assert_eq!(
        events,
        vec![Event::StalePassIgnored {
            generation: stale.generation,
            player: PlayerId::new(1),
            round: 1,
        }]
    );
    assert_eq!(query::turn(&world).active_player, PlayerId::new(1));
    assert_ne!(query::generation(&world), SessionGeneration::new(1));
}

#[test]
fn occupant_blocks_the_only_route_for_another_unit() {
    let mut config = grass_config();
    config.columns = 5;
    config.rows = 1;
    config.players[0].units = vec![hex_tactics_core::StartingUnit::new(UnitKind::Archer, 0, 0)];
    config.players[1].units = Vec::new();
    let mut world = World::new(config).expect("valid config");

    let archer = query::occupant_at(&world, HexCoord::new(0, 0), None).expect("archer");
    let before = query::reachability(&world, archer.id).expect("archer exists");
    assert!(before.is_reachable(HexCoord::new(3, 0)));

    let _ = run(
        &mut world,
        vec![Command::SpawnUnit {
            kind: UnitKind::Troll,
            cell: HexCoord::new(1, 0),
            owner: PlayerId::new(1),
        }],
    );
    let after = query::reachability(&world, archer.id).expect("archer exists");
    assert!(!after.is_reachable(HexCoord::new(3, 0)));

    let _ = run(
        &mut world,
        vec![Command::Select {
            cell: HexCoord::new(0, 0),
        }],
    );
    assert!(query::preview_path(&world, HexCoord::new(3, 0)).is_empty());
}

#[test]
fn damage_removes_units_and_their_selection() {
    let mut world = World::new(grass_config()).expect("valid config");
    let catapult = query::occupant_at(&world, HexCoord::new(3, 3), None).expect("catapult");
    let events = run(
        &mut world,
        vec![
            Command::Select {
                cell: HexCoord::new(3, 3),
            },
            Command::DamageUnit {
                unit: catapult.id,
                amount: 4,
            },
            Command::DamageUnit {
                unit: catapult.id,
                amount: 40,
            },
        ],
    );

    let damaged: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::UnitDamaged { hp, .. } => Some(*hp),
            _ => None,
        })
        .collect();
    assert_eq!(damaged, vec![6, 0]);
    assert!(events.contains(&Event::UnitRemoved {
        unit: catapult.id,
        cell: HexCoord::new(3, 3),
    }));
    assert!(query::occupancy_view(&world).is_free(HexCoord::new(3, 3)));
    assert!(query::reachable_for_selection(&world).is_none());
}

#[test]
fn ticks_only_report_elapsed_time() {
    let mut world = World::new(grass_config()).expect("valid config");
    let events = run(
        &mut world,
        vec![Command::Tick {
            dt: Duration::from_millis(16),
        }],
    );
    assert_eq!(
        events,
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(16)
        }]
    );
}
