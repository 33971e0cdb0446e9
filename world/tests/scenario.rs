use std::time::Duration;

use creepline_core::{
    CellCoord, CellPoint, Command, CreepKind, Event, Grid, LevelState, PlacementError,
    ProjectileKind, SpawnEvent, TowerKind, WavePlan,
};
use creepline_level::LevelDefinition;
use creepline_world::{self as world, query, LevelInstance, PanelAction};

fn five_by_five(money: u64) -> LevelInstance {
    let grid = Grid::new(5, 5, CellCoord::new(4, 4), money, 10);
    LevelInstance::from_parts(
        String::from("five"),
        grid,
        Vec::new(),
        vec![CellCoord::new(0, 0)],
    )
}

fn place(level: &mut LevelInstance, kind: TowerKind, column: u32, row: u32) -> Event {
    let mut events = Vec::new();
    world::apply(
        level,
        Command::PlaceTower {
            kind,
            cell: CellCoord::new(column, row),
        },
        &mut events,
    );
    assert_eq!(events.len(), 1);
    events.remove(0)
}

#[test]
fn wall_with_single_gap_cannot_be_closed() {
    let mut level = five_by_five(1000);

    for row in 0..4 {
        let event = place(&mut level, TowerKind::GenericTower, 2, row);
        assert!(
            matches!(event, Event::TowerPlaced { .. }),
            "row {row}: {event:?}"
        );
    }

    let rejected = place(&mut level, TowerKind::GenericTower, 2, 4);
    assert_eq!(
        rejected,
        Event::TowerPlacementRejected {
            kind: TowerKind::GenericTower,
            cell: CellCoord::new(2, 4),
            reason: PlacementError::NotPlaceable,
        }
    );

    let navigation = query::navigation(&level);
    assert_eq!(navigation.distance(CellCoord::new(0, 0)), Some(8));
    assert_eq!(navigation.next_step(CellCoord::new(2, 4)), Some(CellCoord::new(3, 4)));
}

#[test]
fn spawn_point_cannot_be_boxed_in() {
    let mut level = five_by_five(1000);
    for row in 0..4 {
        let _ = place(&mut level, TowerKind::GenericTower, 2, row);
    }

    assert!(matches!(
        place(&mut level, TowerKind::GenericTower, 1, 0),
        Event::TowerPlaced { .. }
    ));
    assert!(!query::can_place_tower_here(&level, CellCoord::new(0, 1)));
    assert!(matches!(
        place(&mut level, TowerKind::GenericTower, 0, 1),
        Event::TowerPlacementRejected {
            reason: PlacementError::NotPlaceable,
            ..
        }
    ));
}

#[test]
fn rejections_leave_money_untouched() {
    let mut level = five_by_five(40);

    assert!(matches!(
        place(&mut level, TowerKind::LaserTower, 1, 1),
        Event::TowerPlacementRejected {
            reason: PlacementError::InsufficientFunds,
            ..
        }
    ));
    assert!(matches!(
        place(&mut level, TowerKind::GenericTower, 5, 1),
        Event::TowerPlacementRejected {
            reason: PlacementError::OutOfBounds,
            ..
        }
    ));
    assert!(matches!(
        place(&mut level, TowerKind::GenericTower, 4, 4),
        Event::TowerPlacementRejected {
            reason: PlacementError::NotPlaceable,
            ..
        }
    ));
    assert_eq!(query::economy(&level).money, 40);
    assert_eq!(query::tower_count(&level), 0);

    assert!(matches!(
        place(&mut level, TowerKind::GenericTower, 1, 1),
        Event::TowerPlaced { cost: 35, .. }
    ));
    assert_eq!(query::economy(&level).money, 5);
}

#[test]
fn selling_refunds_and_reopens_the_cell() {
    let mut level = five_by_five(100);
    let Event::TowerPlaced { tower, .. } = place(&mut level, TowerKind::SlownessTower, 2, 2) else {
        panic!("placement failed");
    };
    assert_eq!(query::economy(&level).money, 40);
    assert!(!query::can_place_tower_here(&level, CellCoord::new(2, 2)));

    let panel = level
        .select_at(CellPoint::new(2.2, 1.8))
        .expect("tower under cursor");
    assert_eq!(panel.title, "SlownessTower");
    assert_eq!(panel.actions, vec![PanelAction::Sell(tower)]);

    let mut events = Vec::new();
    world::apply(&mut level, panel.actions[0].command(), &mut events);
    assert_eq!(
        events,
        vec![Event::TowerSold {
            tower,
            cell: CellCoord::new(2, 2),
            refund: 30,
        }]
    );
    assert_eq!(query::economy(&level).money, 70);
    assert!(query::can_place_tower_here(&level, CellCoord::new(2, 2)));
    assert_eq!(query::tower_at(&level, CellCoord::new(2, 2)), None);

    events.clear();
    world::apply(&mut level, Command::SellTower { tower }, &mut events);
    assert!(matches!(events[0], Event::TowerSaleRejected { .. }));
    assert_eq!(query::economy(&level).money, 70);
}

#[test]
fn vulnerability_amplifies_following_hits() {
    let grid = Grid::new(10, 1, CellCoord::new(9, 0), 0, 3);
    let mut level = LevelInstance::from_parts(
        String::from("range"),
        grid,
        Vec::new(),
        vec![CellCoord::new(0, 0)],
    );
    let creep = level
        .create_creep_at(CreepKind::GenericCreep, 200, 4, CellCoord::new(0, 0))
        .expect("inside grid");
    let origin = CellPoint::new(5.0, 0.0);
    let _ = level.register_projectile(ProjectileKind::Weakness, origin, creep);
    let _ = level.register_projectile(ProjectileKind::Generic, origin, creep);

    let mut events = Vec::new();
    level.tick(Duration::from_secs(1), &mut events);

    let view = query::creep_view(&level);
    let snapshot = view.iter().next().expect("creep survives");
    // +500% vulnerability turns the 20 damage shell into 120.
    assert_eq!(snapshot.life, 80);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileImpacted { .. }))
            .count(),
        2
    );
}

#[test]
fn economy_is_conserved_across_a_played_level() {
    let level = LevelDefinition::generated(2).validate().expect("valid");
    let starting_money = level.grid().starting_money();
    let mut level = LevelInstance::new(level);
    let mut events = Vec::new();

    for (column, row) in [(1, 1), (3, 2), (6, 6), (7, 5)] {
        world::apply(
            &mut level,
            Command::PlaceTower {
                kind: TowerKind::GenericTower,
                cell: CellCoord::new(column, row),
            },
            &mut events,
        );
    }
    world::apply(&mut level, Command::AddMoney { amount: 250 }, &mut events);
    world::apply(
        &mut level,
        Command::PlaceTower {
            kind: TowerKind::LaserTower,
            cell: CellCoord::new(8, 7),
        },
        &mut events,
    );
    world::apply(&mut level, Command::StartInvasion, &mut events);

    let dt = Duration::from_millis(50);
    for _ in 0..4000 {
        world::apply(&mut level, Command::Tick { dt }, &mut events);
        if query::state(&level).is_terminal() {
            break;
        }
    }
    assert!(query::state(&level).is_terminal());

    let mut expected = i128::from(starting_money);
    for event in &events {
        match event {
            Event::TowerPlaced { cost, .. } => expected -= i128::from(*cost),
            Event::TowerSold { refund, .. } => expected += i128::from(*refund),
            Event::CreepKilled { bounty, .. } => expected += i128::from(*bounty),
            Event::MoneyGranted { amount } => expected += i128::from(*amount),
            _ => {}
        }
    }
    assert_eq!(i128::from(query::economy(&level).money), expected);
}

#[test]
fn scheduled_spawns_appear_in_order() {
    let grid = Grid::new(6, 3, CellCoord::new(5, 1), 0, 5);
    let events = (0..3)
        .map(|index| SpawnEvent {
            offset: Duration::from_secs(index),
            kind: CreepKind::GenericCreep,
            cell: CellCoord::new(0, 1),
            life: 10 + index as u32,
            bounty: 1,
        })
        .collect();
    let mut level = LevelInstance::from_parts(
        String::from("waves"),
        grid,
        vec![WavePlan {
            start: Duration::ZERO,
            events,
        }],
        vec![CellCoord::new(0, 1)],
    );
    assert!(level.start_invasion());

    let mut first = Vec::new();
    level.tick(Duration::from_secs(1), &mut first);
    let spawned = |events: &[Event]| {
        events
            .iter()
            .filter(|event| matches!(event, Event::CreepSpawned { .. }))
            .count()
    };
    assert_eq!(spawned(&first), 2);
    assert!(first.contains(&Event::WaveStarted { wave: 1 }));

    let mut second = Vec::new();
    level.tick(Duration::from_secs(1), &mut second);
    assert_eq!(spawned(&second), 1);
    assert!(query::schedule(&level).invasion_ended());
    assert_eq!(query::economy(&level).wave, 1);
    assert_eq!(query::state(&level), LevelState::Running);
}

#[test]
fn towers_shoot_creeps_that_walk_past() {
    let grid = Grid::new(7, 3, CellCoord::new(6, 1), 200, 5);
    let mut level = LevelInstance::from_parts(
        String::from("gallery"),
        grid,
        vec![WavePlan {
            start: Duration::ZERO,
            events: vec![SpawnEvent {
                offset: Duration::ZERO,
                kind: CreepKind::GenericCreep,
                cell: CellCoord::new(0, 1),
                life: 20,
                bounty: 15,
            }],
        }],
        vec![CellCoord::new(0, 1)],
    );
    let mut events = Vec::new();
    world::apply(
        &mut level,
        Command::PlaceTower {
            kind: TowerKind::LaserTower,
            cell: CellCoord::new(3, 0),
        },
        &mut events,
    );
    world::apply(&mut level, Command::StartInvasion, &mut events);
    for _ in 0..200 {
        world::apply(
            &mut level,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
    }

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::CreepKilled { bounty: 15, .. })));
    assert_eq!(query::state(&level), LevelState::Won);
    assert_eq!(query::economy(&level).money, 200 - 100 + 15);
}

#[test]
fn walled_scenario_with_a_walking_creep_plays_to_the_end() {
    let grid = Grid::new(5, 5, CellCoord::new(4, 4), 1000, 10);
    let wave = WavePlan {
        start: Duration::ZERO,
        events: vec![SpawnEvent {
            offset: Duration::ZERO,
            kind: CreepKind::GenericCreep,
            cell: CellCoord::new(0, 0),
            life: 10,
            bounty: 5,
        }],
    };
    let mut level = LevelInstance::from_parts(
        String::from("five"),
        grid,
        vec![wave],
        vec![CellCoord::new(0, 0)],
    );
    let mut events = Vec::new();
    world::apply(&mut level, Command::StartInvasion, &mut events);
    world::apply(
        &mut level,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        &mut events,
    );
    assert_eq!(query::creep_count(&level), 1, "creep is on its way");

    let off_path = place(&mut level, TowerKind::GenericTower, 0, 4);
    assert!(matches!(off_path, Event::TowerPlaced { .. }), "{off_path:?}");

    for row in (1..5).rev() {
        let event = place(&mut level, TowerKind::GenericTower, 2, row);
        assert!(
            matches!(event, Event::TowerPlaced { .. }),
            "row {row}: {event:?}"
        );
    }
    let closing = place(&mut level, TowerKind::GenericTower, 2, 0);
    assert_eq!(
        closing,
        Event::TowerPlacementRejected {
            kind: TowerKind::GenericTower,
            cell: CellCoord::new(2, 0),
            reason: PlacementError::NotPlaceable,
        }
    );
    assert_eq!(query::economy(&level).money, 1000 - 5 * 35);
    assert_eq!(query::tower_count(&level), 5);

    events.clear();
    for _ in 0..400 {
        world::apply(
            &mut level,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
    }

    let killed = events
        .iter()
        .filter(|event| matches!(event, Event::CreepKilled { .. }))
        .count();
    let reached = events
        .iter()
        .filter(|event| matches!(event, Event::CreepReachedGoal { .. }))
        .count();
    assert_eq!(killed + reached, 1);
    assert_eq!(query::state(&level), LevelState::Won);
    let economy = query::economy(&level);
    assert_eq!(economy.money, 1000 - 5 * 35 + 5 * killed as u64);
    assert_eq!(economy.lives, 10 - reached as u32);
}
