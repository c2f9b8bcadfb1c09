use std::time::Duration;

use campus_runner_core::{
    CellCoord, Command, Direction, Event, MapEvent, MapEventKind, MoveError, PathAlgorithm,
    PlayState,
};
use campus_runner_session::{Session, SessionConfig};
use campus_runner_system_tasks::Task;
use campus_runner_system_tile_effects::EffectMessage;
use campus_runner_world::{query, CampusLayout};

const TICK: Duration = Duration::from_millis(16);

fn quiet_config() -> SessionConfig {
    SessionConfig::new(Duration::from_secs(300), 7)
        .with_map_events(false)
        .with_npcs(false)
}

fn layout(rows: &[&str], start: CellCoord) -> CampusLayout {
    CampusLayout::from_markers(rows)
        .expect("valid layout")
        .with_start(start)
        .expect("open start")
}

fn task(id: &str, building: &str, points: u32) -> Task {
    Task {
        id: id.to_owned(),
        name: format!("Visit {building}"),
        building: building.to_owned(),
        riddle: String::from("Where could it be?"),
        points,
        hint: String::from("Look around"),
    }
}

#[test]
fn reaching_the_last_building_wins_the_game() {
    let campus = layout(&["#####", "#...#", "#####"], CellCoord::new(1, 1))
        .with_building("Library", CellCoord::new(3, 1))
        .expect("open building");
    let mut session = Session::new(campus, vec![task("t1", "Library", 80)], quiet_config());
    assert_eq!(session.frame().target, Some(CellCoord::new(3, 1)));

    let _ = session.move_player(Direction::East);
    let events = session.move_player(Direction::East);

    assert!(events.contains(&Event::ScoreChanged { score: 80 }));
    assert!(events.contains(&Event::PlayStateChanged {
        state: PlayState::Victory
    }));
    let frame = session.frame();
    assert_eq!(frame.score, 80);
    assert_eq!(frame.play_state, PlayState::Victory);
    assert_eq!(frame.completed_tasks, 1);
    assert!(frame.current_task.is_none());
    assert_eq!(
        session.last_completion().map(|completion| completion.points),
        Some(80)
    );
}

#[test]
fn traps_cost_time_only_once() {
    let campus = layout(&["#####", "#.^.#", "#####"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let events = session.move_player(Direction::East);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TimePenaltyApplied { penalty, .. } if *penalty == Duration::from_secs(5)
    )));
    assert_eq!(session.frame().time_remaining, Duration::from_secs(295));
    assert_eq!(
        session.frame().message,
        Some(EffectMessage::Trap {
            penalty: Duration::from_secs(5)
        })
    );

    let _ = session.move_player(Direction::West);
    let events = session.move_player(Direction::East);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::TimePenaltyApplied { .. })));
    assert_eq!(session.frame().time_remaining, Duration::from_secs(295));
}

#[test]
fn key_opens_locked_gates_for_movement_and_paths() {
    let campus = layout(&["######", "#K.G.#", "######"], CellCoord::new(2, 1))
        .with_building("Quad", CellCoord::new(4, 1))
        .expect("open building");
    let mut session = Session::new(campus, vec![task("t1", "Quad", 50)], quiet_config());

    let locked = session
        .request_path(PathAlgorithm::Bfs)
        .expect("task assigned")
        .clone();
    assert!(locked.result.is_empty());
    let events = session.move_player(Direction::East);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::East,
            reason: MoveError::Blocked,
        }]
    );

    let _ = session.move_player(Direction::West);
    assert!(session.frame().holds_key);
    assert!(session.graph().capability().holds_key());

    let unlocked = session
        .request_path(PathAlgorithm::AStar)
        .expect("task assigned")
        .clone();
    assert_eq!(unlocked.result.len(), 4);

    for _ in 0..3 {
        let _ = session.move_player(Direction::East);
    }
    assert_eq!(session.frame().player, CellCoord::new(4, 1));
    assert_eq!(session.frame().score, 50);
}

#[test]
fn construction_rebuilds_the_graph_before_the_next_search() {
    let campus = layout(
        &["#####", "#...#", "#.#.#", "#...#", "#####"],
        CellCoord::new(1, 1),
    )
    .with_building("Lab", CellCoord::new(3, 1))
    .expect("open building");
    let mut session = Session::new(campus, vec![task("t1", "Lab", 10)], quiet_config());

    let direct = session
        .request_path(PathAlgorithm::Bfs)
        .expect("task assigned")
        .clone();
    assert_eq!(direct.result.len(), 3);

    let events = session.apply(Command::StartMapEvent {
        event: MapEvent::Construction {
            cells: vec![CellCoord::new(2, 1)],
            duration: Duration::from_secs(1),
        },
    });
    assert!(events.contains(&Event::MapEventStarted {
        kind: MapEventKind::Construction
    }));
    assert!(session
        .graph()
        .is_current(query::tile_generation(session.world())));

    let detour = session
        .request_path(PathAlgorithm::AStar)
        .expect("task assigned")
        .clone();
    assert_eq!(detour.result.len(), 7);
    assert_eq!(session.frame().map_events, vec![MapEventKind::Construction]);

    let events = session.tick(Duration::from_secs(1));
    assert!(events.contains(&Event::MapEventEnded {
        kind: MapEventKind::Construction
    }));
    let reopened = session
        .request_path(PathAlgorithm::Bfs)
        .expect("task assigned")
        .clone();
    assert_eq!(reopened.result.len(), 3);
}

#[test]
fn ice_slides_the_player_over_the_following_ticks() {
    let campus = layout(&["#######", "#.*...#", "#######"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let _ = session.move_player(Direction::East);
    assert_eq!(session.frame().player, CellCoord::new(2, 1));
    assert_eq!(session.frame().message, Some(EffectMessage::Ice));

    let _ = session.tick(TICK);
    assert_eq!(session.frame().player, CellCoord::new(3, 1));
    let _ = session.tick(TICK);
    assert_eq!(session.frame().player, CellCoord::new(4, 1));
    let _ = session.tick(TICK);
    assert_eq!(session.frame().player, CellCoord::new(4, 1));
}

#[test]
fn sliding_onto_a_trap_costs_time() {
    let campus = layout(&["#######", "#.*^..#", "#######"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let _ = session.move_player(Direction::East);
    let events = session.tick(TICK);

    assert_eq!(session.frame().player, CellCoord::new(3, 1));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TimePenaltyApplied { penalty, .. } if *penalty == Duration::from_secs(5)
    )));
    assert_eq!(
        session.frame().time_remaining,
        Duration::from_secs(295) - TICK
    );
    assert!(session.effects().trap_triggered(CellCoord::new(3, 1)));

    let _ = session.tick(TICK);
    assert_eq!(session.frame().player, CellCoord::new(4, 1));
}

#[test]
fn sliding_onto_the_key_unlocks_gates() {
    let campus = layout(&["#######", "#.*.KG#", "#######"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let _ = session.move_player(Direction::East);
    let _ = session.tick(TICK);
    let _ = session.tick(TICK);

    assert_eq!(session.frame().player, CellCoord::new(4, 1));
    assert!(session.frame().holds_key);
    assert_eq!(session.frame().message, Some(EffectMessage::KeyAcquired));
    assert!(session.graph().capability().holds_key());
    assert!(session.graph().contains(CellCoord::new(5, 1)));
}

#[test]
fn ice_slide_stops_at_walls() {
    let campus = layout(&["#####", "#.*.#", "#####"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let _ = session.move_player(Direction::East);
    for _ in 0..3 {
        let _ = session.tick(TICK);
    }
    assert_eq!(session.frame().player, CellCoord::new(3, 1));
    assert!(!session.effects().is_sliding());
}

#[test]
fn portals_teleport_to_their_counterpart() {
    let campus = layout(&["#######", "#.A.B.#", "#######"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let events = session.move_player(Direction::East);
    assert!(events.contains(&Event::PlayerRelocated {
        from: CellCoord::new(2, 1),
        to: CellCoord::new(4, 1),
    }));
    assert_eq!(session.frame().message, Some(EffectMessage::Teleport));
}

#[test]
fn booster_and_rain_combine_into_the_cost_multiplier() {
    let campus = layout(&["#####", "#.+.#", "#####"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());
    assert_eq!(session.movement_cost_multiplier(), 1.0);

    let _ = session.apply(Command::StartMapEvent {
        event: MapEvent::Rain {
            duration: Duration::from_secs(20),
        },
    });
    assert_eq!(session.movement_cost_multiplier(), 2.0);

    let _ = session.move_player(Direction::East);
    assert_eq!(session.movement_cost_multiplier(), 1.0);

    let _ = session.tick(Duration::from_secs(3));
    assert_eq!(session.movement_cost_multiplier(), 2.0);
}

#[test]
fn undo_restores_the_previous_cell() {
    let campus = layout(&["#####", "#...#", "#####"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let _ = session.move_player(Direction::East);
    let events = session.undo();
    assert_eq!(
        events,
        vec![Event::MoveUndone {
            from: CellCoord::new(2, 1),
            to: CellCoord::new(1, 1),
        }]
    );
    assert!(session.undo().is_empty());
}

#[test]
fn pause_freezes_the_clock_and_movement() {
    let campus = layout(&["#####", "#...#", "#####"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());

    let _ = session.toggle_pause();
    assert_eq!(session.frame().play_state, PlayState::Paused);
    let _ = session.tick(Duration::from_secs(10));
    assert_eq!(session.frame().time_remaining, Duration::from_secs(300));
    let events = session.move_player(Direction::East);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::East,
            reason: MoveError::NotPlaying,
        }]
    );

    let _ = session.toggle_pause();
    assert_eq!(session.frame().play_state, PlayState::Playing);
}

#[test]
fn running_out_of_time_ends_the_game() {
    let campus = layout(&["###", "#.#", "###"], CellCoord::new(1, 1));
    let config = SessionConfig::new(Duration::from_secs(2), 1)
        .with_map_events(false)
        .with_npcs(false);
    let mut session = Session::new(campus, Vec::new(), config);

    let _ = session.tick(Duration::from_secs(1));
    assert_eq!(session.frame().play_state, PlayState::Playing);
    let _ = session.tick(Duration::from_secs(1));
    assert_eq!(session.frame().play_state, PlayState::GameOver);
    assert!(session.toggle_pause().is_empty());
}

#[test]
fn npcs_block_the_cell_they_stand_on() {
    let campus = layout(&["#####", "#...#", "#####"], CellCoord::new(1, 1))
        .with_building("Hall", CellCoord::new(2, 1))
        .expect("open building");
    let config = SessionConfig::new(Duration::from_secs(300), 3).with_map_events(false);
    let mut session = Session::new(campus, Vec::new(), config);
    assert_eq!(session.npcs().len(), 1);

    let events = session.move_player(Direction::East);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::East,
            reason: MoveError::OccupiedByNpc,
        }]
    );
    assert!(session.npcs().interaction_near(CellCoord::new(1, 1)).is_some());
}

#[test]
fn path_requests_record_algorithm_statistics() {
    let campus = layout(&["######", "#....#", "#....#", "######"], CellCoord::new(1, 1))
        .with_building("Gym", CellCoord::new(4, 2))
        .expect("open building");
    let mut session = Session::new(campus, vec![task("t1", "Gym", 5)], quiet_config());

    let bfs = session
        .request_path(PathAlgorithm::Bfs)
        .expect("task assigned")
        .clone();
    let astar = session
        .request_path(PathAlgorithm::AStar)
        .expect("task assigned")
        .clone();

    assert_eq!(bfs.result.len(), astar.result.len());
    let stats = session.algorithm_stats();
    assert_eq!(
        stats.nodes_explored(PathAlgorithm::Bfs),
        Some(bfs.result.nodes_explored)
    );
    assert_eq!(
        stats.nodes_explored(PathAlgorithm::AStar),
        Some(astar.result.nodes_explored)
    );
    assert_eq!(session.frame().path, Some(astar));

    session.clear_path();
    assert!(session.frame().path.is_none());
}

#[test]
fn skipping_keeps_a_task_assigned() {
    let campus = layout(&["#####", "#...#", "#####"], CellCoord::new(1, 1))
        .with_building("A", CellCoord::new(2, 1))
        .expect("open building")
        .with_building("B", CellCoord::new(3, 1))
        .expect("open building");
    let mut session = Session::new(
        campus,
        vec![task("t1", "A", 10), task("t2", "B", 20)],
        quiet_config(),
    );

    for _ in 0..5 {
        let skipped = session.skip_task().expect("tasks remain").id.clone();
        assert!(skipped == "t1" || skipped == "t2");
    }
}

#[test]
fn reset_restores_the_initial_state() {
    let campus = layout(&["#####", "#.^.#", "#####"], CellCoord::new(1, 1));
    let mut session = Session::new(campus, Vec::new(), quiet_config());
    let initial = session.frame();

    let _ = session.move_player(Direction::East);
    let _ = session.tick(Duration::from_secs(4));
    assert_ne!(session.frame(), initial);

    session.reset();
    assert_eq!(session.frame(), initial);
    assert!(!session.effects().trap_triggered(CellCoord::new(2, 1)));
}

#[test]
fn scheduled_map_events_keep_the_graph_current() {
    let campus = layout(
        &["#######", "#.....#", "#.....#", "#.....#", "#######"],
        CellCoord::new(1, 1),
    );
    let config = SessionConfig::new(Duration::from_secs(300), 99)
        .with_npcs(false)
        .with_event_timing(Duration::from_secs(1), Duration::from_secs(1));
    let mut session = Session::new(campus, Vec::new(), config);

    let mut started = 0;
    for _ in 0..10 {
        let events = session.tick(Duration::from_secs(1));
        started += events
            .iter()
            .filter(|event| matches!(event, Event::MapEventStarted { .. }))
            .count();
        assert!(session
            .graph()
            .is_current(query::tile_generation(session.world())));
    }
    assert!(started > 0);
}
