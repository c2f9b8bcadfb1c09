use std::time::Duration;

use campus_runner_core::{CellCoord, Direction, Event, PathAlgorithm};
use campus_runner_session::{Frame, Session, SessionConfig};
use campus_runner_system_tasks::Task;
use campus_runner_world::CampusLayout;

const CAMPUS: [&str; 9] = [
    "###########",
    "#....~....#",
    "#.##.#.##.#",
    "#.#..^..#.#",
    "#...#*#...#",
    "#.#..+..#.#",
    "#.##.#.##.#",
    "#....\"....#",
    "###########",
];

fn campus() -> CampusLayout {
    CampusLayout::from_markers(&CAMPUS)
        .expect("valid layout")
        .with_start(CellCoord::new(1, 1))
        .expect("open start")
        .with_building("Admin", CellCoord::new(9, 1))
        .expect("open building")
        .with_building("Cafeteria", CellCoord::new(1, 7))
        .expect("open building")
        .with_building("Library", CellCoord::new(9, 7))
        .expect("open building")
        .with_building("Quad", CellCoord::new(3, 4))
        .expect("open building")
}

fn catalog() -> Vec<Task> {
    ["Admin", "Cafeteria", "Library"]
        .iter()
        .enumerate()
        .map(|(index, building)| Task {
            id: format!("task{index}"),
            name: format!("Errand at {building}"),
            building: (*building).to_owned(),
            riddle: String::from("Follow the paths"),
            points: 10 * (index as u32 + 1),
            hint: String::new(),
        })
        .collect()
}

fn script() -> Vec<Option<Direction>> {
    use Direction::{East, North, South, West};
    [
        Some(East),
        Some(East),
        None,
        Some(South),
        Some(South),
        None,
        Some(East),
        Some(South),
        None,
        None,
        Some(West),
        Some(North),
        Some(East),
    ]
    .into_iter()
    .cycle()
    .take(120)
    .collect()
}

fn run(seed: u64) -> (Vec<Event>, Vec<Frame>) {
    let config = SessionConfig::new(Duration::from_secs(120), seed)
        .with_event_timing(Duration::from_secs(2), Duration::from_secs(3));
    let mut session = Session::new(campus(), catalog(), config);
    let mut log = Vec::new();
    let mut frames = Vec::new();

    for step in script() {
        if let Some(direction) = step {
            log.extend(session.move_player(direction));
        }
        log.extend(session.tick(Duration::from_millis(500)));
        let _ = session.request_path(PathAlgorithm::AStar);
        frames.push(session.frame());
    }

    (log, frames)
}

#[test]
fn same_seed_replays_identically() {
    let first = run(2024);
    let second = run(2024);

    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn replay_exercises_map_events_and_npcs() {
    let (log, frames) = run(2024);

    assert!(log
        .iter()
        .any(|event| matches!(event, Event::MapEventStarted { .. })));
    assert!(frames.iter().all(|frame| frame.npcs.len() == 4));
}
