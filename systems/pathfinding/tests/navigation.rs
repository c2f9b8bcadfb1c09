use std::time::Duration;

use campus_runner_core::{Capability, CellCoord, Command, Event, MapEvent, PathAlgorithm};
use campus_runner_system_pathfinding::{find_path, search_astar, search_bfs, NavigationGraph};
use campus_runner_world::{self as world, query, CampusLayout, World, DEFAULT_TIME_LIMIT};

fn build_graph(world: &World, capability: Capability) -> NavigationGraph {
    NavigationGraph::build(
        query::grid_view(world),
        Some(query::tile_view(world)),
        capability,
        query::tile_generation(world),
    )
}

#[test]
fn graph_reflects_world_layout() {
    let layout = CampusLayout::from_markers(&[
        "#######",
        "#..~..#",
        "#.###.#",
        "#..G..#",
        "#######",
    ])
    .expect("valid layout");
    let world = World::new(&layout, DEFAULT_TIME_LIMIT);

    let graph = build_graph(&world, Capability::NONE);
    assert_eq!(graph.node_count(), 11);
    assert!(!graph.contains(CellCoord::new(3, 3)));

    let keyed = build_graph(&world, Capability::with_key());
    assert_eq!(keyed.node_count(), 12);
    assert!(keyed.contains(CellCoord::new(3, 3)));

    // Without the key only the water row connects both halves.
    let start = CellCoord::new(1, 3);
    let goal = CellCoord::new(5, 3);
    let locked = search_astar(&graph, start, goal);
    assert!(locked.cells.contains(&CellCoord::new(3, 1)));
    let unlocked = search_astar(&keyed, start, goal);
    assert_eq!(unlocked.len(), 5);
}

#[test]
fn construction_forces_a_rebuild() {
    let layout = CampusLayout::from_markers(&["#####", "#...#", "#.#.#", "#...#", "#####"])
        .expect("valid layout");
    let mut world = World::new(&layout, DEFAULT_TIME_LIMIT);
    let mut graph = build_graph(&world, Capability::NONE);
    let start = CellCoord::new(1, 1);
    let goal = CellCoord::new(3, 1);
    assert_eq!(search_bfs(&graph, start, goal).len(), 3);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartMapEvent {
            event: MapEvent::Construction {
                cells: vec![CellCoord::new(2, 1)],
                duration: Duration::from_secs(20),
            },
        },
        &mut events,
    );

    let generation = events
        .iter()
        .find_map(|event| match event {
            Event::TileLayerChanged { generation } => Some(*generation),
            _ => None,
        })
        .expect("construction changes tiles");
    assert!(!graph.is_current(generation));

    graph.rebuild(
        query::grid_view(&world),
        Some(query::tile_view(&world)),
        Capability::NONE,
        generation,
    );
    graph.debug_assert_current(query::tile_generation(&world));

    let detour = find_path(&graph, PathAlgorithm::Bfs, start, goal);
    assert_eq!(detour.len(), 7);
    assert!(!detour.cells.contains(&CellCoord::new(2, 1)));
}

#[test]
fn rebuilding_twice_yields_identical_graphs() {
    let layout = CampusLayout::from_markers(&["*\"~^", "+AB.", "KGC."]).expect("valid layout");
    let world = World::new(&layout, DEFAULT_TIME_LIMIT);

    let first = build_graph(&world, Capability::NONE);
    let mut second = build_graph(&world, Capability::NONE);
    second.rebuild(
        query::grid_view(&world),
        Some(query::tile_view(&world)),
        Capability::NONE,
        query::tile_generation(&world),
    );

    assert_eq!(first, second);
}
