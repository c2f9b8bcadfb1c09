//! Weighted adjacency derived from the occupancy grid and tile layer.

use campus_runner_core::{Capability, CellCoord, Direction, GridView, TileLayerView};
use tracing::debug;

/// Weight assigned to every edge when no tile layer is supplied.
const UNIT_WEIGHT: f32 = 1.0;

/// Directed entry pointing at a walkable neighbour.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Edge {
    to: CellCoord,
    weight: f32,
}

/// Navigation graph over the walkable cells of the campus.
///
/// Every walkable cell is a vertex. Each vertex stores its walkable orthogonal
/// neighbours in north, east, south, west order together with the cost of
/// entering them, so `weight(a, b)` and `weight(b, a)` may differ. The graph is
/// a disposable snapshot: it remembers the tile generation and capability it
/// was built from and must be rebuilt once either changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationGraph {
    columns: u32,
    rows: u32,
    walkable: Vec<bool>,
    adjacency: Vec<Vec<Edge>>,
    generation: u64,
    capability: Capability,
}

impl NavigationGraph {
    /// Builds a fresh graph from the provided views.
    #[must_use]
    pub fn build(
        grid: GridView<'_>,
        tiles: Option<TileLayerView<'_>>,
        capability: Capability,
        generation: u64,
    ) -> Self {
        let mut graph = Self::default();
        graph.rebuild(grid, tiles, capability, generation);
        graph
    }

    /// Discards the current adjacency and rebuilds it from the provided views.
    ///
    /// A cell is walkable when the grid reports it open and, if a tile layer is
    /// present, its tile kind admits an agent holding `capability`. Edge weights
    /// are the destination tile's traversal weight, or `1.0` without tiles.
    pub fn rebuild(
        &mut self,
        grid: GridView<'_>,
        tiles: Option<TileLayerView<'_>>,
        capability: Capability,
        generation: u64,
    ) {
        let (columns, rows) = grid.dimensions();
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);

        self.columns = columns;
        self.rows = rows;
        self.generation = generation;
        self.capability = capability;
        self.walkable.clear();
        self.walkable.resize(cell_count, false);
        self.adjacency.clear();
        self.adjacency.resize_with(cell_count, Vec::new);

        let is_walkable = |cell: CellCoord| {
            grid.is_walkable(cell)
                && tiles.map_or(true, |layer| {
                    layer
                        .kind(cell)
                        .map_or(false, |kind| kind.is_walkable(capability))
                })
        };
        let weight_of = |cell: CellCoord| {
            tiles
                .and_then(|layer| layer.kind(cell))
                .map_or(UNIT_WEIGHT, |kind| kind.traversal_weight(capability))
        };

        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if !is_walkable(cell) {
                    continue;
                }
                let Some(index) = self.index(cell) else {
                    continue;
                };
                self.walkable[index] = true;

                for direction in Direction::ALL {
                    let Some(neighbor) = cell.step(direction) else {
                        continue;
                    };
                    if !is_walkable(neighbor) {
                        continue;
                    }
                    self.adjacency[index].push(Edge {
                        to: neighbor,
                        weight: weight_of(neighbor),
                    });
                }
            }
        }

        debug!(
            generation,
            holds_key = capability.holds_key(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "navigation graph rebuilt"
        );
    }

    /// Walkable neighbours of `cell`; empty for blocked or out-of-bounds cells.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        self.edges(cell).map(|(neighbor, _)| neighbor)
    }

    /// Walkable neighbours of `cell` paired with the cost of entering them.
    pub fn edges(&self, cell: CellCoord) -> impl Iterator<Item = (CellCoord, f32)> + '_ {
        self.index(cell)
            .and_then(|index| self.adjacency.get(index))
            .into_iter()
            .flatten()
            .map(|edge| (edge.to, edge.weight))
    }

    /// Cost of stepping from `from` into the adjacent cell `to`.
    #[must_use]
    pub fn weight(&self, from: CellCoord, to: CellCoord) -> Option<f32> {
        self.edges(from)
            .find(|(neighbor, _)| *neighbor == to)
            .map(|(_, weight)| weight)
    }

    /// Reports whether `cell` is a vertex of the graph.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.walkable.iter().filter(|walkable| **walkable).count()
    }

    /// Number of directed adjacency entries; every undirected link counts twice.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Total cost of walking `cells` in order.
    ///
    /// Returns `None` when two consecutive cells are not adjacent in the graph.
    /// Paths with fewer than two cells cost nothing.
    #[must_use]
    pub fn path_cost(&self, cells: &[CellCoord]) -> Option<f32> {
        cells
            .windows(2)
            .try_fold(0.0, |total, pair| Some(total + self.weight(pair[0], pair[1])?))
    }

    /// Smallest edge weight present in the graph, if it has any edge.
    #[must_use]
    pub fn min_weight(&self) -> Option<f32> {
        self.adjacency
            .iter()
            .flatten()
            .map(|edge| edge.weight)
            .min_by(f32::total_cmp)
    }

    /// Tile generation the graph was built from.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Capability the graph was built for.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        self.capability
    }

    /// Dimensions of the grid the graph was built from.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the graph reflects the tile layer at `generation`.
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Panics in debug builds when the graph is older than `generation`.
    pub fn debug_assert_current(&self, generation: u64) {
        debug_assert!(
            self.is_current(generation),
            "navigation graph built from generation {} but tile layer is at {}",
            self.generation,
            generation
        );
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        cell.index_in(self.columns, self.rows)
    }
}
