//! Activation, countdown and reversal of dynamic map events.

use std::time::Duration;

use campus_runner_core::{CellCoord, MapEvent, MapEventKind, TileKind};

use crate::{grid::GridMap, tiles::TileLayer};

/// Map event currently reshaping the campus.
#[derive(Clone, Debug)]
pub(crate) struct ActiveMapEvent {
    kind: MapEventKind,
    remaining: Duration,
    originals: Vec<(CellCoord, TileKind)>,
}

impl ActiveMapEvent {
    /// Applies `event` to the grid and tile layer, remembering the replaced tiles.
    ///
    /// Cells outside the grid and cells already held by another active event
    /// (`claimed`) are skipped so that overlapping events restore cleanly.
    pub(crate) fn activate<F>(
        event: &MapEvent,
        grid: &mut GridMap,
        tiles: &mut TileLayer,
        claimed: F,
    ) -> Self
    where
        F: Fn(CellCoord) -> bool,
    {
        let mut originals = Vec::with_capacity(event.cells().len());
        for &cell in event.cells() {
            if claimed(cell) || originals.iter().any(|(seen, _)| *seen == cell) {
                continue;
            }
            let Some(previous) = tiles.set(cell, TileKind::Construction) else {
                continue;
            };
            grid.set_blocked(cell, TileKind::Construction.blocks_occupancy());
            originals.push((cell, previous));
        }

        Self {
            kind: event.kind(),
            remaining: event.duration(),
            originals,
        }
    }

    /// Counts the event down, returning whether it is still active.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        !self.remaining.is_zero()
    }

    /// Restores every tile the event replaced. Returns whether any tile changed.
    pub(crate) fn revert(self, grid: &mut GridMap, tiles: &mut TileLayer) -> bool {
        let changed = !self.originals.is_empty();
        for (cell, original) in self.originals {
            let _ = tiles.set(cell, original);
            grid.set_blocked(cell, original.blocks_occupancy());
        }
        changed
    }

    pub(crate) fn kind(&self) -> MapEventKind {
        self.kind
    }

    pub(crate) fn claims(&self, cell: CellCoord) -> bool {
        self.originals.iter().any(|(claimed, _)| *claimed == cell)
    }

    pub(crate) fn touches_tiles(&self) -> bool {
        !self.originals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world(columns: u32, rows: u32) -> (GridMap, TileLayer) {
        let count = (columns * rows) as usize;
        (
            GridMap::from_blocked(columns, rows, vec![false; count]),
            TileLayer::from_kinds(columns, rows, vec![TileKind::Normal; count]),
        )
    }

    #[test]
    fn construction_blocks_and_restores_cells() {
        let (mut grid, mut tiles) = open_world(3, 3);
        let cell = CellCoord::new(1, 1);
        let event = MapEvent::Construction {
            cells: vec![cell],
            duration: Duration::from_secs(2),
        };

        let mut active = ActiveMapEvent::activate(&event, &mut grid, &mut tiles, |_| false);
        assert_eq!(tiles.kind(cell), Some(TileKind::Construction));
        assert!(!grid.is_walkable(cell));

        assert!(active.advance(Duration::from_secs(1)));
        assert!(!active.advance(Duration::from_secs(1)));

        assert!(active.revert(&mut grid, &mut tiles));
        assert_eq!(tiles.kind(cell), Some(TileKind::Normal));
        assert!(grid.is_walkable(cell));
    }

    #[test]
    fn claimed_cells_are_left_alone() {
        let (mut grid, mut tiles) = open_world(2, 1);
        let claimed = CellCoord::new(0, 0);
        let event = MapEvent::FireDrill {
            cells: vec![claimed, CellCoord::new(1, 0)],
            duration: Duration::from_secs(5),
        };

        let active =
            ActiveMapEvent::activate(&event, &mut grid, &mut tiles, |cell| cell == claimed);

        assert!(!active.claims(claimed));
        assert!(active.claims(CellCoord::new(1, 0)));
        assert_eq!(tiles.kind(claimed), Some(TileKind::Normal));
    }

    #[test]
    fn rain_does_not_touch_tiles() {
        let (mut grid, mut tiles) = open_world(2, 2);
        let event = MapEvent::Rain {
            duration: Duration::from_secs(10),
        };
        let active = ActiveMapEvent::activate(&event, &mut grid, &mut tiles, |_| false);
        assert!(!active.touches_tiles());
        assert_eq!(tiles.generation(), 0);
        assert!(!active.revert(&mut grid, &mut tiles));
    }
}
