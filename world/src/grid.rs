//! Base occupancy grid owned by the world.

use campus_runner_core::{CellCoord, GridView};

/// Dense wall/open grid independent of tile semantics.
#[derive(Clone, Debug)]
pub(crate) struct GridMap {
    columns: u32,
    rows: u32,
    blocked: Vec<bool>,
}

impl GridMap {
    /// Creates a grid from a row-major blocked mask.
    pub(crate) fn from_blocked(columns: u32, rows: u32, blocked: Vec<bool>) -> Self {
        Self {
            columns,
            rows,
            blocked,
        }
    }

    pub(crate) fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.blocked.get(index).copied())
            .map_or(false, |blocked| !blocked)
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Flips the occupancy bit of a single cell. Cells outside the grid are ignored.
    pub(crate) fn set_blocked(&mut self, cell: CellCoord, blocked: bool) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.blocked.get_mut(index) {
                *slot = blocked;
            }
        }
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.blocked, self.columns, self.rows)
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        cell.index_in(self.columns, self.rows)
    }
}
