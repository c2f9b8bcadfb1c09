//! Campus layout description and validation.

use std::collections::BTreeMap;

use campus_runner_core::{CellCoord, TileKind};
use thiserror::Error;

/// Errors raised while assembling a campus layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout contained no rows or no columns.
    #[error("campus layout is empty")]
    Empty,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} cells but {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width established by the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A marker character did not map to a tile kind.
    #[error("unknown tile marker '{marker}' at {cell}")]
    UnknownMarker {
        /// Character that failed to parse.
        marker: char,
        /// Location of the marker.
        cell: CellCoord,
    },
    /// A named position lies outside the grid.
    #[error("'{name}' at {cell} lies outside the campus")]
    OutOfBounds {
        /// Name of the building or spawn point.
        name: String,
        /// Requested position.
        cell: CellCoord,
    },
    /// A named position sits on a tile nobody can stand on.
    #[error("'{name}' at {cell} is not on a walkable tile")]
    NotWalkable {
        /// Name of the building or spawn point.
        name: String,
        /// Requested position.
        cell: CellCoord,
    },
    /// The layout has no cell the player could start on.
    #[error("campus layout has no walkable cell")]
    NoWalkableCell,
}

/// Static description of a campus: tiles, named buildings and the player spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampusLayout {
    columns: u32,
    rows: u32,
    kinds: Vec<TileKind>,
    buildings: BTreeMap<String, CellCoord>,
    start: CellCoord,
}

impl CampusLayout {
    /// Parses a layout from rows of tile markers.
    ///
    /// Recognised markers: `#` wall, `.` path, `*` ice, `"` grass, `~` water,
    /// `^` trap, `+` booster, `A`/`B` portals, `G` locked gate, `K` key and `C`
    /// construction. The player starts on the first walkable cell until
    /// [`CampusLayout::with_start`] says otherwise.
    pub fn from_markers<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let row_count = u32::try_from(rows.len()).map_err(|_| LayoutError::Empty)?;
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let columns = u32::try_from(first.as_ref().chars().count()).map_err(|_| LayoutError::Empty)?;
        if columns == 0 {
            return Err(LayoutError::Empty);
        }

        let mut kinds = Vec::with_capacity(rows.len() * columns as usize);
        for (row_index, row) in (0u32..).zip(rows) {
            let mut found = 0u32;
            for (column_index, marker) in (0u32..).zip(row.as_ref().chars()) {
                let cell = CellCoord::new(column_index, row_index);
                let kind = parse_marker(marker).ok_or(LayoutError::UnknownMarker { marker, cell })?;
                kinds.push(kind);
                found += 1;
            }
            if found != columns {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected: columns,
                    found,
                });
            }
        }

        let start = kinds
            .iter()
            .position(|kind| !kind.blocks_occupancy() && *kind != TileKind::LockedGate)
            .and_then(|index| u32::try_from(index).ok())
            .map(|index| CellCoord::new(index % columns, index / columns))
            .ok_or(LayoutError::NoWalkableCell)?;

        Ok(Self {
            columns,
            rows: row_count,
            kinds,
            buildings: BTreeMap::new(),
            start,
        })
    }

    /// Registers a named building at `cell`.
    pub fn with_building(mut self, name: impl Into<String>, cell: CellCoord) -> Result<Self, LayoutError> {
        let name = name.into();
        self.validate_position(&name, cell)?;
        let _ = self.buildings.insert(name, cell);
        Ok(self)
    }

    /// Overrides the player's spawn cell.
    pub fn with_start(mut self, cell: CellCoord) -> Result<Self, LayoutError> {
        self.validate_position("start", cell)?;
        self.start = cell;
        Ok(self)
    }

    /// Number of columns in the campus grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the campus grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell the player spawns on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Named buildings ordered by name.
    #[must_use]
    pub fn buildings(&self) -> &BTreeMap<String, CellCoord> {
        &self.buildings
    }

    /// Tile kinds in row-major order.
    #[must_use]
    pub fn kinds(&self) -> &[TileKind] {
        &self.kinds
    }

    fn kind(&self, cell: CellCoord) -> Option<TileKind> {
        cell.index_in(self.columns, self.rows)
            .and_then(|index| self.kinds.get(index).copied())
    }

    fn validate_position(&self, name: &str, cell: CellCoord) -> Result<(), LayoutError> {
        let Some(kind) = self.kind(cell) else {
            return Err(LayoutError::OutOfBounds {
                name: name.to_owned(),
                cell,
            });
        };
        if kind.blocks_occupancy() {
            return Err(LayoutError::NotWalkable {
                name: name.to_owned(),
                cell,
            });
        }
        Ok(())
    }
}

fn parse_marker(marker: char) -> Option<TileKind> {
    let kind = match marker {
        '.' | '0' => TileKind::Normal,
        '#' | '1' => TileKind::Wall,
        '*' => TileKind::Ice,
        '"' => TileKind::Grass,
        '~' => TileKind::Water,
        '^' => TileKind::Trap,
        '+' => TileKind::Booster,
        'A' => TileKind::PortalA,
        'B' => TileKind::PortalB,
        'G' => TileKind::LockedGate,
        'K' => TileKind::Key,
        'C' => TileKind::Construction,
        _ => return None,
    };
    Some(kind)
}
