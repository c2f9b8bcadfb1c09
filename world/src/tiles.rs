//! Semantic tile layer with a mutation generation counter.

use campus_runner_core::{CellCoord, TileKind, TileLayerView};

/// Row-major tile kinds mirroring the grid dimensions.
///
/// Every successful write bumps `generation`, letting derived structures such
/// as the navigation graph detect that they were built from an older layer.
#[derive(Clone, Debug)]
pub(crate) struct TileLayer {
    columns: u32,
    rows: u32,
    kinds: Vec<TileKind>,
    generation: u64,
}

impl TileLayer {
    pub(crate) fn from_kinds(columns: u32, rows: u32, kinds: Vec<TileKind>) -> Self {
        Self {
            columns,
            rows,
            kinds,
            generation: 0,
        }
    }

    pub(crate) fn kind(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell).and_then(|index| self.kinds.get(index).copied())
    }

    /// Writes `kind` into `cell`, returning the previous kind.
    ///
    /// Writes outside the layer are ignored and leave the generation untouched.
    pub(crate) fn set(&mut self, cell: CellCoord, kind: TileKind) -> Option<TileKind> {
        let index = self.index(cell)?;
        let slot = self.kinds.get_mut(index)?;
        let previous = std::mem::replace(slot, kind);
        self.generation = self.generation.saturating_add(1);
        Some(previous)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn view(&self) -> TileLayerView<'_> {
        TileLayerView::new(&self.kinds, self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        cell.index_in(self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_bumps_generation_only_inside_layer() {
        let mut layer = TileLayer::from_kinds(2, 2, vec![TileKind::Normal; 4]);
        assert_eq!(layer.generation(), 0);

        assert_eq!(
            layer.set(CellCoord::new(1, 1), TileKind::Ice),
            Some(TileKind::Normal)
        );
        assert_eq!(layer.generation(), 1);
        assert_eq!(layer.kind(CellCoord::new(1, 1)), Some(TileKind::Ice));

        assert_eq!(layer.set(CellCoord::new(3, 0), TileKind::Ice), None);
        assert_eq!(layer.generation(), 1);
    }
}
