//! Min-priority frontier used by the heuristic search.

use std::{cmp::Ordering, collections::BinaryHeap};

use campus_runner_core::CellCoord;

/// Binary-heap frontier ordered by ascending priority.
///
/// Entries with equal priority pop in insertion order. Stale entries are not
/// removed; callers skip cells they have already expanded.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    sequence: u64,
}

impl Frontier {
    pub(crate) fn push(&mut self, cell: CellCoord, priority: f32) {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        self.heap.push(Entry {
            priority,
            sequence,
            cell,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<CellCoord> {
        self.heap.pop().map(|entry| entry.cell)
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    priority: f32,
    sequence: u64,
    cell: CellCoord,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert both keys.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_priority_first() {
        let mut frontier = Frontier::default();
        frontier.push(CellCoord::new(0, 0), 3.0);
        frontier.push(CellCoord::new(1, 0), 1.5);
        frontier.push(CellCoord::new(2, 0), 2.0);

        assert_eq!(frontier.pop(), Some(CellCoord::new(1, 0)));
        assert_eq!(frontier.pop(), Some(CellCoord::new(2, 0)));
        assert_eq!(frontier.pop(), Some(CellCoord::new(0, 0)));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn equal_priorities_pop_in_insertion_order() {
        let mut frontier = Frontier::default();
        for column in 0..4 {
            frontier.push(CellCoord::new(column, 0), 1.0);
        }
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(
            order,
            (0..4).map(|column| CellCoord::new(column, 0)).collect::<Vec<_>>()
        );
    }
}
