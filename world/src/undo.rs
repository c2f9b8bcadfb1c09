//! Bounded undo history for player moves.

use std::collections::VecDeque;

/// Default number of moves remembered by the undo history.
pub(crate) const DEFAULT_UNDO_CAPACITY: usize = 50;

/// Last-in-first-out stack that forgets its oldest entry once full.
#[derive(Clone, Debug)]
pub(crate) struct UndoStack<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> UndoStack<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut stack = UndoStack::with_capacity(4);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn drops_oldest_entry_when_full() {
        let mut stack = UndoStack::with_capacity(2);
        stack.push('a');
        stack.push('b');
        stack.push('c');
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some('c'));
        assert_eq!(stack.pop(), Some('b'));
        assert_eq!(stack.pop(), None);
    }
}
