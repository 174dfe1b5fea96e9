/// Position value of the first and last index of an empty cursor, and of its
/// current index. Only used for comparisons; the public surface reports empty
/// positions as `None`.
pub(crate) const EMPTY: isize = -1;

// Collections are backed by Vec, whose length never exceeds isize::MAX.
pub(crate) fn signed(pos: Option<usize>) -> isize {
    pos.map_or(EMPTY, |pos| pos as isize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A bounded, steerable position over an ordered collection.
///
/// Every movement funnels through [`Cursor::move_to`]. Navigation helpers
/// compute a requested position from the current one and hand it over; the
/// implementation decides where the cursor actually lands.
pub trait Cursor {
    type Item;

    fn len(&self) -> usize;

    /// Current position, or `None` when the cursor is empty.
    fn index(&self) -> Option<usize>;

    /// Item at `index`, or `None` when `index` is not bounded.
    fn peek_item(&self, index: isize) -> Option<&Self::Item>;

    /// Request a move to `requested`. The committed position is always
    /// bounded.
    fn move_to(&mut self, requested: isize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// Whether `index` addresses an item. Nothing is bounded on an empty
    /// cursor, not even the `-1` its bounds compare as.
    fn is_index_bounded(&self, index: isize) -> bool {
        !self.is_empty()
            && index >= signed(self.first_index())
            && index <= signed(self.last_index())
    }

    fn next_index_of(&self, index: isize) -> isize {
        index.saturating_add(1)
    }

    fn previous_index_of(&self, index: isize) -> isize {
        index.saturating_sub(1)
    }

    fn peek_next_index(&self) -> isize {
        self.next_index_of(signed(self.index()))
    }

    fn peek_previous_index(&self) -> isize {
        self.previous_index_of(signed(self.index()))
    }

    fn current(&self) -> Option<&Self::Item> {
        self.peek_item(signed(self.index()))
    }

    /// Move to `index` and return the item the cursor lands on.
    fn seek(&mut self, index: isize) -> Option<&Self::Item> {
        self.move_to(index);
        self.current()
    }

    fn first(&mut self) -> Option<&Self::Item> {
        self.seek(signed(self.first_index()))
    }

    fn last(&mut self) -> Option<&Self::Item> {
        self.seek(signed(self.last_index()))
    }

    fn next(&mut self) -> Option<&Self::Item> {
        self.seek(self.peek_next_index())
    }

    fn previous(&mut self) -> Option<&Self::Item> {
        self.seek(self.peek_previous_index())
    }

    fn has_next(&self) -> bool {
        !self.is_empty() && self.peek_next_index() <= signed(self.last_index())
    }

    fn has_previous(&self) -> bool {
        !self.is_empty() && self.peek_previous_index() >= signed(self.first_index())
    }

    fn peek_next(&self) -> Option<&Self::Item> {
        self.peek_item(self.peek_next_index())
    }

    fn peek_previous(&self) -> Option<&Self::Item> {
        self.peek_item(self.peek_previous_index())
    }

    fn peek_first(&self) -> Option<&Self::Item> {
        self.peek_item(signed(self.first_index()))
    }

    fn peek_last(&self) -> Option<&Self::Item> {
        self.peek_item(signed(self.last_index()))
    }

    fn is_first(&self) -> bool {
        self.index() == self.first_index()
    }

    fn is_after_first(&self) -> bool {
        signed(self.index()) > signed(self.first_index())
    }

    fn is_before_first(&self) -> bool {
        signed(self.index()) < signed(self.first_index())
    }

    fn is_last(&self) -> bool {
        self.index() == self.last_index()
    }

    fn is_after_last(&self) -> bool {
        signed(self.index()) > signed(self.last_index())
    }

    fn is_before_last(&self) -> bool {
        signed(self.index()) < signed(self.last_index())
    }

    /// Direction a move to `requested` would travel from the current index.
    fn direction_of(&self, requested: isize) -> Direction {
        if requested < signed(self.index()) {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Walk away from the current index in `direction` and return the first
    /// bounded position whose item satisfies `predicate`.
    ///
    /// The current index itself is never tested. Does not move the cursor.
    fn scan_index<P>(&self, mut predicate: P, direction: Direction) -> Option<usize>
    where
        P: FnMut(usize, &Self::Item) -> bool,
    {
        let mut index = signed(self.index()) + direction.step();
        while let Some(item) = self.peek_item(index) {
            // peek_item only yields for bounded, hence non-negative, indices.
            let pos = index as usize;
            if predicate(pos, item) {
                return Some(pos);
            }
            index += direction.step();
        }
        None
    }

    fn scan_next_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(usize, &Self::Item) -> bool,
    {
        self.scan_index(predicate, Direction::Forward)
    }

    fn scan_previous_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(usize, &Self::Item) -> bool,
    {
        self.scan_index(predicate, Direction::Backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Bare cursor without interception: moves clamp and nothing else.
    struct SliceCursor<'a, T> {
        slice: &'a [T],
        index: Option<usize>,
    }

    impl<'a, T> SliceCursor<'a, T> {
        fn at_start(slice: &'a [T]) -> Self {
            SliceCursor {
                slice,
                index: if slice.is_empty() { None } else { Some(0) },
            }
        }
    }

    impl<T> Cursor for SliceCursor<'_, T> {
        type Item = T;

        fn len(&self) -> usize {
            self.slice.len()
        }

        fn index(&self) -> Option<usize> {
            self.index
        }

        fn peek_item(&self, index: isize) -> Option<&T> {
            usize::try_from(index).ok().and_then(|pos| self.slice.get(pos))
        }

        fn move_to(&mut self, requested: isize) {
            self.index = self
                .last_index()
                .map(|last| usize::try_from(requested).map_or(0, |pos| pos.min(last)));
        }
    }

    #[test]
    fn simple_navigation() {
        let slice = &[1, 2, 3];
        let mut cursor = SliceCursor::at_start(slice);
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.peek_next(), Some(&2));
        assert_eq!(cursor.peek_previous(), None);
        assert_eq!(cursor.next(), Some(&2));
        assert_eq!(cursor.next(), Some(&3));
        assert_eq!(cursor.next(), Some(&3));
        assert!(cursor.is_last());
        assert_eq!(cursor.previous(), Some(&2));
        assert_eq!(cursor.first(), Some(&1));
        assert_eq!(cursor.previous(), Some(&1));
        assert!(cursor.is_first());
    }

    #[test]
    fn bounds_and_arithmetic() {
        let cursor = SliceCursor::at_start(&[1, 2, 3]);
        assert_eq!(cursor.first_index(), Some(0));
        assert_eq!(cursor.last_index(), Some(2));
        assert!(cursor.is_index_bounded(0));
        assert!(cursor.is_index_bounded(2));
        assert!(!cursor.is_index_bounded(-1));
        assert!(!cursor.is_index_bounded(3));
        assert_eq!(cursor.next_index_of(-5), -4);
        assert_eq!(cursor.previous_index_of(0), -1);
        assert_eq!(cursor.next_index_of(isize::MAX), isize::MAX);
        assert_eq!(cursor.previous_index_of(isize::MIN), isize::MIN);
    }

    #[test]
    fn empty_slice() {
        let slice: &[i32] = &[];
        let mut cursor = SliceCursor::at_start(slice);
        assert_eq!(cursor.first_index(), None);
        assert_eq!(cursor.last_index(), None);
        assert!(!cursor.is_index_bounded(-1));
        assert_eq!(cursor.peek_next_index(), 0);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.last(), None);
        assert!(!cursor.is_before_first());
        assert!(!cursor.is_after_last());
    }

    #[test]
    fn scanning_both_ways() {
        let slice = &[0, 5, 1, 5, 2];
        let mut cursor = SliceCursor::at_start(slice);
        assert_eq!(cursor.scan_next_index(|_, &item| item == 5), Some(1));
        cursor.move_to(3);
        assert_eq!(cursor.scan_previous_index(|_, &item| item == 5), Some(1));
        assert_eq!(cursor.scan_next_index(|_, &item| item == 5), None);
        assert_eq!(
            cursor.scan_index(|index, _| index == 0, Direction::Backward),
            Some(0)
        );
        assert_eq!(cursor.direction_of(1), Direction::Backward);
        assert_eq!(cursor.direction_of(3), Direction::Forward);
    }
}
