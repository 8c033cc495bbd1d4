use std::marker::PhantomData;

/// Typed indices `start, start + step, ...` strictly below `end`.
pub struct StridedIdx<Idx> {
    next: usize,
    end: usize,
    step: usize,
    _marker: PhantomData<Idx>,
}

impl<Idx> StridedIdx<Idx> {
    pub fn new(start: usize, step: usize, end: usize) -> Self {
        debug_assert!(step > 0);
        StridedIdx {
            next: start,
            end,
            step,
            _marker: PhantomData,
        }
    }
}

impl<Idx: From<usize>> Iterator for StridedIdx<Idx> {
    type Item = Idx;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let current = self.next;
        self.next = self.next.saturating_add(self.step);
        Some(Idx::from(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.end {
            0
        } else {
            (self.end - self.next).div_ceil(self.step)
        };
        (remaining, Some(remaining))
    }
}
