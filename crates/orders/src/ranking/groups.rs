/// An iterator over groups of a ranking, best group first.
///
/// See [`Ranking::iter_groups`](super::Ranking::iter_groups) for more
/// information.
pub struct GroupIterator<'a, A> {
    pub(super) order: &'a [A],
    pub(super) tied: &'a [bool],
}

impl<'a, A> Iterator for GroupIterator<'a, A> {
    type Item = &'a [A];
    fn next(&mut self) -> Option<Self::Item> {
        if self.order.is_empty() {
            return None;
        }
        let values = 1 + self.tied.iter().take_while(|t| **t).count();
        let (group, rest) = self.order.split_at(values);
        // `tied[values - 1]` separates this group from the next one.
        self.tied = if rest.is_empty() { &[] } else { &self.tied[values..] };
        self.order = rest;
        debug_assert!(!group.is_empty());
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.order.is_empty() {
            // We're done
            (0, Some(0))
        } else {
            // We could have one group if all alternatives are tied, or one group
            // for each alternative
            (1, Some(self.order.len()))
        }
    }
}
