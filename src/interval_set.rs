use std::fmt;
use std::ops::Index;
use std::slice::Iter;

use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::{Error, Result};

/// Ordered collection of id intervals. Intervals may repeat or overlap until
/// `simplify` is called, which rewrites the set into its canonical form:
/// sorted, disjoint, and with a gap of at least one id between neighbours.
#[must_use]
#[derive(Debug, Default, Eq, PartialEq, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSet {
    data: Vec<Interval>,
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, r) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{r}")?;
        }
        write!(f, "}}")
    }
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` ids starting at `first`. Nothing is merged; the set is
    /// left untouched if the interval is invalid.
    pub fn append(&mut self, first: i64, count: i64) -> Result<()> {
        self.push(Interval::new(first, count)?);
        Ok(())
    }

    pub fn push(&mut self, r: Interval) {
        self.data.push(r);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of stored intervals, not the number of ids they cover.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Interval] {
        &self.data
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.data.iter().any(|r| r.contains(id))
    }

    /// Looks up an interval by position. Negative indices count back from the
    /// end, so `-1` is the last interval.
    pub fn get(&self, index: isize) -> Result<&Interval> {
        let len = self.data.len();
        let idx = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            usize::try_from(index).ok()
        };
        idx.and_then(|i| self.data.get(i)).ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn iter(&self) -> Iter<'_, Interval> {
        self.data.iter()
    }

    /// Number of distinct ids covered by the set.
    #[must_use]
    pub fn id_count(&self) -> i64 {
        let mut s = self.clone();
        s.simplify();
        s.iter().map(Interval::count).sum()
    }

    /// Removes the ids `first..first + count` from every interval in the set.
    /// An interval split by the removal is replaced by its left remainder
    /// followed by its right remainder, at the same position. Nothing
    /// happens if `first` is negative or `count` is not positive.
    pub fn remove(&mut self, first: i64, count: i64) {
        if first < 0 || count < 1 {
            return;
        }
        let last = first.saturating_add(count - 1);

        let mut data = Vec::with_capacity(self.data.len() + 1);
        for r in &self.data {
            if !r.overlaps(first, last) {
                data.push(*r);
                continue;
            }
            if r.first() < first {
                data.push(Interval::new_unchecked(r.first(), first - r.first()));
            }
            if last < r.last() {
                data.push(Interval::new_unchecked(last + 1, r.last() - last));
            }
        }
        self.data = data;
    }

    /// Sorts the intervals and merges every overlapping or abutting pair.
    /// An empty set is already simplified.
    pub fn simplify(&mut self) {
        self.data.sort();
        let Some(head) = self.data.first() else {
            return;
        };

        let mut data = Vec::new();
        let mut new_first = head.first();
        let mut new_count = head.count();
        for r in &self.data[1..] {
            if r.first() == new_first {
                // Sorted by ascending count, so this one is at least as long.
                new_count = r.count();
            } else if r.first() <= new_first + new_count {
                if r.last() > new_first + new_count - 1 {
                    new_count = r.last() - new_first + 1;
                }
            } else {
                data.push(Interval::new_unchecked(new_first, new_count));
                new_first = r.first();
                new_count = r.count();
            }
        }
        data.push(Interval::new_unchecked(new_first, new_count));

        self.data = data;
    }
}

impl Index<usize> for IntervalSet {
    type Output = Interval;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for IntervalSet {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self { data: iter.into_iter().collect() }
    }
}

impl Extend<Interval> for IntervalSet {
    fn extend<I: IntoIterator<Item = Interval>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn spans(s: &IntervalSet) -> Vec<(i64, i64)> {
        s.iter().map(|r| (r.first(), r.last())).collect()
    }

    #[test]
    fn array_syntax() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;

        assert_eq!(s.len(), 1);
        assert_eq!(*s.get(0)?, Interval::new(10, 5)?);
        assert_eq!(s[0], Interval::new(10, 5)?);
        assert_eq!(*s.get(-1)?, Interval::new(10, 5)?);
        assert!(s.get(1).unwrap_err().is_index_out_of_range());
        assert!(s.get(-2).unwrap_err().is_index_out_of_range());
        assert!(IntervalSet::new().get(0).unwrap_err().is_index_out_of_range());
        Ok(())
    }

    #[test]
    fn negative_indices() -> Result<()> {
        let s: IntervalSet =
            [Interval::new(1, 1)?, Interval::new(5, 2)?, Interval::new(9, 3)?].into_iter().collect();
        assert_eq!(s.get(-1)?.first(), 9);
        assert_eq!(s.get(-2)?.first(), 5);
        assert_eq!(s.get(-3)?.first(), 1);
        assert!(s.get(-4).is_err());
        assert!(s.get(3).is_err());
        assert!(s.get(isize::MIN).is_err());
        Ok(())
    }

    #[test]
    fn ids_in_set() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;
        for id in 10..15 {
            assert!(s.contains(id));
        }
        for id in 15..20 {
            assert!(!s.contains(id));
        }
        Ok(())
    }

    #[test]
    fn iterator() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;

        let mut it = s.iter();
        assert_eq!(it.next(), Some(&Interval::new(10, 5)?));
        assert_eq!(it.next(), None);

        // Restartable, and reflects mutation made between iterations.
        s.append(20, 1)?;
        assert_eq!(s.iter().count(), 2);
        assert_eq!((&s).into_iter().count(), 2);
        Ok(())
    }

    #[test]
    fn append_boundaries() {
        let mut s = IntervalSet::new();
        assert!(s.append(0, 1).is_ok());
        assert!(s.append(-1, 1).unwrap_err().is_invalid_argument());
        assert!(s.append(0, 0).unwrap_err().is_invalid_argument());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn modify_set() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;
        s.clear();
        assert_eq!(s.len(), 0);

        s.append(10, 5)?;
        s.append(10, 5)?;
        s.remove(12, 1);
        assert_eq!(s.len(), 4);
        assert!(!s.contains(12));
        assert_eq!(spans(&s), vec![(10, 11), (13, 14), (10, 11), (13, 14)]);
        Ok(())
    }

    #[test]
    fn remove_edges() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;
        s.append(30, 5)?;
        s.append(0, 2)?;

        // Ignored.
        s.remove(-1, 5);
        s.remove(10, 0);
        assert_eq!(spans(&s), vec![(10, 14), (30, 34), (0, 1)]);

        // Left and right trims, and a non-overlapping interval kept in place.
        s.remove(8, 4);
        assert_eq!(spans(&s), vec![(12, 14), (30, 34), (0, 1)]);
        s.remove(33, 10);
        assert_eq!(spans(&s), vec![(12, 14), (30, 32), (0, 1)]);

        // Fully consumed.
        s.remove(0, 2);
        assert_eq!(spans(&s), vec![(12, 14), (30, 32)]);

        // Spans several intervals at once.
        s.remove(13, 18);
        assert_eq!(spans(&s), vec![(12, 12), (31, 32)]);

        s.remove(0, i64::MAX);
        assert!(s.is_empty());
        Ok(())
    }

    #[test]
    fn simplify() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;
        s.append(10, 10)?;
        s.append(12, 1)?;
        s.append(20, 5)?;
        s.append(22, 8)?;
        s.append(40, 5)?;

        s.simplify();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].first(), 10);
        assert_eq!(s[0].last(), 29);
        assert_eq!(s[1].first(), 40);
        assert_eq!(s[1].last(), 44);
        Ok(())
    }

    #[test]
    fn simplify_empty() {
        let mut s = IntervalSet::new();
        s.simplify();
        assert!(s.is_empty());
    }

    #[test]
    fn simplify_abutting_and_unsorted() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(5, 5)?;
        s.append(0, 5)?;
        s.append(11, 1)?;
        s.append(12, 3)?;
        s.simplify();
        assert_eq!(spans(&s), vec![(0, 9), (11, 14)]);
        Ok(())
    }

    #[test]
    fn simplify_at_id_space_end() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(i64::MAX - 1, 1)?;
        s.append(0, i64::MAX - 1)?;
        s.simplify();
        assert_eq!(spans(&s), vec![(0, i64::MAX - 1)]);
        assert_eq!(s.id_count(), i64::MAX);
        Ok(())
    }

    #[test]
    fn id_count() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;
        s.append(10, 5)?;
        s.append(12, 10)?;
        assert_eq!(s.id_count(), 12);
        // Does not canonicalize the set itself.
        assert_eq!(s.len(), 3);
        assert_eq!(IntervalSet::new().id_count(), 0);
        Ok(())
    }

    #[test]
    fn display_and_serde() -> Result<()> {
        let mut s = IntervalSet::new();
        s.append(10, 5)?;
        s.append(1, 1)?;
        assert_eq!(s.to_string(), "{[10,14], [1,1]}");

        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"first":10,"count":5},{"first":1,"count":1}]"#);
        assert_eq!(serde_json::from_str::<IntervalSet>(&json).unwrap(), s);
        Ok(())
    }

    fn arb_set() -> impl Strategy<Value = IntervalSet> {
        prop::collection::vec((0i64..200, 1i64..40), 0..12).prop_map(|v| {
            v.into_iter()
                .map(|(first, count)| Interval::new_unchecked(first, count))
                .collect::<IntervalSet>()
        })
    }

    proptest! {
        #[test]
        fn interval_membership(first in 0i64..1000, count in 1i64..100, x in -10i64..1200) {
            let r = Interval::new(first, count).unwrap();
            prop_assert_eq!(r.contains(x), first <= x && x < first + count);
        }

        #[test]
        fn remove_matches_membership(s in arb_set(), first in 0i64..250, count in 1i64..60) {
            let mut removed = s.clone();
            removed.remove(first, count);
            for x in -1..260 {
                let gone = first <= x && x < first + count;
                prop_assert_eq!(removed.contains(x), s.contains(x) && !gone);
            }
        }

        #[test]
        fn simplify_is_canonical(s in arb_set()) {
            let mut simple = s.clone();
            simple.simplify();

            for x in -1..260 {
                prop_assert_eq!(simple.contains(x), s.contains(x));
            }
            for w in simple.as_slice().windows(2) {
                prop_assert!(w[0].last() + 1 < w[1].first());
            }

            let mut again = simple.clone();
            again.simplify();
            prop_assert_eq!(again, simple);
        }
    }
}
