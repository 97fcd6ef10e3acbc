use std::fmt;

/// Hard cap on configurable lanes; `Chord` is a bitmask over lane indices.
pub const MAX_LANES: usize = 8;

/// One of the fixed note identities. With the default five-lane layout the
/// indices map to green/red/yellow/blue/orange.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lane(pub u8);

impl Lane {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A set of lanes to be struck simultaneously. Backed by a bitmask so
/// membership, removal and cardinality are O(1). The empty chord is valid
/// and represents a rest.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Chord(u8);

impl Chord {
    pub const EMPTY: Self = Self(0);

    #[inline(always)]
    pub fn insert(&mut self, lane: Lane) {
        self.0 |= 1 << lane.0;
    }

    #[inline(always)]
    pub fn remove(&mut self, lane: Lane) {
        self.0 &= !(1 << lane.0);
    }

    #[inline(always)]
    pub const fn contains(self, lane: Lane) -> bool {
        self.0 & (1 << lane.0) != 0
    }

    #[inline(always)]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[inline(always)]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn lanes(self) -> impl Iterator<Item = Lane> {
        (0..MAX_LANES as u8).map(Lane).filter(move |l| self.contains(*l))
    }
}

impl FromIterator<Lane> for Chord {
    fn from_iter<I: IntoIterator<Item = Lane>>(iter: I) -> Self {
        let mut chord = Self::EMPTY;
        for lane in iter {
            chord.insert(lane);
        }
        chord
    }
}

impl fmt::Debug for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Chord{")?;
        let mut first = true;
        for lane in self.lanes() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", lane.0)?;
            first = false;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::{Chord, Lane};

    #[test]
    fn insert_remove_and_membership() {
        let mut chord = Chord::EMPTY;
        assert!(chord.is_empty());

        chord.insert(Lane(0));
        chord.insert(Lane(4));
        assert_eq!(chord.len(), 2);
        assert!(chord.contains(Lane(0)));
        assert!(chord.contains(Lane(4)));
        assert!(!chord.contains(Lane(2)));

        // Re-inserting a held lane is a no-op: no duplicates possible.
        chord.insert(Lane(0));
        assert_eq!(chord.len(), 2);

        chord.remove(Lane(0));
        assert!(!chord.contains(Lane(0)));
        chord.remove(Lane(0));
        assert_eq!(chord.len(), 1);
    }

    #[test]
    fn set_arithmetic() {
        let a: Chord = [Lane(0), Lane(1), Lane(2)].into_iter().collect();
        let b: Chord = [Lane(1), Lane(2), Lane(3)].into_iter().collect();

        let both = a.intersection(b);
        assert_eq!(both.len(), 2);
        assert!(both.contains(Lane(1)) && both.contains(Lane(2)));

        let only_a = a.difference(b);
        assert_eq!(only_a.len(), 1);
        assert!(only_a.contains(Lane(0)));

        assert!(a.intersection(Chord::EMPTY).is_empty());
        assert_eq!(a.difference(Chord::EMPTY), a);
    }

    #[test]
    fn lanes_iterates_in_index_order() {
        let chord: Chord = [Lane(3), Lane(0), Lane(4)].into_iter().collect();
        let indices: Vec<u8> = chord.lanes().map(|l| l.0).collect();
        assert_eq!(indices, vec![0, 3, 4]);
    }
}
