//! Ceilings
//!
//! Sparse per-(item, discount) caps on allocated amounts. A cell has one of
//! three states: absent from the map (unconstrained), [`Ceiling::Capped`]
//! with a positive limit, or [`Ceiling::Excluded`] (the item must never
//! carry any of that discount).

use rustc_hash::FxHashMap;

/// An (item row, discount column) index into an allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Item row index.
    pub item: usize,

    /// Discount column index.
    pub discount: usize,
}

impl Cell {
    /// Creates a cell index.
    #[must_use]
    pub const fn new(item: usize, discount: usize) -> Self {
        Self { item, discount }
    }
}

/// The constraint configured for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ceiling {
    /// The item must never receive any of this discount.
    Excluded,

    /// The cell may carry at most this amount.
    Capped(i64),
}

impl Ceiling {
    /// Builds a ceiling from a raw cap value, mapping 0 to [`Ceiling::Excluded`].
    ///
    /// Negative values are kept as `Capped` so that validation can report
    /// them instead of silently fixing them up.
    #[must_use]
    pub const fn from_cap(value: i64) -> Self {
        if value == 0 {
            Self::Excluded
        } else {
            Self::Capped(value)
        }
    }

    /// The maximum amount the cell may carry; 0 for excluded cells.
    #[must_use]
    pub const fn limit(self) -> i64 {
        match self {
            Self::Excluded => 0,
            Self::Capped(limit) => limit,
        }
    }
}

/// Sparse map of per-cell ceilings.
#[derive(Debug, Clone, Default)]
pub struct CeilingMap {
    cells: FxHashMap<Cell, Ceiling>,
}

impl CeilingMap {
    /// Creates an empty map: every cell unconstrained.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ceiling for one cell.
    pub fn set(&mut self, item: usize, discount: usize, ceiling: Ceiling) {
        self.cells.insert(Cell::new(item, discount), ceiling);
    }

    /// Excludes one cell: the item never carries the discount.
    pub fn exclude(&mut self, item: usize, discount: usize) {
        self.set(item, discount, Ceiling::Excluded);
    }

    /// Caps one cell at `limit` minor units; a limit of 0 excludes the cell.
    pub fn cap(&mut self, item: usize, discount: usize, limit: i64) {
        self.set(item, discount, Ceiling::from_cap(limit));
    }

    /// The ceiling configured for a cell, if any.
    #[must_use]
    pub fn get(&self, item: usize, discount: usize) -> Option<Ceiling> {
        self.cells.get(&Cell::new(item, discount)).copied()
    }

    /// Whether the cell is hard-excluded.
    #[must_use]
    pub fn is_excluded(&self, item: usize, discount: usize) -> bool {
        matches!(self.get(item, discount), Some(Ceiling::Excluded))
    }

    /// Room left below the cell's ceiling given its current value.
    ///
    /// `None` means the cell is unconstrained.
    #[must_use]
    pub fn headroom(&self, item: usize, discount: usize, current: i64) -> Option<i64> {
        self.get(item, discount)
            .map(|ceiling| ceiling.limit() - current)
    }

    /// True when no cell has any constraint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of constrained cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Iterates over all constrained cells in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Ceiling)> + '_ {
        self.cells.iter().map(|(&cell, &ceiling)| (cell, ceiling))
    }

    /// Drops entries whose indices fall outside an `items x discounts` table.
    pub(crate) fn prune(&mut self, items: usize, discounts: usize) {
        self.cells
            .retain(|cell, _| cell.item < items && cell.discount < discounts);
    }
}

impl FromIterator<(Cell, Ceiling)> for CeilingMap {
    fn from_iter<I: IntoIterator<Item = (Cell, Ceiling)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cap_means_excluded() {
        assert_eq!(Ceiling::from_cap(0), Ceiling::Excluded);
        assert_eq!(Ceiling::from_cap(12), Ceiling::Capped(12));
    }

    #[test]
    fn excluded_cells_have_zero_limit() {
        assert_eq!(Ceiling::Excluded.limit(), 0);
        assert_eq!(Ceiling::Capped(40).limit(), 40);
    }

    #[test]
    fn absent_cells_are_unconstrained() {
        let map = CeilingMap::new();

        assert!(map.get(0, 0).is_none());
        assert!(!map.is_excluded(0, 0));
        assert!(map.headroom(0, 0, 100).is_none());
    }

    #[test]
    fn headroom_subtracts_current_value() {
        let mut map = CeilingMap::new();
        map.cap(1, 2, 10);
        map.exclude(0, 0);

        assert_eq!(map.headroom(1, 2, 4), Some(6));
        assert_eq!(map.headroom(0, 0, 0), Some(0));
    }

    #[test]
    fn prune_drops_out_of_range_cells() {
        let mut map = CeilingMap::new();
        map.cap(0, 0, 5);
        map.cap(2, 1, 5);
        map.cap(1, 7, 5);

        map.prune(2, 2);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(0, 0), Some(Ceiling::Capped(5)));
    }
}
