//! Allocation table
//!
//! The shared mutable matrix the pipeline stages operate on, together with
//! the per-row and per-column targets, the sparse ceiling map and an
//! optional trace of rendered snapshots. The table owns the two
//! invariant-preserving mutation primitives: a same-row column transfer
//! (keeps row sums fixed) and a four-corner rectangle exchange (keeps both
//! row and column sums fixed).

use crate::{
    ceilings::{CeilingMap, Cell},
    render,
};

/// The allocation matrix plus its row/column targets and constraints.
#[derive(Debug, Clone)]
pub struct AllocationTable {
    discount_totals: Vec<i64>,
    item_totals: Vec<i64>,
    ceilings: CeilingMap,
    matrix: Vec<Vec<i64>>,
    trace: Vec<String>,
    capture_trace: bool,
}

impl AllocationTable {
    /// Builds a zeroed table. Callers have already validated that the
    /// discount and item totals sum to the same amount.
    pub(crate) fn new(
        discount_totals: Vec<i64>,
        item_totals: Vec<i64>,
        ceilings: CeilingMap,
        capture_trace: bool,
    ) -> Self {
        let matrix = vec![vec![0; discount_totals.len()]; item_totals.len()];

        Self {
            discount_totals,
            item_totals,
            ceilings,
            matrix,
            trace: Vec::new(),
            capture_trace,
        }
    }

    /// Budget per discount column.
    #[must_use]
    pub fn discount_totals(&self) -> &[i64] {
        &self.discount_totals
    }

    /// Target per item row.
    #[must_use]
    pub fn item_totals(&self) -> &[i64] {
        &self.item_totals
    }

    /// The configured per-cell ceilings.
    #[must_use]
    pub fn ceilings(&self) -> &CeilingMap {
        &self.ceilings
    }

    /// The allocation matrix: one row per item, one column per discount.
    #[must_use]
    pub fn matrix(&self) -> &[Vec<i64>] {
        &self.matrix
    }

    /// Number of item rows.
    #[must_use]
    pub fn items(&self) -> usize {
        self.item_totals.len()
    }

    /// Number of discount columns.
    #[must_use]
    pub fn discounts(&self) -> usize {
        self.discount_totals.len()
    }

    /// The amount allocated to one cell.
    #[must_use]
    pub fn cell(&self, item: usize, discount: usize) -> i64 {
        self.matrix[item][discount]
    }

    /// Sum of one item row.
    #[must_use]
    pub fn row_sum(&self, item: usize) -> i64 {
        self.matrix[item].iter().sum()
    }

    /// Sum of one discount column.
    #[must_use]
    pub fn column_sum(&self, discount: usize) -> i64 {
        self.matrix.iter().map(|row| row[discount]).sum()
    }

    /// Rendered snapshots captured during balancing, oldest first.
    ///
    /// Empty unless trace capture was requested.
    #[must_use]
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// True when every row sums to its item total and every column to its
    /// discount budget.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        (0..self.items()).all(|item| self.row_sum(item) == self.item_totals[item])
            && (0..self.discounts())
                .all(|discount| self.column_sum(discount) == self.discount_totals[discount])
    }

    /// True when every cell is non-negative and within its ceiling.
    #[must_use]
    pub fn respects_ceilings(&self) -> bool {
        for (item, row) in self.matrix.iter().enumerate() {
            for (discount, &value) in row.iter().enumerate() {
                if value < 0 {
                    return false;
                }
                if let Some(ceiling) = self.ceilings.get(item, discount) {
                    if value > ceiling.limit() {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Replaces one item row; the row must already sum to the item total.
    pub(crate) fn set_row(&mut self, item: usize, row: Vec<i64>) {
        self.matrix[item] = row;
    }

    /// Moves `amount` within one row from one discount column to another,
    /// preserving the row sum.
    pub(crate) fn transfer(&mut self, item: usize, from: usize, to: usize, amount: i64) {
        self.matrix[item][from] -= amount;
        self.matrix[item][to] += amount;
    }

    /// Runs a four-corner exchange: `cell` and `opposite` both lose
    /// `amount`, the two remaining corners gain it, so every row and column
    /// sum is preserved.
    pub(crate) fn exchange(&mut self, cell: Cell, opposite: Cell, amount: i64) {
        self.matrix[cell.item][cell.discount] -= amount;
        self.matrix[opposite.item][opposite.discount] -= amount;
        self.matrix[cell.item][opposite.discount] += amount;
        self.matrix[opposite.item][cell.discount] += amount;
    }

    /// Appends a labelled rendered snapshot when tracing is enabled.
    pub(crate) fn record(&mut self, label: &str) {
        if self.capture_trace {
            let snapshot = format!("{label}\n{}", render::render(self));
            self.trace.push(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AllocationTable {
        let mut table = AllocationTable::new(
            vec![10, 40],
            vec![20, 30],
            CeilingMap::new(),
            false,
        );
        table.set_row(0, vec![5, 15]);
        table.set_row(1, vec![5, 25]);
        table
    }

    #[test]
    fn sums_cover_rows_and_columns() {
        let table = table();

        assert_eq!(table.row_sum(0), 20);
        assert_eq!(table.row_sum(1), 30);
        assert_eq!(table.column_sum(0), 10);
        assert_eq!(table.column_sum(1), 40);
        assert!(table.is_balanced());
    }

    #[test]
    fn transfer_preserves_the_row_sum() {
        let mut table = table();

        table.transfer(0, 1, 0, 3);

        assert_eq!(table.cell(0, 0), 8);
        assert_eq!(table.cell(0, 1), 12);
        assert_eq!(table.row_sum(0), 20);
    }

    #[test]
    fn exchange_preserves_all_sums() {
        let mut table = table();

        table.exchange(Cell::new(0, 0), Cell::new(1, 1), 2);

        assert_eq!(table.cell(0, 0), 3);
        assert_eq!(table.cell(1, 1), 23);
        assert_eq!(table.cell(0, 1), 17);
        assert_eq!(table.cell(1, 0), 7);
        assert!(table.is_balanced());
    }

    #[test]
    fn ceilings_are_checked_per_cell() {
        let mut ceilings = CeilingMap::new();
        ceilings.cap(0, 0, 4);

        let mut table = AllocationTable::new(vec![10, 40], vec![20, 30], ceilings, false);
        table.set_row(0, vec![5, 15]);
        table.set_row(1, vec![5, 25]);

        assert!(!table.respects_ceilings());

        table.transfer(0, 0, 1, 1);

        assert!(table.respects_ceilings());
    }

    #[test]
    fn snapshots_are_only_captured_when_enabled() {
        let mut silent = table();
        silent.record("initial distribution");

        assert!(silent.trace().is_empty());

        let mut traced =
            AllocationTable::new(vec![10, 40], vec![20, 30], CeilingMap::new(), true);
        traced.record("initial distribution");

        assert_eq!(traced.trace().len(), 1);
        assert!(traced.trace()[0].starts_with("initial distribution"));
    }
}
