//! Column balancing
//!
//! After the initial per-row dispatch every row sums to its item total, but
//! columns generally miss their discount budgets. This stage moves value
//! between two columns of a single row at a time, preserving the row sum,
//! until every column hits its budget or no complementary pair is left.

use rustc_hash::FxHashSet;

use crate::{error::AllocationError, table::AllocationTable};

/// Repairs column sums via complementary-column transfers.
///
/// Each round picks the non-omitted column furthest under its budget and
/// the column furthest over, then moves value between them within the row
/// holding the largest adjustable amount in the over column. A transfer
/// shrinks the total absolute imbalance by twice its amount, and a column
/// that can never find a donor row is omitted for good, so the loop
/// terminates.
pub(crate) fn balance(table: &mut AllocationTable) -> Result<(), AllocationError> {
    let columns = table.discounts();

    let mut diff: Vec<i64> = (0..columns)
        .map(|discount| table.discount_totals()[discount] - table.column_sum(discount))
        .collect();

    let mut omitted: FxHashSet<usize> = FxHashSet::default();

    loop {
        // `under` is the non-omitted column furthest below its budget,
        // `over` the column furthest above it. Row sums are preserved by
        // every move, so the diffs always sum to zero.
        let mut under: Option<usize> = None;
        let mut over: Option<usize> = None;
        for (column, &d) in diff.iter().enumerate() {
            if d > 0 && !omitted.contains(&column) {
                if under.is_none_or(|u| diff[u] < d) {
                    under = Some(column);
                }
            } else if d < 0 && over.is_none_or(|o| diff[o] > d) {
                over = Some(column);
            }
        }

        let (under, over) = match (under, over) {
            (None, None) => return Ok(()),
            (Some(_), None) | (None, Some(_)) => {
                return Err(AllocationError::NoComplementaryColumns);
            }
            (Some(under), Some(over)) => (under, over),
        };

        // Donor row: largest value in the over column among rows that are
        // not excluded from either column of the pair.
        let mut donor: Option<usize> = None;
        let mut donor_value: i64 = 0;
        for item in 0..table.items() {
            if table.ceilings().is_excluded(item, under) || table.ceilings().is_excluded(item, over)
            {
                continue;
            }
            let value = table.cell(item, over);
            if value > donor_value {
                donor_value = value;
                donor = Some(item);
            }
        }

        let Some(donor) = donor else {
            // No row may carry this column pair, so the under column can
            // never be repaired through an exchange.
            omitted.insert(under);
            if omitted.len() >= columns.saturating_sub(1) && diff.iter().any(|&d| d != 0) {
                return Err(AllocationError::ColumnsExhausted);
            }
            continue;
        };

        let amount = diff[under].min(-diff[over]).min(donor_value);

        table.transfer(donor, over, under, amount);
        diff[over] += amount;
        diff[under] -= amount;
        table.record(&format!(
            "moved {amount} on SKU-{donor} from PRO-{over} to PRO-{under}"
        ));
    }
}
