//! Request validation
//!
//! Feasibility checks that run before any allocation work: shape and sign
//! checks, exact sum consistency, and static ceiling coverage. Partial
//! ceiling coverage is deliberately not checked here; infeasibility in that
//! case surfaces later as a balancing failure.

use crate::{
    ceilings::{Ceiling, CeilingMap},
    error::AllocationError,
};

/// Validates totals and ceilings, pruning out-of-range ceiling cells.
pub(crate) fn check(
    discount_totals: &[i64],
    item_totals: &[i64],
    ceilings: &mut CeilingMap,
) -> Result<(), AllocationError> {
    if discount_totals.is_empty() || item_totals.is_empty() {
        return Err(AllocationError::EmptyInputs);
    }

    let mut discrepancy: i64 = 0;
    for (discount, &total) in discount_totals.iter().enumerate() {
        if total < 0 {
            return Err(AllocationError::NegativeDiscountTotal { discount, total });
        }
        discrepancy += total;
    }
    for (item, &total) in item_totals.iter().enumerate() {
        if total <= 0 {
            return Err(AllocationError::NonPositiveItemTotal { item, total });
        }
        discrepancy -= total;
    }
    if discrepancy != 0 {
        return Err(AllocationError::TotalsMismatch { discrepancy });
    }

    for (cell, ceiling) in ceilings.iter() {
        if let Ceiling::Capped(limit) = ceiling {
            if limit < 0 {
                return Err(AllocationError::NegativeCeiling {
                    item: cell.item,
                    discount: cell.discount,
                    limit,
                });
            }
        }
    }

    // Ceilings pointing outside the table are dropped, not rejected.
    ceilings.prune(item_totals.len(), discount_totals.len());

    // An item capped on every discount must still be able to reach its
    // total even when every allowed discount is maxed out.
    for (item, &total) in item_totals.iter().enumerate() {
        if let Some(ceiling_sum) = full_coverage_sum(ceilings, item_totals.len(), discount_totals.len(), Axis::Item(item))
        {
            if ceiling_sum < total {
                return Err(AllocationError::ItemCeilingsInsufficient {
                    item,
                    ceiling_sum,
                    total,
                });
            }
        }
    }

    // Symmetrically, a discount capped on every item must fit its budget.
    for (discount, &total) in discount_totals.iter().enumerate() {
        if let Some(ceiling_sum) = full_coverage_sum(ceilings, item_totals.len(), discount_totals.len(), Axis::Discount(discount))
        {
            if ceiling_sum < total {
                return Err(AllocationError::DiscountCeilingsInsufficient {
                    discount,
                    ceiling_sum,
                    total,
                });
            }
        }
    }

    Ok(())
}

enum Axis {
    Item(usize),
    Discount(usize),
}

/// Sum of the ceilings along one row or column, or `None` if any cell on
/// that line has no ceiling (partial coverage is not statically checkable).
fn full_coverage_sum(
    ceilings: &CeilingMap,
    items: usize,
    discounts: usize,
    axis: Axis,
) -> Option<i64> {
    let cells: Vec<(usize, usize)> = match axis {
        Axis::Item(item) => (0..discounts).map(|discount| (item, discount)).collect(),
        Axis::Discount(discount) => (0..items).map(|item| (item, discount)).collect(),
    };

    let mut sum: i64 = 0;
    for (item, discount) in cells {
        sum += ceilings.get(item, discount)?.limit();
    }
    Some(sum)
}
