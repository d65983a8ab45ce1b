//! Unit explosion
//!
//! Splits one item's already-allocated discount vector across its physical
//! units by re-running the full allocation pipeline with synthetic
//! uniform-price items, then merging identical unit rows into groups.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{allocate::AllocationRequest, error::AllocationError};

/// Errors specific to unit explosion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExplodeError {
    /// The item total must be positive.
    #[error("item total must be positive, got {0}")]
    NonPositiveTotal(i64),

    /// The unit count must be positive.
    #[error("unit count must be positive, got {0}")]
    NonPositiveCount(i64),

    /// The item total does not split into a whole per-unit price.
    #[error("item total {total} is not evenly divisible by unit count {count}")]
    IndivisibleTotal {
        /// The item total.
        total: i64,

        /// The unit count.
        count: i64,
    },

    /// The allocation vector was empty.
    #[error("allocation vector is empty")]
    EmptyVector,

    /// The allocation vector does not sum to the item total.
    #[error("allocation vector sums to {vector_sum}, expected the item total {total}")]
    VectorSumMismatch {
        /// Sum of the allocation vector.
        vector_sum: i64,

        /// The item total.
        total: i64,
    },

    /// The recursive allocation over the synthetic unit items failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// A per-unit discount allocation shared by `count` identical units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitGroup {
    /// Discount amounts carried by each unit in the group.
    pub vector: Vec<i64>,

    /// Number of physical units sharing this vector.
    pub count: i64,
}

/// Splits an item's discount allocation across its physical units.
///
/// All units share the price `item_total / unit_count`, and the original
/// vector becomes the discount budgets of a fresh allocation over
/// `unit_count` synthetic items. Identical unit rows are merged into
/// [`UnitGroup`]s, preserving the order in which they first appear; group
/// counts always sum to `unit_count`, and the group vectors weighted by
/// their counts reproduce the input vector element-wise.
///
/// # Errors
///
/// Returns an [`ExplodeError`] if the total or count is not positive, the
/// total does not divide evenly into units, the vector is empty or does not
/// sum to the total, or the recursive allocation fails.
pub fn explode_units(
    vector: &[i64],
    item_total: i64,
    unit_count: i64,
) -> Result<Vec<UnitGroup>, ExplodeError> {
    if item_total <= 0 {
        return Err(ExplodeError::NonPositiveTotal(item_total));
    }
    if unit_count <= 0 {
        return Err(ExplodeError::NonPositiveCount(unit_count));
    }
    if item_total % unit_count != 0 {
        return Err(ExplodeError::IndivisibleTotal {
            total: item_total,
            count: unit_count,
        });
    }
    if vector.is_empty() {
        return Err(ExplodeError::EmptyVector);
    }
    let vector_sum: i64 = vector.iter().sum();
    if vector_sum != item_total {
        return Err(ExplodeError::VectorSumMismatch {
            vector_sum,
            total: item_total,
        });
    }

    if unit_count == 1 {
        return Ok(vec![UnitGroup {
            vector: vector.to_vec(),
            count: 1,
        }]);
    }

    let unit_price = item_total / unit_count;
    let units = vec![unit_price; unit_count as usize];
    let table = AllocationRequest::new(vector.to_vec(), units).solve()?;

    // Merge identical unit rows, keeping first-seen order.
    let mut seen: FxHashMap<&[i64], usize> = FxHashMap::default();
    let mut groups: Vec<UnitGroup> = Vec::new();
    for row in table.matrix() {
        if let Some(&at) = seen.get(row.as_slice()) {
            groups[at].count += 1;
        } else {
            seen.insert(row.as_slice(), groups.len());
            groups.push(UnitGroup {
                vector: row.clone(),
                count: 1,
            });
        }
    }

    Ok(groups)
}
