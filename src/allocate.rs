//! Allocation pipeline
//!
//! Entry points for the three-stage engine: validation, proportional
//! dispatch of each item row, column balancing and rectangle balancing.

use crate::{
    balance,
    ceilings::CeilingMap,
    dispatch::dispatch_by_weight,
    error::AllocationError,
    table::AllocationTable,
    validate,
};

/// A single allocation problem plus per-call options.
///
/// Each request owns its own table, so any number of requests may be solved
/// concurrently without shared state.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    discount_totals: Vec<i64>,
    item_totals: Vec<i64>,
    ceilings: CeilingMap,
    capture_trace: bool,
}

impl AllocationRequest {
    /// Creates a request for the given discount budgets and item targets.
    #[must_use]
    pub fn new(discount_totals: Vec<i64>, item_totals: Vec<i64>) -> Self {
        Self {
            discount_totals,
            item_totals,
            ceilings: CeilingMap::new(),
            capture_trace: false,
        }
    }

    /// Sets the per-cell ceilings.
    #[must_use]
    pub fn with_ceilings(mut self, ceilings: CeilingMap) -> Self {
        self.ceilings = ceilings;
        self
    }

    /// Enables capture of rendered trace snapshots on the result table.
    ///
    /// Tracing is a per-request option, so concurrent callers never affect
    /// each other's diagnostics.
    #[must_use]
    pub fn capture_trace(mut self, enabled: bool) -> Self {
        self.capture_trace = enabled;
        self
    }

    /// Runs the pipeline and returns the balanced table.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if the request is malformed or the
    /// constraint system has no integer solution.
    pub fn solve(self) -> Result<AllocationTable, AllocationError> {
        let (table, outcome) = self.solve_diagnostic();
        outcome.map(|()| table)
    }

    /// Runs the pipeline, returning the table even on failure.
    ///
    /// A table paired with an error is partially balanced at best: it is
    /// returned for rendering and trace inspection only and must never be
    /// treated as a valid allocation.
    pub fn solve_diagnostic(mut self) -> (AllocationTable, Result<(), AllocationError>) {
        let validated =
            validate::check(&self.discount_totals, &self.item_totals, &mut self.ceilings);

        let mut table = AllocationTable::new(
            self.discount_totals,
            self.item_totals,
            self.ceilings,
            self.capture_trace,
        );

        if let Err(error) = validated {
            return (table, Err(error));
        }

        let outcome = run_pipeline(&mut table);
        (table, outcome)
    }
}

/// Allocates `discount_totals` across `item_totals` under `ceilings`.
///
/// Convenience wrapper over [`AllocationRequest`] with tracing disabled.
///
/// # Errors
///
/// Returns an [`AllocationError`] if the request is malformed or the
/// constraint system has no integer solution.
pub fn allocate(
    discount_totals: Vec<i64>,
    item_totals: Vec<i64>,
    ceilings: CeilingMap,
) -> Result<AllocationTable, AllocationError> {
    AllocationRequest::new(discount_totals, item_totals)
        .with_ceilings(ceilings)
        .solve()
}

fn run_pipeline(table: &mut AllocationTable) -> Result<(), AllocationError> {
    initial_dispatch(table)?;
    table.record("initial distribution");
    balance::column::balance(table)?;
    balance::rectangle::balance(table)?;
    Ok(())
}

/// Dispatches every item row proportionally to the discount budgets,
/// zero-weighting excluded cells.
///
/// When no ceilings are configured and every item total is equal (the
/// uniform-price shape produced by unit explosion), a running per-column
/// remaining budget zeroes out exhausted columns for later rows, so
/// truncation remainders do not pile up in the last column and leave the
/// column balancer with needless work.
fn initial_dispatch(table: &mut AllocationTable) -> Result<(), AllocationError> {
    let uniform = table.ceilings().is_empty()
        && table.item_totals().windows(2).all(|pair| pair[0] == pair[1]);
    let mut remaining: Vec<i64> = if uniform {
        table.discount_totals().to_vec()
    } else {
        Vec::new()
    };

    for item in 0..table.items() {
        let mut weights: Vec<i64> = table.discount_totals().to_vec();
        for (discount, weight) in weights.iter_mut().enumerate() {
            if table.ceilings().is_excluded(item, discount) {
                *weight = 0;
            }
        }
        if uniform {
            for (weight, &left) in weights.iter_mut().zip(&remaining) {
                if left <= 0 {
                    *weight = 0;
                }
            }
        }

        let row = dispatch_by_weight(table.item_totals()[item], &weights)?;
        if uniform {
            for (left, &value) in remaining.iter_mut().zip(&row) {
                *left -= value;
            }
        }
        table.set_row(item, row);
    }

    Ok(())
}
