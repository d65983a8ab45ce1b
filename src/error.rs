//! Allocation errors

use thiserror::Error;

use crate::dispatch::DispatchError;

/// Broad classification of an allocation failure.
///
/// [`ErrorKind::Input`] and [`ErrorKind::Consistency`] mean the caller
/// should fix the request and retry; the infeasibility kinds mean the
/// constraint system itself has no integer solution and needs a
/// business-rule change, not a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: empty sequences, bad signs, negative ceilings.
    Input,

    /// Discount totals and item totals do not sum to the same amount.
    Consistency,

    /// Full ceiling coverage cannot reach a required total; detected before
    /// any allocation work begins.
    StaticInfeasibility,

    /// Column balancing could not repair the per-discount totals.
    Balancing,

    /// Rectangle balancing could not clear a ceiling violation.
    Exchange,
}

/// Errors raised by the allocation pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// Either the discount totals or the item totals were empty.
    #[error("discount totals and item totals must both be non-empty")]
    EmptyInputs,

    /// An item total was zero or negative.
    #[error("item {item} total must be positive, got {total}")]
    NonPositiveItemTotal {
        /// Item row index.
        item: usize,

        /// The offending total.
        total: i64,
    },

    /// A discount total was negative.
    #[error("discount {discount} total must not be negative, got {total}")]
    NegativeDiscountTotal {
        /// Discount column index.
        discount: usize,

        /// The offending total.
        total: i64,
    },

    /// A ceiling was configured with a negative limit.
    #[error("ceiling for item {item}, discount {discount} must not be negative, got {limit}")]
    NegativeCeiling {
        /// Item row index.
        item: usize,

        /// Discount column index.
        discount: usize,

        /// The offending limit.
        limit: i64,
    },

    /// The discount budgets and the item targets do not agree.
    #[error("sum of discount totals minus sum of item totals is {discrepancy}, expected 0")]
    TotalsMismatch {
        /// Signed difference between the discount and item sums.
        discrepancy: i64,
    },

    /// An item is capped on every discount and the caps cannot reach its total.
    #[error(
        "item {item} is capped on every discount; caps sum to {ceiling_sum}, below its total {total}"
    )]
    ItemCeilingsInsufficient {
        /// Item row index.
        item: usize,

        /// Sum of the item's ceilings across all discounts.
        ceiling_sum: i64,

        /// The item's target total.
        total: i64,
    },

    /// A discount is capped on every item and the caps cannot absorb its budget.
    #[error(
        "discount {discount} is capped on every item; caps sum to {ceiling_sum}, below its total {total}"
    )]
    DiscountCeilingsInsufficient {
        /// Discount column index.
        discount: usize,

        /// Sum of the discount's ceilings across all items.
        ceiling_sum: i64,

        /// The discount's budget.
        total: i64,
    },

    /// Column balancing found a one-sided imbalance with no partner column.
    #[error("no complementary discount column pair found to balance")]
    NoComplementaryColumns,

    /// Column balancing ran out of adjustable columns with imbalance left.
    #[error("cannot find two discount columns to adjust")]
    ColumnsExhausted,

    /// No four-corner exchange could clear a ceiling violation.
    #[error("no exchange rectangle found for item {item}, discount {discount}")]
    NoExchangeRectangle {
        /// Item row of the violating cell.
        item: usize,

        /// Discount column of the violating cell.
        discount: usize,
    },

    /// Weighted dispatch of an item row failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl AllocationError {
    /// The broad classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInputs
            | Self::NonPositiveItemTotal { .. }
            | Self::NegativeDiscountTotal { .. }
            | Self::NegativeCeiling { .. }
            | Self::Dispatch(_) => ErrorKind::Input,
            Self::TotalsMismatch { .. } => ErrorKind::Consistency,
            Self::ItemCeilingsInsufficient { .. } | Self::DiscountCeilingsInsufficient { .. } => {
                ErrorKind::StaticInfeasibility
            }
            Self::NoComplementaryColumns | Self::ColumnsExhausted => ErrorKind::Balancing,
            Self::NoExchangeRectangle { .. } => ErrorKind::Exchange,
        }
    }

    /// True when the request was well-formed but the constraint system has
    /// no integer solution.
    #[must_use]
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StaticInfeasibility | ErrorKind::Balancing | ErrorKind::Exchange
        )
    }
}
