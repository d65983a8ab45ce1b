//! Weighted dispatch
//!
//! Splits one positive total across weighted buckets with exact integer
//! arithmetic: the output always sums to the input total.

use thiserror::Error;

/// Errors specific to weighted dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No weights were provided.
    #[error("no weights to dispatch across")]
    NoWeights,

    /// The total to dispatch must be positive.
    #[error("dispatch total must be positive, got {0}")]
    NonPositiveTotal(i64),

    /// A negative weight was provided.
    #[error("dispatch weights must not be negative, got {0}")]
    NegativeWeight(i64),

    /// Every weight was zero, so the proportional split is undefined.
    #[error("dispatch weights must not all be zero")]
    AllZeroWeights,
}

/// Splits `total` across buckets in proportion to `weights`.
///
/// Every bucket except the last receives the floor of its proportional
/// share; the last bucket receives the exact remainder, so the output always
/// sums to `total`. A zero-weight bucket never receives value: if the last
/// weight is zero and the truncation remainder landed on it, the remainder
/// is reassigned to the first bucket with a positive weight.
///
/// # Errors
///
/// Returns a [`DispatchError`] if `weights` is empty, `total` is not
/// positive, any weight is negative, or all weights are zero.
pub fn dispatch_by_weight(total: i64, weights: &[i64]) -> Result<Vec<i64>, DispatchError> {
    if weights.is_empty() {
        return Err(DispatchError::NoWeights);
    }
    if total <= 0 {
        return Err(DispatchError::NonPositiveTotal(total));
    }

    let mut denominator: i64 = 0;
    for &weight in weights {
        if weight < 0 {
            return Err(DispatchError::NegativeWeight(weight));
        }
        denominator += weight;
    }
    if denominator == 0 {
        return Err(DispatchError::AllZeroWeights);
    }

    let mut result = vec![0_i64; weights.len()];
    let mut assigned: i64 = 0;
    for (bucket, &weight) in result.iter_mut().zip(weights).take(weights.len() - 1) {
        // Exact floor of weight / denominator * total; the i128 product
        // cannot overflow for any pair of i64 operands.
        let share = (i128::from(weight) * i128::from(total) / i128::from(denominator)) as i64;
        *bucket = share;
        assigned += share;
    }
    let last = weights.len() - 1;
    result[last] = total - assigned;

    // The remainder may have landed on a zero-weight last bucket; move it to
    // the first bucket that is allowed to carry value.
    if weights[last] == 0 && result[last] > 0 {
        let remainder = result[last];
        for (bucket, &weight) in result.iter_mut().zip(weights) {
            if weight > 0 {
                *bucket += remainder;
                break;
            }
        }
        result[last] = 0;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn dispatch_sums_exactly_to_total() -> TestResult {
        let result = dispatch_by_weight(20, &[5, 12, 13, 60])?;

        assert_eq!(result.len(), 4);
        assert_eq!(result.iter().sum::<i64>(), 20);

        Ok(())
    }

    #[test]
    fn remainder_lands_on_last_bucket() -> TestResult {
        let result = dispatch_by_weight(10, &[1, 1, 1])?;

        assert_eq!(result, vec![3, 3, 4]);

        Ok(())
    }

    #[test]
    fn zero_weight_buckets_receive_nothing() -> TestResult {
        let result = dispatch_by_weight(100, &[3, 0, 7, 0])?;

        assert_eq!(result.iter().sum::<i64>(), 100);
        assert_eq!(result[1], 0);
        assert_eq!(result[3], 0);

        Ok(())
    }

    #[test]
    fn trailing_zero_weight_remainder_moves_to_first_positive_bucket() -> TestResult {
        // 7 over weights [3, 3, 0] floors to [3, 3] with a remainder of 1;
        // the remainder must not stay on the zero-weight last bucket.
        let result = dispatch_by_weight(7, &[3, 3, 0])?;

        assert_eq!(result, vec![4, 3, 0]);

        Ok(())
    }

    #[test]
    fn empty_weights_is_an_error() {
        assert!(matches!(
            dispatch_by_weight(10, &[]),
            Err(DispatchError::NoWeights)
        ));
    }

    #[test]
    fn non_positive_total_is_an_error() {
        assert!(matches!(
            dispatch_by_weight(0, &[1]),
            Err(DispatchError::NonPositiveTotal(0))
        ));
        assert!(matches!(
            dispatch_by_weight(-5, &[1]),
            Err(DispatchError::NonPositiveTotal(-5))
        ));
    }

    #[test]
    fn negative_weight_is_an_error() {
        assert!(matches!(
            dispatch_by_weight(10, &[1, -2]),
            Err(DispatchError::NegativeWeight(-2))
        ));
    }

    #[test]
    fn all_zero_weights_is_an_error() {
        assert!(matches!(
            dispatch_by_weight(10, &[0, 0]),
            Err(DispatchError::AllZeroWeights)
        ));
    }

    #[test]
    fn large_amounts_do_not_overflow() -> TestResult {
        let result = dispatch_by_weight(146_800, &[144_388, 1_468, 944])?;

        assert_eq!(result.iter().sum::<i64>(), 146_800);

        Ok(())
    }
}
