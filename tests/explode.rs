//! Integration tests for unit explosion

use testresult::TestResult;

use prorata::{UnitGroup, explode_units};

/// Group counts must cover every unit, and the group vectors weighted by
/// their counts must reproduce the item's original allocation row.
fn assert_round_trip(groups: &[UnitGroup], vector: &[i64], unit_count: i64, unit_price: i64) {
    let counted: i64 = groups.iter().map(|group| group.count).sum();
    assert_eq!(counted, unit_count, "group counts must cover every unit");

    for (discount, &expected) in vector.iter().enumerate() {
        let reconstructed: i64 = groups
            .iter()
            .map(|group| group.vector[discount] * group.count)
            .sum();
        assert_eq!(reconstructed, expected, "discount {discount} must round-trip");
    }

    for group in groups {
        assert!(group.count >= 1);
        assert_eq!(group.vector.iter().sum::<i64>(), unit_price);
    }
}

#[test]
fn four_units_round_trip_their_allocation() -> TestResult {
    let vector = [1_190_i64, 3, 7];

    let groups = explode_units(&vector, 1_200, 4)?;

    assert_round_trip(&groups, &vector, 4, 300);

    Ok(())
}

#[test]
fn a_skewed_allocation_round_trips() -> TestResult {
    // The worked example from the refund subsystem: SKU-10 bought 4 times
    // at 1200 each, with almost the whole value on the first discount.
    let vector = [4_757_i64, 12, 31];

    let groups = explode_units(&vector, 4_800, 4)?;

    assert_round_trip(&groups, &vector, 4, 1_200);

    Ok(())
}

#[test]
fn identical_units_collapse_into_few_groups() -> TestResult {
    // A perfectly divisible allocation produces identical unit rows, which
    // must merge instead of repeating one group per unit.
    let vector = [300_i64, 100];

    let groups = explode_units(&vector, 400, 4)?;

    assert_round_trip(&groups, &vector, 4, 100);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0],
        UnitGroup {
            vector: vec![75, 25],
            count: 4
        }
    );

    Ok(())
}

#[test]
fn explosion_is_deterministic() -> TestResult {
    let vector = [4_757_i64, 12, 31];

    let first = explode_units(&vector, 4_800, 4)?;
    let second = explode_units(&vector, 4_800, 4)?;

    assert_eq!(first, second);

    Ok(())
}
