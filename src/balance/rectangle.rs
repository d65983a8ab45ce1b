//! Rectangle balancing
//!
//! Clears ceiling violations left behind by column balancing. A violation
//! at one cell is traded away through the four corners of a rectangle: the
//! violating cell and the opposite corner both give up value, the two
//! remaining corners absorb it, so every row and column sum is unchanged.

use crate::{
    ceilings::{Ceiling, Cell},
    error::AllocationError,
    table::AllocationTable,
};

/// Repairs every cell that exceeds its configured ceiling.
///
/// Every exchange removes at least one unit of excess and never creates a
/// new violation (the receiving corners are clamped to their own caps), so
/// the loop terminates.
pub(crate) fn balance(table: &mut AllocationTable) -> Result<(), AllocationError> {
    while let Some((cell, excess)) = first_violation(table) {
        exchange_away(table, cell, excess)?;
    }
    Ok(())
}

/// The first cell in row-major order whose value exceeds its positive cap.
///
/// Excluded cells are kept at zero by the earlier stages, so only positive
/// caps can be violated here; cells without a ceiling never qualify.
fn first_violation(table: &AllocationTable) -> Option<(Cell, i64)> {
    for item in 0..table.items() {
        for discount in 0..table.discounts() {
            if let Some(Ceiling::Capped(limit)) = table.ceilings().get(item, discount) {
                let value = table.cell(item, discount);
                if value > limit {
                    return Some((Cell::new(item, discount), value - limit));
                }
            }
        }
    }
    None
}

/// Runs one exchange against the violating `cell`, clearing as much of its
/// excess as the first fitting rectangle allows.
fn exchange_away(
    table: &mut AllocationTable,
    cell: Cell,
    excess: i64,
) -> Result<(), AllocationError> {
    for item in 0..table.items() {
        if item == cell.item {
            continue;
        }
        for discount in 0..table.discounts() {
            if discount == cell.discount {
                continue;
            }

            // The opposite corner must have value to give up.
            let opposite_value = table.cell(item, discount);
            if opposite_value == 0 {
                continue;
            }

            // The two receiving corners need room below their own caps; an
            // excluded corner has no room at all.
            let same_column_room = table
                .ceilings()
                .headroom(item, cell.discount, table.cell(item, cell.discount));
            if matches!(same_column_room, Some(room) if room <= 0) {
                continue;
            }
            let same_row_room = table
                .ceilings()
                .headroom(cell.item, discount, table.cell(cell.item, discount));
            if matches!(same_row_room, Some(room) if room <= 0) {
                continue;
            }

            let mut amount = excess.min(opposite_value);
            if let Some(room) = same_column_room {
                amount = amount.min(room);
            }
            if let Some(room) = same_row_room {
                amount = amount.min(room);
            }

            let opposite = Cell::new(item, discount);
            table.exchange(cell, opposite, amount);
            table.record(&format!(
                "rectangle SKU-{}/PRO-{} with SKU-{item}/PRO-{discount}, moved {amount}",
                cell.item, cell.discount
            ));
            return Ok(());
        }
    }

    Err(AllocationError::NoExchangeRectangle {
        item: cell.item,
        discount: cell.discount,
    })
}
