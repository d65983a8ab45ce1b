//! Table rendering
//!
//! Human-readable rendering of an [`AllocationTable`] for diagnostics and
//! trace snapshots. Consumes only the table's public accessors; nothing in
//! the engine reads the rendered output back.

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::table::AllocationTable;

/// Renders the table with `PRO-j(budget)` column headers and
/// `SKU-i(target)` row labels.
#[must_use]
pub fn render(table: &AllocationTable) -> String {
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    for (discount, total) in table.discount_totals().iter().enumerate() {
        header.push(format!("PRO-{discount}({total})"));
    }
    builder.push_record(header);

    for (item, total) in table.item_totals().iter().enumerate() {
        let mut row = vec![format!("SKU-{item}({total})")];
        for discount in 0..table.discounts() {
            row.push(table.cell(item, discount).to_string());
        }
        builder.push_record(row);
    }

    let mut rendered = builder.build();
    rendered.with(Style::ascii());
    rendered.modify(Columns::new(1..), Alignment::right());

    rendered.to_string()
}
