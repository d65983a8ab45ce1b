//! Prorata
//!
//! An exact-integer engine that spreads aggregate promotional-discount
//! budgets across order line items, so that every item's assigned discounts
//! sum exactly to its target value, every discount's assignments sum exactly
//! to its budget, and per-(item, discount) ceilings are honored. All amounts
//! are minor currency units; no value is ever lost or double-counted.
//!
//! Allocation runs in three stages: a proportional dispatch of each item's
//! target across discounts by weight, a column-balancing exchange that
//! repairs per-discount totals while keeping item totals fixed, and a
//! four-corner rectangle exchange that clears ceiling violations without
//! disturbing either set of totals. [`explode_units`] re-applies the same
//! pipeline to split one item's allocation across its physical units.

pub mod allocate;
pub mod ceilings;
pub mod dispatch;
pub mod error;
pub mod explode;
pub mod fixtures;
pub mod render;
pub mod table;

mod balance;
mod validate;

pub use allocate::{AllocationRequest, allocate};
pub use ceilings::{Ceiling, CeilingMap, Cell};
pub use dispatch::{DispatchError, dispatch_by_weight};
pub use error::{AllocationError, ErrorKind};
pub use explode::{ExplodeError, UnitGroup, explode_units};
pub use table::AllocationTable;
