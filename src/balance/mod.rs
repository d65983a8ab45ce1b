//! Balancing stages
//!
//! The two combinatorial repair procedures of the pipeline: the
//! complementary-column exchange that fixes per-discount totals, and the
//! rectangle exchange that clears ceiling violations.

pub(crate) mod column;
pub(crate) mod rectangle;
