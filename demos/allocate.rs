//! Solve an allocation scenario from a YAML fixture and print the table.
//!
//! ```text
//! cargo run --example allocate -- --fixture demos/fixtures/order.yaml --trace
//! ```

use anyhow::Result;
use clap::Parser;

use prorata::{fixtures::load_allocation_fixture, render::render};

/// Arguments for the allocation demo
#[derive(Debug, Parser)]
struct Args {
    /// Path to a YAML allocation fixture
    #[clap(short, long)]
    fixture: String,

    /// Print every balancing step, not just the final table
    #[clap(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let request = load_allocation_fixture(&args.fixture)?
        .into_request()
        .capture_trace(args.trace);

    let (table, outcome) = request.solve_diagnostic();

    for snapshot in table.trace() {
        println!("{snapshot}");
    }
    println!("{}", render(&table));

    outcome?;

    Ok(())
}
