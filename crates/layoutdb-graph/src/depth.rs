//! Reference depth of a design.
//!
//! The depth of a record is the length of the longest chain of full
//! references starting at it; the depth of a design is the maximum over
//! every record it owns. A resolved design has depth 1 and a compacted one
//! depth 0.

use layoutdb_core::{design::Design, reference::Linked};

/// Longest chain of full references below any record of `design`.
pub fn reference_depth(design: &Design) -> usize {
    let mut deepest = 0;
    design.visit_records(&mut |record| deepest = deepest.max(record_depth(record)));
    deepest
}

/// Number of full references held anywhere in `design`, including nested
/// ones.
pub fn full_reference_count(design: &Design) -> usize {
    let mut count = 0;
    design.visit_records(&mut |record| count += record_full_count(record));
    count
}

// Full references are `Arc`s built bottom-up, so the walk terminates.
fn record_depth(record: &dyn Linked) -> usize {
    let mut deepest = 0;
    record.visit_links(&mut |link| {
        if let Some(target) = link.target() {
            deepest = deepest.max(1 + record_depth(target));
        }
    });
    deepest
}

fn record_full_count(record: &dyn Linked) -> usize {
    let mut count = 0;
    record.visit_links(&mut |link| {
        if let Some(target) = link.target() {
            count += 1 + record_full_count(target);
        }
    });
    count
}
