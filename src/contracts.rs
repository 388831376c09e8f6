// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the builder.
//!
//! Debug-mode assertions on what the encoder just produced. They are
//! **zero-cost in release builds** (the bodies compile away) and turn an
//! encoder bug into a panic at the build site instead of a wrong count at
//! some later query.
//!
//! | Contract Function            | Property                                   |
//! |------------------------------|--------------------------------------------|
//! | `check_items_sorted`         | sorted item list is strictly ascending     |
//! | `check_index_well_formed`    | encoded bytes verify and decode to `items` |

use crate::types::SortedItem;

/// Check that items are strictly ascending by value with non-zero counts.
///
/// # Panics (debug builds only)
/// Panics on the first out-of-order pair or zero count.
#[inline]
pub fn check_items_sorted(items: &[SortedItem]) {
    for i in 1..items.len() {
        debug_assert!(
            items[i - 1].value < items[i].value,
            "Contract violation: items[{}].value {} >= items[{}].value {}",
            i - 1,
            items[i - 1].value,
            i,
            items[i].value
        );
    }
    debug_assert!(
        items.iter().all(|item| item.count >= 1),
        "Contract violation: item with zero count"
    );
}

/// Check that `index` passes `verify_index` and decodes back to `items`.
///
/// # Panics (debug builds only)
/// Panics if verification fails or any decoded item differs.
#[inline]
pub fn check_index_well_formed(index: &[u8], items: &[SortedItem]) {
    check_items_sorted(items);

    #[cfg(debug_assertions)]
    {
        match crate::verify::decode_items(index) {
            Ok(decoded) => debug_assert!(
                decoded == items,
                "Contract violation: index decodes to {} items, expected {}",
                decoded.len(),
                items.len()
            ),
            Err(e) => panic!("Contract violation: built index fails verification: {}", e),
        }
    }
    #[cfg(not(debug_assertions))]
    let _ = index;
}
