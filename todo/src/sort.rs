//! Ordering of the item list.
//!
//! Implemented as a bubble sort: repeated passes of adjacent
//! compare-and-swap until a pass makes no swap. Elements are swapped only
//! when strictly out of order, so equal elements keep their input order.
//! Quadratic, which is fine for a hand-maintained list.

use crate::types::TodoItem;
use std::cmp::Ordering;

/// Return a copy of `items` stably sorted by `compare`.
#[must_use]
pub fn bubble_sort_by<T, F>(items: &[T], mut compare: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut sorted = items.to_vec();
    let len = sorted.len();

    for pass in 0..len {
        let mut swapped = false;
        // After each pass the largest remaining element has settled at the end.
        for j in 0..len - 1 - pass {
            if compare(&sorted[j], &sorted[j + 1]) == Ordering::Greater {
                sorted.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }

    sorted
}

/// Compare two strings by their UTF-16 code units.
///
/// Differs from `str::cmp` only when a character above U+FFFF meets one in
/// U+E000..=U+FFFF: the surrogate pair sorts first.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Return a copy of `items` ordered by ascending `text`.
///
/// Text is compared by UTF-16 code unit (see [`compare_text`]), which keeps
/// lists saved by older clients in the order they were written. Items with
/// equal text keep their relative order.
#[must_use]
pub fn sort_by_text(items: &[TodoItem]) -> Vec<TodoItem> {
    bubble_sort_by(items, |a, b| compare_text(&a.text, &b.text))
}
