#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_leaves_short_descriptions() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Groceries", 9), "Groceries");
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_marks_cut_text() {
    assert_eq!(truncate("Weekly groceries run", 8), "Weekly …");
    assert_eq!(truncate("Rent", 1), "…");
    assert_eq!(truncate("Rent", 0), "");
}

#[test]
fn test_truncate_counts_chars_not_bytes() {
    assert_eq!(truncate("café au lait", 5), "café…");
    assert_eq!(truncate("🍕🍕🍕🍕", 3), "🍕🍕…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_groups_thousands() {
    assert_eq!(format_amount(dec!(999.99)), "₹999.99");
    assert_eq!(format_amount(dec!(1234.56)), "₹1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "₹1,234,567.89");
}

#[test]
fn test_format_amount_pads_decimals() {
    assert_eq!(format_amount(dec!(0)), "₹0.00");
    assert_eq!(format_amount(dec!(5)), "₹5.00");
    assert_eq!(format_amount(dec!(1.5)), "₹1.50");
}

#[test]
fn test_format_amount_negative_sign_before_symbol() {
    assert_eq!(format_amount(dec!(-42.50)), "-₹42.50");
    assert_eq!(format_amount(dec!(-99999.01)), "-₹99,999.01");
}

// ── mask ──────────────────────────────────────────────────────

#[test]
fn test_mask_counts_chars() {
    assert_eq!(mask("secret"), "••••••");
    assert_eq!(mask("pässwörd"), "••••••••");
    assert_eq!(mask(""), "");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1, 0);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!(index, 1);
    scroll_down(&mut index, &mut scroll, 0, 5);
    assert_eq!(index, 1);
}

#[test]
fn test_scroll_up_pulls_scroll_along() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (0, 0));
}
