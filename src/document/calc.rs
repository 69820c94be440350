//! Line-item arithmetic.
//!
//! Every operation is pure and returns a fresh vector; the caller swaps the
//! whole item list on each edit. None of these functions can fail: an
//! out-of-bounds index is a no-op because the CLI validates indices before
//! calling in here.

use crate::company;
use crate::document::model::LineItem;

/// A single field edit on one item.
#[derive(Debug, Clone)]
pub enum ItemField {
    Description(String),
    Rate(f64),
    Qty(f64),
    /// Direct amount override; suspends the rate*qty invariant for the item
    /// until its rate or qty changes again.
    Amount(f64),
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Currency display: two decimals behind the fixed glyph, e.g. "R16000.00".
pub fn format_money(value: f64) -> String {
    format!("{}{:.2}", company::CURRENCY_SYMBOL, value)
}

/// Replace one field of the item at `index`. Editing rate or qty recomputes
/// the amount; editing the amount directly leaves rate and qty untouched.
pub fn set_item_field(items: &[LineItem], index: usize, field: ItemField) -> Vec<LineItem> {
    let mut items = items.to_vec();
    let Some(item) = items.get_mut(index) else {
        return items;
    };
    match field {
        ItemField::Description(description) => item.description = description,
        ItemField::Rate(rate) => {
            item.rate = rate;
            item.amount = round2(item.rate * item.qty);
        }
        ItemField::Qty(qty) => {
            item.qty = qty;
            item.amount = round2(item.rate * item.qty);
        }
        ItemField::Amount(amount) => item.amount = amount,
    }
    items
}

/// Append a zero-valued item ready for editing.
pub fn add_item(items: &[LineItem]) -> Vec<LineItem> {
    let mut items = items.to_vec();
    items.push(LineItem {
        description: String::new(),
        rate: 0.0,
        qty: 1.0,
        amount: 0.0,
    });
    items
}

/// Delete the item at `index`. The list may become empty; renderers handle
/// that by emitting no rows.
pub fn remove_item(items: &[LineItem], index: usize) -> Vec<LineItem> {
    let mut items = items.to_vec();
    if index < items.len() {
        items.remove(index);
    }
    items
}

pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.amount).sum()
}

/// Subtotal minus the flat discount. Deliberately not clamped: a discount
/// larger than the subtotal yields a negative total.
pub fn total(items: &[LineItem], discount: f64) -> f64 {
    subtotal(items) - discount
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new("Transport", 13500.0, 1.0),
            LineItem::new("Coffin", 2500.0, 1.0),
        ]
    }

    #[test]
    fn total_is_subtotal_minus_discount() {
        let items = sample_items();
        assert_eq!(subtotal(&items), 16000.0);
        assert_eq!(total(&items, 0.0), 16000.0);
        assert_eq!(total(&items, 500.0), 15500.0);
    }

    #[test]
    fn total_may_go_negative() {
        let items = vec![LineItem::new("Flowers", 100.0, 1.0)];
        assert_eq!(total(&items, 250.0), -150.0);
    }

    #[test]
    fn editing_rate_recomputes_amount() {
        let items = sample_items();
        let items = set_item_field(&items, 0, ItemField::Rate(14000.0));
        assert_eq!(items[0].amount, 14000.0);
        assert_eq!(total(&items, 0.0), 16500.0);
    }

    #[test]
    fn editing_qty_recomputes_amount() {
        let items = sample_items();
        let items = set_item_field(&items, 1, ItemField::Qty(3.0));
        assert_eq!(items[1].amount, 7500.0);
        assert_eq!(subtotal(&items), 21000.0);
    }

    #[test]
    fn fractional_rates_round_to_cents() {
        let items = vec![LineItem::new("Candles", 0.0, 1.0)];
        let items = set_item_field(&items, 0, ItemField::Rate(33.335));
        assert_eq!(items[0].amount, 33.34);
    }

    #[test]
    fn direct_amount_edit_bypasses_recompute() {
        let items = sample_items();
        let items = set_item_field(&items, 0, ItemField::Amount(12000.0));
        assert_eq!(items[0].amount, 12000.0);
        assert_eq!(items[0].rate, 13500.0);
        // Touching qty again re-establishes the invariant.
        let items = set_item_field(&items, 0, ItemField::Qty(1.0));
        assert_eq!(items[0].amount, 13500.0);
    }

    #[test]
    fn description_edit_leaves_amount_alone() {
        let items = sample_items();
        let items = set_item_field(&items, 0, ItemField::Description("Hearse".into()));
        assert_eq!(items[0].description, "Hearse");
        assert_eq!(items[0].amount, 13500.0);
    }

    #[test]
    fn out_of_bounds_edit_is_a_no_op() {
        let items = sample_items();
        let edited = set_item_field(&items, 99, ItemField::Rate(1.0));
        assert_eq!(edited, items);
    }

    #[test]
    fn add_item_appends_zero_valued_row() {
        let items = add_item(&sample_items());
        assert_eq!(items.len(), 3);
        let added = &items[2];
        assert_eq!(added.description, "");
        assert_eq!(added.rate, 0.0);
        assert_eq!(added.qty, 1.0);
        assert_eq!(added.amount, 0.0);
        // Appending does not change the running total.
        assert_eq!(total(&items, 0.0), 16000.0);
    }

    #[test]
    fn remove_item_allows_emptying_the_list() {
        let items = sample_items();
        let items = remove_item(&items, 1);
        let items = remove_item(&items, 0);
        assert!(items.is_empty());
        assert_eq!(subtotal(&items), 0.0);
        assert_eq!(total(&items, 0.0), 0.0);
    }

    #[test]
    fn money_formatting_is_two_decimal_with_glyph() {
        assert_eq!(format_money(16000.0), "R16000.00");
        assert_eq!(format_money(0.5), "R0.50");
        assert_eq!(format_money(-500.0), "R-500.00");
    }
}
