//! Paginated drawing-command renderer.
//!
//! [`layout`] maps a [`Document`] to an ordered sequence of absolute-positioned
//! draw operations on A4 pages (595x842 points, y measured from the top of the
//! page). The PDF writer consumes the sequence page by page, starting a new
//! page at each [`DrawOp::NewPage`]. Figures and conditional rows follow the
//! same rules as the markup renderer.

use crate::company;
use crate::document::calc::format_money;
use crate::document::{Billing, Detail, DocKind, Document, ReceiptDetail};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Fixed vertical geometry of the item table. A row is never split: the
/// break check runs before each row is laid out.
const ITEMS_START_Y: f32 = 262.0;
const ITEM_ROW_STEP: f32 = 22.0;
const PAGE_BREAK_Y: f32 = 770.0;
const CONTINUATION_TOP_Y: f32 = 60.0;

const MARGIN_X: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GRAY: Rgb = Rgb(102, 102, 102);
pub const NAVY: Rgb = Rgb(30, 64, 175);
pub const BLUE: Rgb = Rgb(37, 99, 235);
pub const LIGHT: Rgb = Rgb(248, 250, 252);
pub const LIGHT_BLUE: Rgb = Rgb(239, 246, 255);
pub const CREAM: Rgb = Rgb(254, 243, 199);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
        align: Align,
    },
    /// Company logo placement; the writer skips it when no logo asset is
    /// available.
    Logo { x: f32, y: f32, w: f32, h: f32 },
    NewPage,
}

struct Sheet {
    ops: Vec<DrawOp>,
}

impl Sheet {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
        align: Align,
    ) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            style,
            color,
            align,
        });
    }
}

fn header_band(sheet: &mut Sheet, accent: Rgb, with_logo: bool) {
    sheet.rect(0.0, 0.0, PAGE_WIDTH, 100.0, accent);
    if with_logo {
        self::logo(sheet, MARGIN_X, 20.0, 90.0, 60.0);
    }
    let x = if with_logo { 150.0 } else { PAGE_WIDTH / 2.0 };
    let align = if with_logo { Align::Left } else { Align::Center };
    sheet.text(company::NAME, x, 38.0, 16.0, FontStyle::Bold, WHITE, align);
    sheet.text(
        company::ADDRESS_LINES.join(", "),
        x,
        58.0,
        9.0,
        FontStyle::Regular,
        WHITE,
        align,
    );
    sheet.text(
        format!("{} | {}", company::PHONE, company::EMAIL),
        x,
        72.0,
        9.0,
        FontStyle::Regular,
        WHITE,
        align,
    );
}

fn logo(sheet: &mut Sheet, x: f32, y: f32, w: f32, h: f32) {
    sheet.ops.push(DrawOp::Logo { x, y, w, h });
}

fn payment_footer(sheet: &mut Sheet, y: f32, accent: Rgb) {
    sheet.line(MARGIN_X, y, PAGE_WIDTH - MARGIN_X, y, 1.0, accent);
    let lines = [
        format!("Registration Number {}", company::REGISTRATION_NUMBER),
        "Payment Details".to_string(),
        format!("Account Name: {}", company::BANK_ACCOUNT_NAME),
        format!("Bank: {}", company::BANK_NAME),
        format!("Account number: {}", company::BANK_ACCOUNT_NUMBER),
    ];
    let mut line_y = y + 16.0;
    for line in lines {
        sheet.text(line, MARGIN_X, line_y, 9.0, FontStyle::Regular, GRAY, Align::Left);
        line_y += 12.0;
    }
    sheet.text(
        company::TAGLINE,
        PAGE_WIDTH / 2.0,
        line_y + 12.0,
        10.0,
        FontStyle::Bold,
        accent,
        Align::Center,
    );
}

fn layout_billing(doc: &Document, billing: &Billing) -> Vec<DrawOp> {
    let kind = doc.kind();
    let accent = if kind == DocKind::Invoice { NAVY } else { BLUE };
    let title = match kind {
        DocKind::Invoice => "INVOICE",
        _ => "QUOTATION",
    };
    let total = billing.total();
    let mut sheet = Sheet::new();

    header_band(&mut sheet, accent, true);

    sheet.text(title, MARGIN_X, 136.0, 18.0, FontStyle::Bold, accent, Align::Left);
    sheet.text(
        &doc.number,
        PAGE_WIDTH - MARGIN_X,
        136.0,
        12.0,
        FontStyle::Bold,
        BLACK,
        Align::Right,
    );
    sheet.text(
        format!("DATE: {}", doc.issue_date_display()),
        MARGIN_X,
        156.0,
        10.0,
        FontStyle::Regular,
        BLACK,
        Align::Left,
    );
    let secondary = match &doc.detail {
        Detail::Invoice { due, .. } => format!("DUE: {due}"),
        Detail::Quotation { valid_until, .. } => {
            format!("VALID UNTIL: {}", valid_until.format("%B %d, %Y"))
        }
        Detail::Receipt(_) => String::new(),
    };
    sheet.text(
        secondary,
        PAGE_WIDTH - MARGIN_X,
        156.0,
        10.0,
        FontStyle::Regular,
        BLACK,
        Align::Right,
    );

    let party_label = if kind == DocKind::Invoice {
        "BILL TO"
    } else {
        "QUOTE TO"
    };
    let fallback = if kind == DocKind::Invoice {
        "Client"
    } else {
        "Prospective Client"
    };
    let client = if billing.client_name.is_empty() {
        fallback
    } else {
        billing.client_name.as_str()
    };
    sheet.text(party_label, MARGIN_X, 182.0, 11.0, FontStyle::Bold, BLACK, Align::Left);
    sheet.text(client, MARGIN_X, 198.0, 11.0, FontStyle::Regular, BLACK, Align::Left);

    if let Detail::Quotation { valid_until, .. } = &doc.detail {
        sheet.rect(MARGIN_X, 206.0, PAGE_WIDTH - 2.0 * MARGIN_X, 22.0, CREAM);
        sheet.text(
            format!(
                "Note: This quotation is valid until {}. Prices may be subject to change after this date.",
                valid_until.format("%B %d, %Y")
            ),
            MARGIN_X + 8.0,
            220.0,
            9.0,
            FontStyle::Regular,
            BLACK,
            Align::Left,
        );
    }

    // Table column x positions, shared by header and rows.
    let x_desc = MARGIN_X + 8.0;
    let x_rate = 380.0;
    let x_qty = 450.0;
    let x_amount = PAGE_WIDTH - MARGIN_X - 8.0;

    let table_header = |sheet: &mut Sheet, y: f32| {
        sheet.rect(MARGIN_X, y - 14.0, PAGE_WIDTH - 2.0 * MARGIN_X, 22.0, LIGHT);
        sheet.text("DESCRIPTION", x_desc, y, 10.0, FontStyle::Bold, BLACK, Align::Left);
        sheet.text("RATE", x_rate, y, 10.0, FontStyle::Bold, BLACK, Align::Right);
        sheet.text("QTY", x_qty, y, 10.0, FontStyle::Bold, BLACK, Align::Right);
        sheet.text("AMOUNT", x_amount, y, 10.0, FontStyle::Bold, BLACK, Align::Right);
    };

    table_header(&mut sheet, ITEMS_START_Y - ITEM_ROW_STEP);

    let mut y = ITEMS_START_Y;
    for item in &billing.items {
        if y > PAGE_BREAK_Y {
            sheet.ops.push(DrawOp::NewPage);
            y = CONTINUATION_TOP_Y;
            table_header(&mut sheet, y);
            y += ITEM_ROW_STEP;
        }
        sheet.text(&item.description, x_desc, y, 10.0, FontStyle::Regular, BLACK, Align::Left);
        sheet.text(
            format_money(item.rate),
            x_rate,
            y,
            10.0,
            FontStyle::Regular,
            BLACK,
            Align::Right,
        );
        sheet.text(
            format!("{}", item.qty),
            x_qty,
            y,
            10.0,
            FontStyle::Regular,
            BLACK,
            Align::Right,
        );
        sheet.text(
            format_money(item.amount),
            x_amount,
            y,
            10.0,
            FontStyle::Regular,
            BLACK,
            Align::Right,
        );
        sheet.line(MARGIN_X, y + 6.0, PAGE_WIDTH - MARGIN_X, y + 6.0, 0.5, GRAY);
        y += ITEM_ROW_STEP;
    }

    // Totals and footer move as one block; break once if they would not fit.
    if y + 160.0 > PAGE_HEIGHT - 30.0 {
        sheet.ops.push(DrawOp::NewPage);
        y = CONTINUATION_TOP_Y;
    }
    y += 12.0;

    let x_label = 400.0;
    if billing.discount > 0.0 {
        sheet.text("SUBTOTAL", x_label, y, 10.0, FontStyle::Regular, BLACK, Align::Left);
        sheet.text(
            format_money(billing.subtotal()),
            x_amount,
            y,
            10.0,
            FontStyle::Regular,
            BLACK,
            Align::Right,
        );
        y += 16.0;
        sheet.text("DISCOUNT", x_label, y, 10.0, FontStyle::Regular, BLACK, Align::Left);
        sheet.text(
            format!("-{}", format_money(billing.discount)),
            x_amount,
            y,
            10.0,
            FontStyle::Regular,
            BLACK,
            Align::Right,
        );
        y += 16.0;
    }

    let total_label = if kind == DocKind::Invoice {
        "BALANCE DUE"
    } else {
        "TOTAL QUOTE AMOUNT"
    };
    sheet.text("TOTAL", x_label, y, 10.0, FontStyle::Regular, BLACK, Align::Left);
    sheet.text(
        format_money(total),
        x_amount,
        y,
        10.0,
        FontStyle::Regular,
        BLACK,
        Align::Right,
    );
    y += 20.0;

    let band_bg = if kind == DocKind::Invoice { LIGHT } else { LIGHT_BLUE };
    sheet.rect(MARGIN_X, y - 14.0, PAGE_WIDTH - 2.0 * MARGIN_X, 26.0, band_bg);
    sheet.text(total_label, x_desc, y + 3.0, 12.0, FontStyle::Bold, accent, Align::Left);
    sheet.text(
        format!("{} {}", company::CURRENCY_CODE, format_money(total)),
        x_amount,
        y + 3.0,
        12.0,
        FontStyle::Bold,
        accent,
        Align::Right,
    );
    y += 40.0;

    payment_footer(&mut sheet, y, accent);

    sheet.ops
}

/// Fixed single-page receipt layout.
fn layout_receipt(doc: &Document, detail: &ReceiptDetail) -> Vec<DrawOp> {
    let mut sheet = Sheet::new();
    let center = PAGE_WIDTH / 2.0;
    let box_x = 50.0;
    let box_w = PAGE_WIDTH - 100.0;

    sheet.rect(0.0, 0.0, PAGE_WIDTH, 100.0, NAVY);
    sheet.text(company::NAME, center, 35.0, 24.0, FontStyle::Bold, WHITE, Align::Center);
    sheet.text(
        company::ADDRESS_LINES[0],
        center,
        55.0,
        10.0,
        FontStyle::Regular,
        WHITE,
        Align::Center,
    );
    sheet.text(
        company::ADDRESS_LINES[1],
        center,
        68.0,
        10.0,
        FontStyle::Regular,
        WHITE,
        Align::Center,
    );
    sheet.text(
        format!(
            "{} | {} | {}",
            company::ADDRESS_LINES[2],
            company::PHONE,
            company::EMAIL
        ),
        center,
        81.0,
        10.0,
        FontStyle::Regular,
        WHITE,
        Align::Center,
    );

    sheet.text("RECEIPT", center, 130.0, 20.0, FontStyle::Bold, NAVY, Align::Center);

    sheet.rect(box_x, 150.0, box_w, 50.0, LIGHT);
    sheet.text("Receipt Number:", 70.0, 170.0, 10.0, FontStyle::Bold, BLACK, Align::Left);
    sheet.text("Date:", 350.0, 170.0, 10.0, FontStyle::Bold, BLACK, Align::Left);
    sheet.text(&doc.number, 70.0, 185.0, 10.0, FontStyle::Regular, GRAY, Align::Left);
    sheet.text(
        doc.issue_date_display(),
        350.0,
        185.0,
        10.0,
        FontStyle::Regular,
        GRAY,
        Align::Left,
    );

    sheet.rect(box_x, 220.0, box_w, 80.0, LIGHT);
    sheet.text("RECEIVED FROM:", 70.0, 240.0, 12.0, FontStyle::Bold, NAVY, Align::Left);
    sheet.text(
        &detail.customer_name,
        70.0,
        260.0,
        10.0,
        FontStyle::Bold,
        BLACK,
        Align::Left,
    );
    sheet.text(
        &detail.customer_address,
        70.0,
        275.0,
        10.0,
        FontStyle::Regular,
        GRAY,
        Align::Left,
    );
    sheet.text(
        format!("{} | {}", detail.customer_phone, detail.customer_email),
        70.0,
        288.0,
        10.0,
        FontStyle::Regular,
        GRAY,
        Align::Left,
    );

    sheet.rect(box_x, 320.0, box_w, 120.0, LIGHT);
    sheet.text("PAYMENT DETAILS", 70.0, 340.0, 12.0, FontStyle::Bold, NAVY, Align::Left);
    sheet.text("Description:", 70.0, 365.0, 10.0, FontStyle::Bold, BLACK, Align::Left);
    sheet.text("Payment Method:", 70.0, 390.0, 10.0, FontStyle::Bold, BLACK, Align::Left);
    sheet.text(
        &detail.description,
        180.0,
        365.0,
        10.0,
        FontStyle::Regular,
        GRAY,
        Align::Left,
    );
    sheet.text(
        detail.payment_method.as_str(),
        180.0,
        390.0,
        10.0,
        FontStyle::Regular,
        GRAY,
        Align::Left,
    );

    sheet.line(70.0, 405.0, PAGE_WIDTH - 70.0, 405.0, 2.0, NAVY);
    sheet.text(
        "TOTAL AMOUNT RECEIVED:",
        70.0,
        425.0,
        11.0,
        FontStyle::Bold,
        BLACK,
        Align::Left,
    );
    sheet.text(
        format!("{} {:.2}", company::CURRENCY_SYMBOL, detail.amount_value()),
        PAGE_WIDTH - 70.0,
        425.0,
        16.0,
        FontStyle::Bold,
        NAVY,
        Align::Right,
    );

    sheet.line(70.0, 520.0, 220.0, 520.0, 1.0, BLACK);
    sheet.text(
        "Customer Signature",
        70.0,
        535.0,
        10.0,
        FontStyle::Regular,
        BLACK,
        Align::Left,
    );
    sheet.line(PAGE_WIDTH - 220.0, 520.0, PAGE_WIDTH - 70.0, 520.0, 1.0, BLACK);
    sheet.text(
        "Authorized Signature",
        PAGE_WIDTH - 220.0,
        535.0,
        10.0,
        FontStyle::Regular,
        BLACK,
        Align::Left,
    );

    sheet.line(50.0, 580.0, PAGE_WIDTH - 50.0, 580.0, 2.0, NAVY);
    sheet.text(
        "Thank you for your payment",
        center,
        600.0,
        9.0,
        FontStyle::Bold,
        GRAY,
        Align::Center,
    );
    sheet.text(
        "This is an official receipt from Alex's Funeral Services",
        center,
        615.0,
        9.0,
        FontStyle::Regular,
        GRAY,
        Align::Center,
    );
    sheet.text(
        format!("Registration Number: {}", company::REGISTRATION_NUMBER),
        center,
        630.0,
        9.0,
        FontStyle::Regular,
        GRAY,
        Align::Center,
    );

    sheet.ops
}

/// Produce the full drawing-command sequence for one document.
pub fn layout(doc: &Document) -> Vec<DrawOp> {
    match &doc.detail {
        Detail::Invoice { billing, .. } | Detail::Quotation { billing, .. } => {
            layout_billing(doc, billing)
        }
        Detail::Receipt(detail) => layout_receipt(doc, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocKind, LineItem};

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn page_breaks(ops: &[DrawOp]) -> usize {
        ops.iter().filter(|op| matches!(op, DrawOp::NewPage)).count()
    }

    #[test]
    fn invoice_figures_match_markup_renderer() {
        let doc = Document::new(DocKind::Invoice);
        let ops = layout(&doc);
        let texts = texts(&ops);
        assert!(texts.contains(&"R16000.00"));
        assert!(texts.contains(&"R13500.00"));
        assert!(texts.contains(&"R2500.00"));
        assert!(texts.contains(&"BALANCE DUE"));
        assert!(!texts.contains(&"DISCOUNT"));
        assert!(texts.contains(&"ZAR R16000.00"));
    }

    #[test]
    fn quotation_discount_row_matches_markup_renderer() {
        let mut doc = Document::new(DocKind::Quotation);
        doc.billing_mut().unwrap().discount = 500.0;
        let ops = layout(&doc);
        let texts = texts(&ops);
        assert!(texts.contains(&"SUBTOTAL"));
        assert!(texts.contains(&"DISCOUNT"));
        assert!(texts.contains(&"-R500.00"));
        assert!(texts.contains(&"ZAR R15500.00"));
        assert!(texts.contains(&"TOTAL QUOTE AMOUNT"));
    }

    #[test]
    fn empty_item_list_lays_out_without_rows() {
        let mut doc = Document::new(DocKind::Invoice);
        doc.billing_mut().unwrap().items.clear();
        let ops = layout(&doc);
        let texts = texts(&ops);
        assert!(!texts.contains(&"Transport"));
        assert!(texts.contains(&"R0.00"));
        assert_eq!(page_breaks(&ops), 0);
    }

    #[test]
    fn short_documents_stay_on_one_page() {
        let doc = Document::new(DocKind::Invoice);
        assert_eq!(page_breaks(&layout(&doc)), 0);
    }

    #[test]
    fn long_item_lists_break_onto_new_pages() {
        let mut doc = Document::new(DocKind::Invoice);
        doc.billing_mut().unwrap().items = (0..60)
            .map(|i| LineItem::new(format!("Item {i}"), 10.0, 1.0))
            .collect();
        let ops = layout(&doc);
        assert!(page_breaks(&ops) >= 1);
        // Every laid-out row stays inside the break threshold.
        for op in &ops {
            if let DrawOp::Text { y, .. } = op {
                assert!(*y <= PAGE_BREAK_Y + ITEM_ROW_STEP, "row escaped the page: y={y}");
            }
        }
    }

    #[test]
    fn receipt_layout_is_single_fixed_page() {
        let mut doc = Document::new(DocKind::Receipt);
        doc.number = "RCP-001".to_string();
        if let crate::document::Detail::Receipt(detail) = &mut doc.detail {
            detail.customer_name = "John Doe".to_string();
            detail.amount = "750".to_string();
        }
        let ops = layout(&doc);
        assert_eq!(page_breaks(&ops), 0);
        let texts = texts(&ops);
        assert!(texts.contains(&"RECEIPT"));
        assert!(texts.contains(&"R 750.00"));
        assert!(texts.contains(&"Customer Signature"));
        assert!(texts.contains(&"Authorized Signature"));
        // No logo op on receipts.
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Logo { .. })));
    }

    #[test]
    fn billing_layout_places_the_logo() {
        let doc = Document::new(DocKind::Invoice);
        assert!(layout(&doc).iter().any(|op| matches!(op, DrawOp::Logo { .. })));
    }
}
