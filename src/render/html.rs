//! Markup renderer: one self-contained printable HTML document per kind.
//!
//! Pure function of the [`Document`]; every figure comes from the same
//! calculator the drawing-command renderer uses, so the two outputs always
//! agree on totals and conditional rows.

use crate::company;
use crate::document::calc::format_money;
use crate::document::{Billing, Detail, Document, ReceiptDetail};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn company_details_html() -> String {
    format!(
        "{}<br>\n{}<br>\n{}<br>\n{}<br>\n{}",
        company::ADDRESS_LINES[0],
        company::ADDRESS_LINES[1],
        company::ADDRESS_LINES[2],
        company::PHONE,
        company::EMAIL,
    )
}

fn item_rows_html(billing: &Billing) -> String {
    billing
        .items
        .iter()
        .map(|item| {
            format!(
                r#"            <tr>
              <td>{}</td>
              <td class="amount">{}</td>
              <td class="amount">{}</td>
              <td class="amount">{}</td>
            </tr>
"#,
                escape(&item.description),
                format_money(item.rate),
                item.qty,
                format_money(item.amount),
            )
        })
        .collect()
}

/// Totals rows shared by invoice and quotation. The subtotal and discount
/// rows only exist when a discount applies; with no discount the total alone
/// carries the figure.
fn totals_rows_html(billing: &Billing) -> String {
    if billing.discount > 0.0 {
        format!(
            r#"            <tr>
              <td>SUBTOTAL</td>
              <td class="amount">{}</td>
            </tr>
            <tr>
              <td>DISCOUNT</td>
              <td class="amount">-{}</td>
            </tr>
"#,
            format_money(billing.subtotal()),
            format_money(billing.discount),
        )
    } else {
        String::new()
    }
}

const SHARED_STYLE: &str = r#"          body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
          .header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 30px; }
          .company-name { font-size: 24px; font-weight: bold; margin: 0; color: #1e3a8a; }
          .company-details { color: #666; margin-top: 5px; }
          .doc-info { text-align: right; }
          .doc-title { font-size: 20px; font-weight: bold; margin-bottom: 10px; }
          .client-section { margin: 30px 0; }
          .party-label { font-weight: bold; margin-bottom: 10px; }
          table { width: 100%; border-collapse: collapse; margin: 20px 0; }
          th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
          th { background-color: #f8f9fa; font-weight: bold; }
          .amount { text-align: right; }
          .totals { margin-top: 20px; }
          .totals table { width: 300px; margin-left: auto; }
          .total-row { font-weight: bold; font-size: 18px; }
          .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; }
          .footer-text { color: #666; font-size: 14px; }
          .tagline { text-align: center; margin-top: 30px; font-weight: bold; }
"#;

fn payment_footer_html() -> String {
    format!(
        "Registration Number {}<br>\nPayment Details<br>\nAccount Name: {}<br>\nBank: {}<br>\nAccount number: {}",
        company::REGISTRATION_NUMBER,
        company::BANK_ACCOUNT_NAME,
        company::BANK_NAME,
        company::BANK_ACCOUNT_NUMBER,
    )
}

fn render_invoice(doc: &Document, due: &str, billing: &Billing) -> String {
    let total = billing.total();
    let client = if billing.client_name.is_empty() {
        "Client".to_string()
    } else {
        escape(&billing.client_name)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Invoice {number}</title>
  <style>
{style}          .balance-due {{ background-color: #f8f9fa; padding: 15px; text-align: center; font-size: 20px; font-weight: bold; margin: 20px 0; }}
  </style>
</head>
<body>
  <div class="header">
    <div>
      <h1 class="company-name">{company}</h1>
      <div class="company-details">
        {company_details}
      </div>
    </div>
    <div class="doc-info">
      <div class="doc-title">INVOICE<br>{number}</div>
      <div style="margin-top: 20px;"><strong>DATE</strong><br>{date}</div>
      <div style="margin-top: 15px;"><strong>DUE</strong><br>{due}</div>
      <div style="margin-top: 15px;"><strong>BALANCE DUE</strong><br>{code} {total}</div>
    </div>
  </div>

  <div class="client-section">
    <div class="party-label">BILL TO</div>
    <div>{client}</div>
  </div>

  <table>
    <thead>
      <tr>
        <th>DESCRIPTION</th>
        <th class="amount">RATE</th>
        <th class="amount">QTY</th>
        <th class="amount">AMOUNT</th>
      </tr>
    </thead>
    <tbody>
{item_rows}    </tbody>
  </table>

  <div class="totals">
    <table>
{totals_rows}            <tr>
        <td>TOTAL</td>
        <td class="amount">{total}</td>
      </tr>
      <tr class="total-row">
        <td>BALANCE DUE</td>
        <td class="amount">{code} {total}</td>
      </tr>
    </table>
  </div>

  <div class="footer">
    <div class="footer-text">
      {payment_footer}
    </div>
    <div class="tagline">{tagline}</div>
  </div>
</body>
</html>
"#,
        number = escape(&doc.number),
        style = SHARED_STYLE,
        company = company::NAME,
        company_details = company_details_html(),
        date = doc.issue_date_display(),
        due = escape(due),
        code = company::CURRENCY_CODE,
        total = format_money(total),
        client = client,
        item_rows = item_rows_html(billing),
        totals_rows = totals_rows_html(billing),
        payment_footer = payment_footer_html(),
        tagline = company::TAGLINE,
    )
}

fn render_quotation(
    doc: &Document,
    valid_until: chrono::NaiveDate,
    billing: &Billing,
) -> String {
    let total = billing.total();
    let valid_display = valid_until.format("%B %d, %Y").to_string();
    let client = if billing.client_name.is_empty() {
        "Prospective Client".to_string()
    } else {
        escape(&billing.client_name)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Quotation {number}</title>
  <style>
{style}          .doc-title {{ color: #2563eb; }}
          .total-row {{ color: #2563eb; }}
          .total-amount {{ background-color: #eff6ff; padding: 15px; text-align: center; font-size: 20px; font-weight: bold; margin: 20px 0; color: #2563eb; }}
          .validity {{ background-color: #fef3c7; padding: 10px; border-radius: 5px; margin: 20px 0; }}
  </style>
</head>
<body>
  <div class="header">
    <div>
      <h1 class="company-name">{company}</h1>
      <div class="company-details">
        {company_details}
      </div>
    </div>
    <div class="doc-info">
      <div class="doc-title">QUOTATION<br>{number}</div>
      <div style="margin-top: 20px;"><strong>DATE</strong><br>{date}</div>
      <div style="margin-top: 15px;"><strong>VALID UNTIL</strong><br>{valid}</div>
    </div>
  </div>

  <div class="client-section">
    <div class="party-label">QUOTE TO</div>
    <div>{client}</div>
  </div>

  <div class="validity">
    <strong>Note:</strong> This quotation is valid until {valid}. Prices may be subject to change after this date.
  </div>

  <table>
    <thead>
      <tr>
        <th>DESCRIPTION</th>
        <th class="amount">RATE</th>
        <th class="amount">QTY</th>
        <th class="amount">AMOUNT</th>
      </tr>
    </thead>
    <tbody>
{item_rows}    </tbody>
  </table>

  <div class="totals">
    <table>
{totals_rows}            <tr class="total-row">
        <td>TOTAL QUOTE AMOUNT</td>
        <td class="amount">{code} {total}</td>
      </tr>
    </table>
  </div>

  <div class="total-amount">Total Quotation Amount: {code} {total}</div>

  <div class="footer">
    <div class="footer-text">
      <strong>Terms &amp; Conditions:</strong><br>
      &bull; This quote is valid for 30 days from the date of issue<br>
      &bull; Payment terms: As agreed upon acceptance<br>
      &bull; All prices are inclusive of applicable taxes<br><br>
      {payment_footer}
    </div>
    <div class="tagline" style="color: #2563eb;">{tagline}</div>
  </div>
</body>
</html>
"#,
        number = escape(&doc.number),
        style = SHARED_STYLE,
        company = company::NAME,
        company_details = company_details_html(),
        date = doc.issue_date_display(),
        valid = valid_display,
        code = company::CURRENCY_CODE,
        total = format_money(total),
        client = client,
        item_rows = item_rows_html(billing),
        totals_rows = totals_rows_html(billing),
        payment_footer = payment_footer_html(),
        tagline = company::TAGLINE,
    )
}

fn render_receipt(doc: &Document, detail: &ReceiptDetail) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Receipt {number}</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 0; padding: 20px; }}
    .receipt-container {{ max-width: 800px; margin: 0 auto; border: 2px solid #1e40af; padding: 30px; }}
    .header {{ text-align: center; margin-bottom: 30px; border-bottom: 3px solid #1e40af; padding-bottom: 20px; }}
    .company-name {{ color: #1e40af; font-size: 28px; font-weight: bold; margin: 0 0 10px 0; }}
    .company-details {{ color: #666; font-size: 12px; line-height: 1.6; }}
    .receipt-title {{ text-align: center; font-size: 24px; font-weight: bold; color: #1e40af; margin: 20px 0; }}
    .receipt-info {{ display: flex; justify-content: space-between; margin: 20px 0; padding: 15px; background: #f8fafc; }}
    .info-label {{ font-weight: bold; color: #333; font-size: 12px; }}
    .info-value {{ color: #666; font-size: 12px; margin-top: 5px; }}
    .customer-section {{ margin: 20px 0; padding: 15px; background: #f8fafc; }}
    .section-title {{ font-weight: bold; color: #1e40af; font-size: 14px; margin-bottom: 10px; }}
    .customer-details {{ color: #666; font-size: 12px; line-height: 1.8; }}
    .payment-details {{ margin: 20px 0; padding: 20px; background: #f8fafc; }}
    .payment-row {{ display: flex; justify-content: space-between; margin: 10px 0; padding: 10px 0; }}
    .payment-label {{ font-weight: bold; color: #333; }}
    .payment-value {{ color: #666; }}
    .total-row {{ border-top: 2px solid #1e40af; padding-top: 15px; margin-top: 15px; }}
    .total-amount {{ font-size: 20px; font-weight: bold; color: #1e40af; }}
    .footer {{ margin-top: 40px; padding-top: 20px; border-top: 2px solid #1e40af; text-align: center; color: #666; font-size: 11px; }}
    .signature-section {{ margin-top: 50px; display: flex; justify-content: space-between; }}
    .signature-box {{ text-align: center; }}
    .signature-line {{ border-top: 2px solid #333; width: 200px; margin: 0 auto 10px; }}
    .signature-label {{ color: #666; font-size: 12px; }}
  </style>
</head>
<body>
  <div class="receipt-container">
    <div class="header">
      <h1 class="company-name">{company}</h1>
      <div class="company-details">
        {company_details}
      </div>
    </div>

    <div class="receipt-title">RECEIPT</div>

    <div class="receipt-info">
      <div>
        <div class="info-label">Receipt Number:</div>
        <div class="info-value">{number}</div>
      </div>
      <div>
        <div class="info-label">Date:</div>
        <div class="info-value">{date}</div>
      </div>
    </div>

    <div class="customer-section">
      <div class="section-title">RECEIVED FROM:</div>
      <div class="customer-details">
        <strong>{name}</strong><br>
        {address}<br>
        {phone}<br>
        {email}
      </div>
    </div>

    <div class="payment-details">
      <div class="section-title">PAYMENT DETAILS</div>
      <div class="payment-row">
        <span class="payment-label">Description:</span>
        <span class="payment-value">{description}</span>
      </div>
      <div class="payment-row">
        <span class="payment-label">Payment Method:</span>
        <span class="payment-value">{method}</span>
      </div>
      <div class="payment-row total-row">
        <span class="payment-label">TOTAL AMOUNT RECEIVED:</span>
        <span class="total-amount">{symbol} {amount:.2}</span>
      </div>
    </div>

    <div class="signature-section">
      <div class="signature-box">
        <div class="signature-line"></div>
        <div class="signature-label">Customer Signature</div>
      </div>
      <div class="signature-box">
        <div class="signature-line"></div>
        <div class="signature-label">Authorized Signature</div>
      </div>
    </div>

    <div class="footer">
      <p><strong>Thank you for your payment</strong></p>
      <p>This is an official receipt from Alex's Funeral Services</p>
      <p>Registration Number: {registration}</p>
    </div>
  </div>
</body>
</html>
"#,
        number = escape(&doc.number),
        company = company::NAME,
        company_details = company_details_html(),
        date = doc.issue_date_display(),
        name = escape(&detail.customer_name),
        address = escape(&detail.customer_address),
        phone = escape(&detail.customer_phone),
        email = escape(&detail.customer_email),
        description = escape(&detail.description),
        method = detail.payment_method.as_str(),
        symbol = company::CURRENCY_SYMBOL,
        amount = detail.amount_value(),
        registration = company::REGISTRATION_NUMBER,
    )
}

/// Render the document as a standalone HTML page ready for browser print.
pub fn render_html(doc: &Document) -> String {
    match &doc.detail {
        Detail::Invoice { due, billing } => render_invoice(doc, due, billing),
        Detail::Quotation {
            valid_until,
            billing,
        } => render_quotation(doc, *valid_until, billing),
        Detail::Receipt(detail) => render_receipt(doc, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocKind, LineItem};

    fn invoice_fixture(discount: f64) -> Document {
        let mut doc = Document::new(DocKind::Invoice);
        doc.number = "INV0001".to_string();
        let billing = doc.billing_mut().unwrap();
        billing.discount = discount;
        doc
    }

    #[test]
    fn invoice_total_renders_with_currency_glyph() {
        let html = render_html(&invoice_fixture(0.0));
        assert!(html.contains("R16000.00"));
        assert!(html.contains("ZAR R16000.00"));
        assert!(html.contains("BILL TO"));
        // Empty client name falls back to the placeholder.
        assert!(html.contains("<div>Client</div>"));
    }

    #[test]
    fn zero_discount_suppresses_discount_row() {
        let html = render_html(&invoice_fixture(0.0));
        assert!(!html.contains("DISCOUNT"));
        assert!(!html.contains("SUBTOTAL"));
    }

    #[test]
    fn positive_discount_shows_negative_figure() {
        let html = render_html(&invoice_fixture(500.0));
        assert!(html.contains("DISCOUNT"));
        assert!(html.contains("-R500.00"));
        assert!(html.contains("R15500.00"));
        assert!(html.contains("R16000.00")); // subtotal row
    }

    #[test]
    fn empty_item_list_renders_no_rows() {
        let mut doc = invoice_fixture(0.0);
        doc.billing_mut().unwrap().items.clear();
        let html = render_html(&doc);
        assert!(!html.contains("<td>Transport</td>"));
        assert!(html.contains("R0.00"));
    }

    #[test]
    fn quotation_renders_validity_notice_and_discount() {
        let mut doc = Document::new(DocKind::Quotation);
        doc.number = "QUO0042".to_string();
        doc.billing_mut().unwrap().discount = 500.0;
        let html = render_html(&doc);
        assert!(html.contains("QUOTE TO"));
        assert!(html.contains("Prospective Client"));
        assert!(html.contains("This quotation is valid until"));
        assert!(html.contains("-R500.00"));
        assert!(html.contains("ZAR R15500.00"));
    }

    #[test]
    fn receipt_renders_signature_block_and_amount() {
        let mut doc = Document::new(DocKind::Receipt);
        doc.number = "RCP-001".to_string();
        if let Detail::Receipt(detail) = &mut doc.detail {
            detail.customer_name = "John Doe".to_string();
            detail.amount = "750".to_string();
        }
        let html = render_html(&doc);
        assert!(html.contains("RECEIVED FROM:"));
        assert!(html.contains("John Doe"));
        assert!(html.contains("R 750.00"));
        assert!(html.contains("Customer Signature"));
        assert!(html.contains("Authorized Signature"));
    }

    #[test]
    fn markup_escapes_reserved_characters() {
        let mut doc = invoice_fixture(0.0);
        doc.billing_mut().unwrap().client_name = "Smith & Sons <Pty>".to_string();
        let html = render_html(&doc);
        assert!(html.contains("Smith &amp; Sons &lt;Pty&gt;"));
    }

    #[test]
    fn items_with_quantities_render_two_decimal_amounts() {
        let mut doc = invoice_fixture(0.0);
        doc.billing_mut().unwrap().items = vec![LineItem::new("Flowers", 149.99, 3.0)];
        let html = render_html(&doc);
        assert!(html.contains("R449.97"));
    }
}
