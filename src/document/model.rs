use chrono::{Duration, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::document::calc;

/// A single billable row on an invoice or quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub rate: f64,
    pub qty: f64,
    pub amount: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, rate: f64, qty: f64) -> Self {
        Self {
            description: description.into(),
            rate,
            qty,
            amount: calc::round2(rate * qty),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocKind {
    Invoice,
    Quotation,
    Receipt,
}

impl DocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocKind::Invoice => "Invoice",
            DocKind::Quotation => "Quotation",
            DocKind::Receipt => "Receipt",
        }
    }
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared fields of the two line-item document kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub client_name: String,
    pub items: Vec<LineItem>,
    pub discount: f64,
}

impl Billing {
    pub fn subtotal(&self) -> f64 {
        calc::subtotal(&self.items)
    }

    pub fn total(&self) -> f64 {
        calc::total(&self.items, self.discount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cheque => "Cheque",
        }
    }
}

/// Receipt-specific fields. The amount stays free text so the operator can
/// leave it blank while drafting; rendering parses it and falls back to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDetail {
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub description: String,
    pub amount: String,
    pub payment_method: PaymentMethod,
}

impl ReceiptDetail {
    pub fn amount_value(&self) -> f64 {
        self.amount.trim().parse().unwrap_or(0.0)
    }
}

/// Kind-specific part of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Detail {
    /// `due` is free text ("On Receipt", "7 days", an actual date...).
    Invoice { due: String, billing: Billing },
    Quotation {
        valid_until: NaiveDate,
        billing: Billing,
    },
    Receipt(ReceiptDetail),
}

/// One billing document: an invoice, quotation, or receipt.
///
/// The record is replaced wholesale on every field edit; nothing outside the
/// current editing session holds a reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub number: String,
    pub issue_date: NaiveDate,
    pub detail: Detail,
}

fn seed_items() -> Vec<LineItem> {
    vec![
        LineItem::new("Transport", 13500.0, 1.0),
        LineItem::new("Coffin", 2500.0, 1.0),
    ]
}

fn random_number(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10000);
    format!("{prefix}{suffix:04}")
}

impl Document {
    /// A fresh draft with the defaults the operator starts from.
    pub fn new(kind: DocKind) -> Self {
        let today = Local::now().date_naive();
        match kind {
            DocKind::Invoice => Self {
                number: random_number("INV"),
                issue_date: today,
                detail: Detail::Invoice {
                    due: "On Receipt".to_string(),
                    billing: Billing {
                        client_name: String::new(),
                        items: seed_items(),
                        discount: 0.0,
                    },
                },
            },
            DocKind::Quotation => Self {
                number: random_number("QUO"),
                issue_date: today,
                detail: Detail::Quotation {
                    valid_until: today + Duration::days(30),
                    billing: Billing {
                        client_name: String::new(),
                        items: seed_items(),
                        discount: 0.0,
                    },
                },
            },
            DocKind::Receipt => Self {
                number: String::new(),
                issue_date: today,
                detail: Detail::Receipt(ReceiptDetail {
                    customer_name: String::new(),
                    customer_address: String::new(),
                    customer_phone: String::new(),
                    customer_email: String::new(),
                    description: String::new(),
                    amount: String::new(),
                    payment_method: PaymentMethod::Cash,
                }),
            },
        }
    }

    pub fn kind(&self) -> DocKind {
        match self.detail {
            Detail::Invoice { .. } => DocKind::Invoice,
            Detail::Quotation { .. } => DocKind::Quotation,
            Detail::Receipt(_) => DocKind::Receipt,
        }
    }

    pub fn billing(&self) -> Option<&Billing> {
        match &self.detail {
            Detail::Invoice { billing, .. } | Detail::Quotation { billing, .. } => Some(billing),
            Detail::Receipt(_) => None,
        }
    }

    pub fn billing_mut(&mut self) -> Option<&mut Billing> {
        match &mut self.detail {
            Detail::Invoice { billing, .. } | Detail::Quotation { billing, .. } => Some(billing),
            Detail::Receipt(_) => None,
        }
    }

    /// The figure both renderers print as the document total.
    pub fn total(&self) -> f64 {
        match &self.detail {
            Detail::Invoice { billing, .. } | Detail::Quotation { billing, .. } => billing.total(),
            Detail::Receipt(detail) => detail.amount_value(),
        }
    }

    /// Display date, e.g. "June 05, 2026".
    pub fn issue_date_display(&self) -> String {
        self.issue_date.format("%B %d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_defaults_are_seeded() {
        let doc = Document::new(DocKind::Invoice);
        assert!(doc.number.starts_with("INV"));
        assert_eq!(doc.number.len(), 7);
        let billing = doc.billing().unwrap();
        assert_eq!(billing.items.len(), 2);
        assert_eq!(billing.items[0].description, "Transport");
        assert_eq!(billing.items[1].description, "Coffin");
        assert_eq!(billing.subtotal(), 16000.0);
        assert_eq!(doc.total(), 16000.0);
        match &doc.detail {
            Detail::Invoice { due, .. } => assert_eq!(due, "On Receipt"),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn quotation_valid_until_is_thirty_days_out() {
        let doc = Document::new(DocKind::Quotation);
        assert!(doc.number.starts_with("QUO"));
        match doc.detail {
            Detail::Quotation { valid_until, .. } => {
                assert_eq!(valid_until - doc.issue_date, Duration::days(30));
            }
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn receipt_defaults_are_empty() {
        let doc = Document::new(DocKind::Receipt);
        assert!(doc.number.is_empty());
        assert!(doc.billing().is_none());
        match &doc.detail {
            Detail::Receipt(detail) => {
                assert!(detail.customer_name.is_empty());
                assert_eq!(detail.payment_method, PaymentMethod::Cash);
                assert_eq!(detail.amount_value(), 0.0);
            }
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn receipt_amount_parses_with_zero_fallback() {
        let mut doc = Document::new(DocKind::Receipt);
        if let Detail::Receipt(detail) = &mut doc.detail {
            detail.amount = "1500.50".to_string();
        }
        assert_eq!(doc.total(), 1500.50);
        if let Detail::Receipt(detail) = &mut doc.detail {
            detail.amount = "not a number".to_string();
        }
        assert_eq!(doc.total(), 0.0);
    }

    #[test]
    fn document_round_trips_through_json() {
        for kind in [DocKind::Invoice, DocKind::Quotation, DocKind::Receipt] {
            let doc = Document::new(kind);
            let json = serde_json::to_string(&doc).unwrap();
            let back: Document = serde_json::from_str(&json).unwrap();
            assert_eq!(doc, back);
        }
    }
}
