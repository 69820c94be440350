use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use afs::document::calc::{self, format_money, ItemField};
use afs::document::{Detail, DocKind, Document, PaymentMethod};
use afs::error::{AfsError, Result};
use afs::export::{export, Delivery};
use afs::session::{self, Session};
use afs::store;

#[derive(Parser)]
#[command(name = "afs")]
#[command(version, about = "Invoice, quotation and receipt generator for Alex's Funeral Services", long_about = None)]
struct Cli {
    /// Path to data directory (default: ~/.afs or XDG data)
    #[arg(short = 'C', long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the admin surface
    Login {
        /// Admin password
        #[arg(long)]
        password: String,
    },

    /// Log out and drop the session
    Logout,

    /// Show session state and current drafts
    Status,

    /// Work on the invoice draft
    Invoice {
        #[command(subcommand)]
        command: DraftCommands,
    },

    /// Work on the receipt draft
    Receipt {
        #[command(subcommand)]
        command: ReceiptCommands,
    },

    /// Generate a one-shot quotation
    Quotation {
        #[command(subcommand)]
        command: QuotationCommands,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Show the draft
    Show,

    /// Set header fields on the draft
    Set {
        /// Document number (e.g. INV0042)
        #[arg(long)]
        number: Option<String>,

        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Due terms (free text, e.g. "On Receipt")
        #[arg(long)]
        due: Option<String>,

        /// Client name
        #[arg(long)]
        client: Option<String>,

        /// Discount amount
        #[arg(long)]
        discount: Option<f64>,
    },

    /// Append a blank line item
    AddItem,

    /// Edit one line item (1-based index from 'show')
    SetItem {
        index: usize,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        rate: Option<f64>,

        #[arg(long)]
        qty: Option<f64>,

        /// Set the amount directly, bypassing rate x qty
        #[arg(long)]
        amount: Option<f64>,
    },

    /// Remove one line item (1-based index from 'show')
    RemoveItem { index: usize },

    /// Export the draft as a PDF
    Export {
        /// Custom output file path (default: output/Invoice-XXXX.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the draft and open it for printing
    Print,

    /// Discard the draft and start over
    Clear,
}

#[derive(Subcommand)]
enum ReceiptCommands {
    /// Show the draft
    Show,

    /// Set receipt fields on the draft
    Set {
        /// Receipt number (e.g. RCP-001)
        #[arg(long)]
        number: Option<String>,

        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Customer name
        #[arg(long)]
        customer: Option<String>,

        /// Customer address
        #[arg(long)]
        address: Option<String>,

        /// Customer phone
        #[arg(long)]
        phone: Option<String>,

        /// Customer email
        #[arg(long)]
        email: Option<String>,

        /// Payment description
        #[arg(long)]
        description: Option<String>,

        /// Amount received (free text, parsed on render)
        #[arg(long)]
        amount: Option<String>,

        /// Payment method (cash, bank-transfer, card, cheque)
        #[arg(long)]
        method: Option<String>,
    },

    /// Export the draft as a PDF
    Export {
        /// Custom output file path (default: output/Receipt-XXXX.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the draft and open it for printing
    Print,

    /// Discard the draft and start over
    Clear,
}

#[derive(Subcommand)]
enum QuotationCommands {
    /// Generate a quotation PDF from the command line
    Generate {
        /// Prospective client name
        #[arg(short, long)]
        client: String,

        /// Line items in format "DESCRIPTION:RATE:QTY" (can be repeated)
        #[arg(short, long, value_name = "DESC:RATE:QTY")]
        item: Vec<String>,

        /// Discount amount
        #[arg(long)]
        discount: Option<f64>,

        /// Quotation number (default: random QUOXXXX)
        #[arg(long)]
        number: Option<String>,

        /// Issue date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Validity date (YYYY-MM-DD, default: 30 days after issue)
        #[arg(long)]
        valid_until: Option<String>,

        /// Custom output file path (default: output/Quotation-XXXX.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also open the rendered quotation for printing
        #[arg(long)]
        print: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(p) => p,
        None => store::data_dir()?,
    };

    match cli.command {
        Commands::Login { password } => cmd_login(&data_dir, &password),
        Commands::Logout => cmd_logout(&data_dir),
        command => {
            Session::load(&data_dir).require()?;
            match command {
                Commands::Status => cmd_status(&data_dir),
                Commands::Invoice { command } => run_draft(&data_dir, command),
                Commands::Receipt { command } => run_receipt(&data_dir, command),
                Commands::Quotation {
                    command:
                        QuotationCommands::Generate {
                            client,
                            item,
                            discount,
                            number,
                            date,
                            valid_until,
                            output,
                            print,
                        },
                } => cmd_quotation_generate(
                    &data_dir,
                    &client,
                    &item,
                    discount,
                    number,
                    date,
                    valid_until,
                    output,
                    print,
                ),
                Commands::Login { .. } | Commands::Logout => unreachable!(),
            }
        }
    }
}

fn run_draft(data_dir: &PathBuf, command: DraftCommands) -> Result<()> {
    match command {
        DraftCommands::Show => cmd_show(data_dir),
        DraftCommands::Set {
            number,
            date,
            due,
            client,
            discount,
        } => cmd_set(data_dir, number, date, due, client, discount),
        DraftCommands::AddItem => cmd_add_item(data_dir),
        DraftCommands::SetItem {
            index,
            description,
            rate,
            qty,
            amount,
        } => cmd_set_item(data_dir, index, description, rate, qty, amount),
        DraftCommands::RemoveItem { index } => cmd_remove_item(data_dir, index),
        DraftCommands::Export { output } => cmd_export(data_dir, DocKind::Invoice, output),
        DraftCommands::Print => cmd_print(data_dir, DocKind::Invoice),
        DraftCommands::Clear => cmd_clear(data_dir, DocKind::Invoice),
    }
}

fn run_receipt(data_dir: &PathBuf, command: ReceiptCommands) -> Result<()> {
    match command {
        ReceiptCommands::Show => cmd_receipt_show(data_dir),
        ReceiptCommands::Set {
            number,
            date,
            customer,
            address,
            phone,
            email,
            description,
            amount,
            method,
        } => cmd_receipt_set(
            data_dir,
            number,
            date,
            customer,
            address,
            phone,
            email,
            description,
            amount,
            method,
        ),
        ReceiptCommands::Export { output } => cmd_export(data_dir, DocKind::Receipt, output),
        ReceiptCommands::Print => cmd_print(data_dir, DocKind::Receipt),
        ReceiptCommands::Clear => cmd_clear(data_dir, DocKind::Receipt),
    }
}

#[derive(Tabled)]
struct DraftRow {
    #[tabled(rename = "DOCUMENT")]
    document: String,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "QTY")]
    qty: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn cmd_login(data_dir: &PathBuf, password: &str) -> Result<()> {
    session::login(data_dir, password)?;
    println!("Logged in.");
    Ok(())
}

fn cmd_logout(data_dir: &PathBuf) -> Result<()> {
    session::logout(data_dir)?;
    println!("Logged out.");
    Ok(())
}

/// Show session state and a summary of both drafts
fn cmd_status(data_dir: &PathBuf) -> Result<()> {
    let invoice = store::load_draft(data_dir, DocKind::Invoice);
    let receipt = store::load_draft(data_dir, DocKind::Receipt);

    let rows = vec![
        DraftRow {
            document: invoice.kind().to_string(),
            number: invoice.number.clone(),
            date: invoice.issue_date_display(),
            total: format_money(invoice.total()),
        },
        DraftRow {
            document: receipt.kind().to_string(),
            number: if receipt.number.is_empty() {
                "(unset)".to_string()
            } else {
                receipt.number.clone()
            },
            date: receipt.issue_date_display(),
            total: format_money(receipt.total()),
        },
    ];

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("Data directory: {}", data_dir.display());

    Ok(())
}

/// Show the invoice draft
fn cmd_show(data_dir: &PathBuf) -> Result<()> {
    let doc = store::load_draft(data_dir, DocKind::Invoice);
    let Detail::Invoice { due, billing } = &doc.detail else {
        unreachable!()
    };

    println!("{} {}", doc.kind(), doc.number);
    println!("Date:     {}", doc.issue_date_display());
    println!("Due:      {due}");
    println!(
        "Bill to:  {}",
        if billing.client_name.is_empty() {
            "(unset)"
        } else {
            &billing.client_name
        }
    );
    println!();

    let rows: Vec<ItemRow> = billing
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| ItemRow {
            index: i + 1,
            description: item.description.clone(),
            rate: format_money(item.rate),
            qty: item.qty.to_string(),
            amount: format_money(item.amount),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();

    if billing.discount > 0.0 {
        println!("Subtotal: {}", format_money(billing.subtotal()));
        println!("Discount: -{}", format_money(billing.discount));
    }
    println!("Total:    {}", format_money(billing.total()));

    Ok(())
}

fn parse_date(input: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AfsError::InvalidDate(input.to_string()))
}

/// Set invoice header fields
fn cmd_set(
    data_dir: &PathBuf,
    number: Option<String>,
    date: Option<String>,
    due: Option<String>,
    client: Option<String>,
    discount: Option<f64>,
) -> Result<()> {
    let mut doc = store::load_draft(data_dir, DocKind::Invoice);

    if let Some(number) = number {
        doc.number = number;
    }
    if let Some(date) = date {
        doc.issue_date = parse_date(&date)?;
    }
    let Detail::Invoice { due: draft_due, billing } = &mut doc.detail else {
        unreachable!()
    };
    if let Some(due) = due {
        *draft_due = due;
    }
    if let Some(client) = client {
        billing.client_name = client;
    }
    if let Some(discount) = discount {
        billing.discount = discount;
    }

    store::save_draft(data_dir, &doc)?;
    println!("Updated {} {}", doc.kind(), doc.number);
    println!("  Total: {}", format_money(doc.total()));
    Ok(())
}

fn cmd_add_item(data_dir: &PathBuf) -> Result<()> {
    let mut doc = store::load_draft(data_dir, DocKind::Invoice);
    let Some(billing) = doc.billing_mut() else {
        unreachable!()
    };
    billing.items = calc::add_item(&billing.items);
    let count = billing.items.len();
    store::save_draft(data_dir, &doc)?;
    println!("Added item {count}. Fill it in with 'invoice set-item {count}'.");
    Ok(())
}

fn check_index(index: usize, count: usize) -> Result<usize> {
    if index == 0 || index > count {
        return Err(AfsError::InvalidItemIndex { index, count });
    }
    Ok(index - 1)
}

fn cmd_set_item(
    data_dir: &PathBuf,
    index: usize,
    description: Option<String>,
    rate: Option<f64>,
    qty: Option<f64>,
    amount: Option<f64>,
) -> Result<()> {
    let mut doc = store::load_draft(data_dir, DocKind::Invoice);
    let Some(billing) = doc.billing_mut() else {
        unreachable!()
    };
    let idx = check_index(index, billing.items.len())?;

    let mut items = billing.items.clone();
    if let Some(description) = description {
        items = calc::set_item_field(&items, idx, ItemField::Description(description));
    }
    if let Some(rate) = rate {
        items = calc::set_item_field(&items, idx, ItemField::Rate(rate));
    }
    if let Some(qty) = qty {
        items = calc::set_item_field(&items, idx, ItemField::Qty(qty));
    }
    if let Some(amount) = amount {
        items = calc::set_item_field(&items, idx, ItemField::Amount(amount));
    }
    billing.items = items;

    store::save_draft(data_dir, &doc)?;
    println!("Updated item {index}.");
    println!("  Total: {}", format_money(doc.total()));
    Ok(())
}

fn cmd_remove_item(data_dir: &PathBuf, index: usize) -> Result<()> {
    let mut doc = store::load_draft(data_dir, DocKind::Invoice);
    let Some(billing) = doc.billing_mut() else {
        unreachable!()
    };
    let idx = check_index(index, billing.items.len())?;
    billing.items = calc::remove_item(&billing.items, idx);
    store::save_draft(data_dir, &doc)?;
    println!("Removed item {index}.");
    println!("  Total: {}", format_money(doc.total()));
    Ok(())
}

/// Show the receipt draft
fn cmd_receipt_show(data_dir: &PathBuf) -> Result<()> {
    let doc = store::load_draft(data_dir, DocKind::Receipt);
    let Detail::Receipt(detail) = &doc.detail else {
        unreachable!()
    };

    let unset = |s: &str| {
        if s.is_empty() {
            "(unset)".to_string()
        } else {
            s.to_string()
        }
    };

    println!("{} {}", doc.kind(), unset(&doc.number));
    println!("Date:           {}", doc.issue_date_display());
    println!("Received from:  {}", unset(&detail.customer_name));
    println!("Address:        {}", unset(&detail.customer_address));
    println!("Phone:          {}", unset(&detail.customer_phone));
    println!("Email:          {}", unset(&detail.customer_email));
    println!("Description:    {}", unset(&detail.description));
    println!("Method:         {}", detail.payment_method.as_str());
    println!("Amount:         {}", unset(&detail.amount));
    println!(
        "Parsed amount:  {} {:.2}",
        afs::company::CURRENCY_SYMBOL,
        detail.amount_value()
    );

    Ok(())
}

fn parse_payment_method(input: &str) -> Result<PaymentMethod> {
    match input.to_lowercase().as_str() {
        "cash" => Ok(PaymentMethod::Cash),
        "bank-transfer" | "bank transfer" => Ok(PaymentMethod::BankTransfer),
        "card" => Ok(PaymentMethod::Card),
        "cheque" => Ok(PaymentMethod::Cheque),
        _ => Err(AfsError::InvalidPaymentMethod(input.to_string())),
    }
}

/// Set receipt fields
#[allow(clippy::too_many_arguments)]
fn cmd_receipt_set(
    data_dir: &PathBuf,
    number: Option<String>,
    date: Option<String>,
    customer: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    description: Option<String>,
    amount: Option<String>,
    method: Option<String>,
) -> Result<()> {
    let mut doc = store::load_draft(data_dir, DocKind::Receipt);

    if let Some(number) = number {
        doc.number = number;
    }
    if let Some(date) = date {
        doc.issue_date = parse_date(&date)?;
    }
    let Detail::Receipt(detail) = &mut doc.detail else {
        unreachable!()
    };
    if let Some(customer) = customer {
        detail.customer_name = customer;
    }
    if let Some(address) = address {
        detail.customer_address = address;
    }
    if let Some(phone) = phone {
        detail.customer_phone = phone;
    }
    if let Some(email) = email {
        detail.customer_email = email;
    }
    if let Some(description) = description {
        detail.description = description;
    }
    if let Some(amount) = amount {
        detail.amount = amount;
    }
    if let Some(method) = method {
        detail.payment_method = parse_payment_method(&method)?;
    }

    store::save_draft(data_dir, &doc)?;
    println!("Updated {} {}", doc.kind(), doc.number);
    Ok(())
}

fn cmd_export(data_dir: &PathBuf, kind: DocKind, output: Option<PathBuf>) -> Result<()> {
    let doc = store::load_draft(data_dir, kind);
    let path = export(&doc, data_dir, Delivery::Pdf { output })?;
    println!("Saved: {}", path.display());
    Ok(())
}

fn cmd_print(data_dir: &PathBuf, kind: DocKind) -> Result<()> {
    let doc = store::load_draft(data_dir, kind);
    let path = export(&doc, data_dir, Delivery::Print)?;
    println!("Opened {} in your viewer. Print from there.", path.display());
    Ok(())
}

fn cmd_clear(data_dir: &PathBuf, kind: DocKind) -> Result<()> {
    store::clear_draft(data_dir, kind)?;
    println!("Cleared the {} draft.", kind.to_string().to_lowercase());
    Ok(())
}

/// Parse one "DESCRIPTION:RATE:QTY" argument. The description may itself
/// contain colons, so the split runs from the right.
fn parse_item(input: &str) -> Result<afs::document::LineItem> {
    let mut parts = input.rsplitn(3, ':');
    let qty_part = parts.next();
    let rate_part = parts.next();
    let desc_part = parts.next();
    let (Some(qty_part), Some(rate_part), Some(desc_part)) = (qty_part, rate_part, desc_part)
    else {
        return Err(AfsError::InvalidItemFormat(input.to_string()));
    };

    let rate: f64 = rate_part.parse().map_err(|_| AfsError::InvalidRate {
        item: desc_part.to_string(),
        rate: rate_part.to_string(),
    })?;
    let qty: f64 = qty_part.parse().map_err(|_| AfsError::InvalidQuantity {
        item: desc_part.to_string(),
        qty: qty_part.to_string(),
        reason: "not a number".to_string(),
    })?;
    if !qty.is_finite() || qty <= 0.0 {
        return Err(AfsError::InvalidQuantity {
            item: desc_part.to_string(),
            qty: qty_part.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(afs::document::LineItem::new(desc_part.to_string(), rate, qty))
}

/// Generate a quotation in one shot
#[allow(clippy::too_many_arguments)]
fn cmd_quotation_generate(
    data_dir: &PathBuf,
    client: &str,
    items_input: &[String],
    discount: Option<f64>,
    number: Option<String>,
    date: Option<String>,
    valid_until: Option<String>,
    output: Option<PathBuf>,
    print: bool,
) -> Result<()> {
    if items_input.is_empty() {
        return Err(AfsError::NoItems);
    }

    let mut doc = Document::new(DocKind::Quotation);
    if let Some(number) = number {
        doc.number = number;
    }
    if let Some(date) = date {
        doc.issue_date = parse_date(&date)?;
    }
    let Detail::Quotation {
        valid_until: draft_valid_until,
        billing,
    } = &mut doc.detail
    else {
        unreachable!()
    };
    *draft_valid_until = match valid_until {
        Some(input) => parse_date(&input)?,
        None => doc.issue_date + chrono::Duration::days(30),
    };

    billing.client_name = client.to_string();
    billing.discount = discount.unwrap_or(0.0);
    billing.items = items_input
        .iter()
        .map(|input| parse_item(input))
        .collect::<Result<Vec<_>>>()?;

    let path = export(&doc, data_dir, Delivery::Pdf { output })?;
    println!("Generated {} {}", doc.kind(), doc.number);
    println!("  Client: {client}");
    println!("  Total:  {}", format_money(doc.total()));
    println!("  Saved:  {}", path.display());

    if print {
        let html_path = export(&doc, data_dir, Delivery::Print)?;
        println!("  Opened: {}", html_path.display());
    }

    Ok(())
}
