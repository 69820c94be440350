//! Export driver: validate, render, deliver.
//!
//! Every export runs the same three stages. Validation failures leave the
//! filesystem untouched; delivery never mutates the draft it was given.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{Detail, Document};
use crate::error::{AfsError, Result};
use crate::export::pdf::render_pdf;
use crate::render::render_html;

/// How the rendered document leaves the program.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Write a PDF, either to an explicit path or to the output directory.
    Pdf { output: Option<PathBuf> },
    /// Write printable HTML and hand it to the system viewer.
    Print,
}

/// Receipts carry free-text fields the operator must fill in before an
/// export makes sense. Invoices and quotations are always renderable.
fn validate(document: &Document) -> Result<()> {
    if let Detail::Receipt(detail) = &document.detail {
        if document.number.trim().is_empty() {
            return Err(AfsError::MissingField("number"));
        }
        if detail.customer_name.trim().is_empty() {
            return Err(AfsError::MissingField("customer name"));
        }
        if detail.amount.trim().is_empty() {
            return Err(AfsError::MissingField("amount"));
        }
    }
    Ok(())
}

fn output_dir(data_dir: &Path) -> Result<PathBuf> {
    let dir = data_dir.join("output");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn load_logo(data_dir: &Path) -> Option<Vec<u8>> {
    fs::read(data_dir.join("logo.png")).ok()
}

/// Export one document. Returns the path of the file that was written.
pub fn export(document: &Document, data_dir: &Path, delivery: Delivery) -> Result<PathBuf> {
    validate(document)?;
    match delivery {
        Delivery::Pdf { output } => {
            let logo = load_logo(data_dir);
            let bytes = render_pdf(document, logo.as_deref())?;
            let path = match output {
                Some(path) => path,
                None => output_dir(data_dir)?
                    .join(format!("{}-{}.pdf", document.kind(), document.number)),
            };
            fs::write(&path, bytes)?;
            Ok(path)
        }
        Delivery::Print => {
            let html = render_html(document);
            let path = output_dir(data_dir)?
                .join(format!("{}-{}.html", document.kind(), document.number));
            fs::write(&path, html)?;
            open_path(&path)?;
            Ok(path)
        }
    }
}

/// Open a file with the system default viewer. Printing is then triggered
/// by the operator from the viewer.
pub fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let spawned = std::process::Command::new("open").arg(path).spawn();

    #[cfg(target_os = "linux")]
    let spawned = std::process::Command::new("xdg-open").arg(path).spawn();

    #[cfg(target_os = "windows")]
    let spawned = std::process::Command::new("cmd")
        .args(["/C", "start", "", path.to_str().unwrap_or("")])
        .spawn();

    spawned.map_err(|e| AfsError::ViewerUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocKind;
    use tempfile::TempDir;

    #[test]
    fn pdf_export_writes_deterministic_filename() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::new(DocKind::Invoice);
        doc.number = "INV0042".to_string();
        let path = export(&doc, dir.path(), Delivery::Pdf { output: None }).unwrap();
        assert!(path.ends_with("output/Invoice-INV0042.pdf"));
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn explicit_output_path_is_respected() {
        let dir = TempDir::new().unwrap();
        let doc = Document::new(DocKind::Quotation);
        let target = dir.path().join("quote.pdf");
        let path = export(
            &doc,
            dir.path(),
            Delivery::Pdf {
                output: Some(target.clone()),
            },
        )
        .unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[test]
    fn incomplete_receipt_is_rejected_before_anything_is_written() {
        let dir = TempDir::new().unwrap();
        let doc = Document::new(DocKind::Receipt);
        let err = export(&doc, dir.path(), Delivery::Pdf { output: None }).unwrap_err();
        assert!(matches!(err, AfsError::MissingField("number")));
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn receipt_validation_checks_fields_in_order() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::new(DocKind::Receipt);
        doc.number = "RCP-001".to_string();
        let err = export(&doc, dir.path(), Delivery::Pdf { output: None }).unwrap_err();
        assert!(matches!(err, AfsError::MissingField("customer name")));

        if let Detail::Receipt(detail) = &mut doc.detail {
            detail.customer_name = "John Doe".to_string();
        }
        let err = export(&doc, dir.path(), Delivery::Pdf { output: None }).unwrap_err();
        assert!(matches!(err, AfsError::MissingField("amount")));
    }

    #[test]
    fn missing_logo_does_not_fail_the_export() {
        let dir = TempDir::new().unwrap();
        let doc = Document::new(DocKind::Invoice);
        assert!(export(&doc, dir.path(), Delivery::Pdf { output: None }).is_ok());
    }
}
