//! Draft and session persistence.
//!
//! One JSON file per persisted document type, rewritten on every mutation
//! and read back at command start. A missing or unreadable draft yields a
//! freshly seeded document, so the store never blocks a command.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{DocKind, Document};
use crate::error::{AfsError, Result};

const SESSION_FILE: &str = "session";
const SESSION_FLAG: &str = "authenticated";

/// Get the data directory path (~/.afs/)
pub fn data_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "afs") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    // Fallback to ~/.afs/
    let home = dirs_home().ok_or_else(|| {
        AfsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".afs"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn draft_path(data_dir: &Path, kind: DocKind) -> PathBuf {
    match kind {
        DocKind::Invoice => data_dir.join("invoice.json"),
        DocKind::Quotation => data_dir.join("quotation.json"),
        DocKind::Receipt => data_dir.join("receipt.json"),
    }
}

/// Load the draft for one document type, falling back to a seeded default
/// when no usable draft exists.
pub fn load_draft(data_dir: &Path, kind: DocKind) -> Document {
    let path = draft_path(data_dir, kind);
    let Ok(content) = fs::read_to_string(&path) else {
        return Document::new(kind);
    };
    match serde_json::from_str::<Document>(&content) {
        Ok(doc) if doc.kind() == kind => doc,
        _ => Document::new(kind),
    }
}

/// Save the draft, creating the data directory on first use.
pub fn save_draft(data_dir: &Path, document: &Document) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = draft_path(data_dir, document.kind());
    let content = serde_json::to_string_pretty(document)
        .map_err(|e| AfsError::DraftSave(e.to_string()))?;
    fs::write(path, content)?;
    Ok(())
}

/// Remove the draft so the next load starts from a seeded default.
pub fn clear_draft(data_dir: &Path, kind: DocKind) -> Result<()> {
    let path = draft_path(data_dir, kind);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

pub fn session_flag_present(data_dir: &Path) -> bool {
    fs::read_to_string(data_dir.join(SESSION_FILE))
        .map(|content| content.trim() == SESSION_FLAG)
        .unwrap_or(false)
}

pub fn write_session_flag(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    fs::write(data_dir.join(SESSION_FILE), SESSION_FLAG)?;
    Ok(())
}

pub fn remove_session_flag(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(SESSION_FILE);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_draft_yields_seeded_default() {
        let dir = TempDir::new().unwrap();
        let doc = load_draft(dir.path(), DocKind::Invoice);
        assert_eq!(doc.billing().unwrap().items.len(), 2);
        assert!(doc.number.starts_with("INV"));
    }

    #[test]
    fn drafts_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::new(DocKind::Invoice);
        doc.billing_mut().unwrap().discount = 500.0;
        save_draft(dir.path(), &doc).unwrap();

        let loaded = load_draft(dir.path(), DocKind::Invoice);
        assert_eq!(loaded, doc);
    }

    #[test]
    fn corrupt_draft_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("invoice.json"), "{ not json").unwrap();
        let doc = load_draft(dir.path(), DocKind::Invoice);
        assert!(doc.number.starts_with("INV"));
    }

    #[test]
    fn draft_of_wrong_kind_is_ignored() {
        let dir = TempDir::new().unwrap();
        let receipt = Document::new(DocKind::Receipt);
        let content = serde_json::to_string(&receipt).unwrap();
        fs::write(dir.path().join("invoice.json"), content).unwrap();
        let doc = load_draft(dir.path(), DocKind::Invoice);
        assert!(doc.number.starts_with("INV"));
    }

    #[test]
    fn clear_draft_resets_to_default() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::new(DocKind::Receipt);
        doc.number = "RCP-1".to_string();
        save_draft(dir.path(), &doc).unwrap();
        clear_draft(dir.path(), DocKind::Receipt).unwrap();
        let loaded = load_draft(dir.path(), DocKind::Receipt);
        assert!(loaded.number.is_empty());
    }

    #[test]
    fn session_flag_round_trip() {
        let dir = TempDir::new().unwrap();
        assert!(!session_flag_present(dir.path()));
        write_session_flag(dir.path()).unwrap();
        assert!(session_flag_present(dir.path()));
        remove_session_flag(dir.path()).unwrap();
        assert!(!session_flag_present(dir.path()));
    }
}
