//! Operator session handling.
//!
//! A single shared password gates the mutating commands. This keeps casual
//! users out of the admin surface; it is not a security mechanism, and the
//! session is just a flag file in the data directory.

use std::path::Path;

use crate::error::{AfsError, Result};
use crate::store;

const ADMIN_PASSWORD: &str = "Nhamburo2026";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Authenticated,
    Anonymous,
}

impl Session {
    /// Load the current session state from the data directory.
    pub fn load(data_dir: &Path) -> Session {
        if store::session_flag_present(data_dir) {
            Session::Authenticated
        } else {
            Session::Anonymous
        }
    }

    /// Fail unless the operator has logged in.
    pub fn require(self) -> Result<()> {
        match self {
            Session::Authenticated => Ok(()),
            Session::Anonymous => Err(AfsError::NotAuthenticated),
        }
    }
}

/// Check the password and persist the session flag.
pub fn login(data_dir: &Path, password: &str) -> Result<()> {
    if password != ADMIN_PASSWORD {
        return Err(AfsError::IncorrectPassword);
    }
    store::write_session_flag(data_dir)
}

/// Drop the session flag. Logging out twice is fine.
pub fn logout(data_dir: &Path) -> Result<()> {
    store::remove_session_flag(data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn login_with_correct_password_authenticates() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Session::load(dir.path()), Session::Anonymous);
        login(dir.path(), "Nhamburo2026").unwrap();
        assert_eq!(Session::load(dir.path()), Session::Authenticated);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = login(dir.path(), "nhamburo2026").unwrap_err();
        assert!(matches!(err, AfsError::IncorrectPassword));
        assert_eq!(Session::load(dir.path()), Session::Anonymous);
    }

    #[test]
    fn logout_clears_the_session() {
        let dir = TempDir::new().unwrap();
        login(dir.path(), "Nhamburo2026").unwrap();
        logout(dir.path()).unwrap();
        assert_eq!(Session::load(dir.path()), Session::Anonymous);
        // Idempotent.
        logout(dir.path()).unwrap();
    }

    #[test]
    fn anonymous_session_fails_require() {
        assert!(Session::Anonymous.require().is_err());
        assert!(Session::Authenticated.require().is_ok());
    }
}
