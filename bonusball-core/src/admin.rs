//! Shared admin password gate.
//!
//! The pool document keeps only a SHA-256 digest of the password.

use crate::error::{BonusBallError, Result};
use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<()> {
    if hash_password(candidate) == stored_hash {
        Ok(())
    } else {
        tracing::warn!("Admin password rejected");
        Err(BonusBallError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password() {
        let stored = hash_password("carl");
        assert_eq!(stored.len(), 64);
        assert!(verify_password(&stored, "carl").is_ok());
        assert!(matches!(
            verify_password(&stored, "Carl"),
            Err(BonusBallError::AccessDenied)
        ));
    }
}
