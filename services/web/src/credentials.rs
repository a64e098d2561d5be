//! services/web/src/credentials.rs
//!
//! The credential service: password hashing, verification, and the one-time
//! migration of legacy plaintext passwords.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use guestbook_core::ports::{DatabaseService, PortError, PortResult};
use tracing::info;

/// Hashes a plaintext password into a PHC-format Argon2 string.
///
/// The salt is random, so two calls on the same input produce different
/// output; equality is checked through [`verify`], never by comparing hashes.
pub fn hash(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a plaintext password against a stored PHC string.
///
/// A malformed stored value verifies as `false`; this function never errors,
/// so a corrupt row cannot take the login path down.
pub fn verify(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Returns true when a stored value already parses as a PHC hash string.
pub fn looks_hashed(stored: &str) -> bool {
    PasswordHash::new(stored).is_ok()
}

/// Converts any remaining plaintext passwords to Argon2 hashes.
///
/// The `looks_hashed` guard makes this safe to run on every startup: values
/// that already parse as PHC strings are skipped, so a second run never
/// re-hashes (and thereby corrupts) existing credentials. Returns the number
/// of rows migrated.
pub async fn migrate_plaintext_passwords(db: &dyn DatabaseService) -> PortResult<usize> {
    let mut migrated = 0;
    for creds in db.list_credentials().await? {
        if looks_hashed(&creds.stored_password) {
            continue;
        }
        let hashed = hash(&creds.stored_password)
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {e}")))?;
        db.update_password(creds.id, &hashed).await?;
        migrated += 1;
    }
    if migrated > 0 {
        info!("Migrated {} plaintext password(s) to Argon2", migrated);
    }
    Ok(migrated)
}
