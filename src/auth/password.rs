//! Salted password hashing and verification on top of bcrypt.

/// Hash a plaintext password with the given bcrypt work factor.
///
/// The salt is generated per call and embedded in the returned hash string.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum work factor; production cost comes from config
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, TEST_COST).expect("hashing should succeed");

        assert!(hash.starts_with("$2"), "expected a bcrypt hash prefix");
        assert_ne!(hash, password);

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password", TEST_COST).expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("shared-password", TEST_COST).expect("hashing should succeed");
        let b = hash_password("shared-password", TEST_COST).expect("hashing should succeed");
        assert_ne!(a, b, "per-call salts must produce distinct hashes");
    }
}
