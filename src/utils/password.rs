use anyhow::{Context, Result};

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("hunter2_hunter2").unwrap();
        assert!(verify_password("hunter2_hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_rejected() {
        let hash = hash_password("hunter2_hunter2").unwrap();
        assert!(!verify_password("hunter3_hunter3", &hash).unwrap());
    }

    #[test]
    fn salted_hashes_differ() {
        let a = hash_password("same_input").unwrap();
        let b = hash_password("same_input").unwrap();
        assert_ne!(a, b);
    }
}
