//! # Rukun Auth
//!
//! Authentication and authorization utilities for the Rukun backend:
//! - Argon2id password hashing and verification
//! - JWT access-token issuance and validation
//! - Static role-to-permission map for the fixed community role set

pub mod jwt;
pub mod password;
pub mod permissions;

pub use jwt::{create_access_token, extract_bearer_token, validate_token, Claims, JwtConfig};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use permissions::{require_permission, role_permissions, Permission};
pub use secrecy;
pub use subtle;

#[cfg(test)]
mod tests {
    use secrecy::{ExposeSecret, SecretString};

    use super::password::{hash_password, verify_password};

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("IuranWarga123!".to_string());
        let hash = hash_password(&password, None).unwrap();
        let result = verify_password(&password, hash.expose_secret());
        assert!(result.is_ok(), "Verification failed: {:?}", result);
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword".to_string());
        let wrong_password = SecretString::from("WrongPassword".to_string());
        let hash = hash_password(&password, None).unwrap();
        assert!(verify_password(&wrong_password, hash.expose_secret()).is_err());
    }
}
