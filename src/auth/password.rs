use bcrypt::{hash, verify, BcryptError};
use rand::Rng;

use crate::config;

/// Characters used for generated temporary passwords. Ambiguous glyphs
/// (0/O, 1/l/I) are left out so the value survives being read over the phone.
const PASSWORD_CHARSET: &[u8] = b"abcdefghjkmnpqrstuvwxyzABCDEFGHJKMNPQRSTUVWXYZ23456789!@#$%&*";

pub const TEMPORARY_PASSWORD_LENGTH: usize = 16;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, config::config().security.bcrypt_cost)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(password, password_hash)
}

/// Generate the temporary password handed to a newly created stakeholder.
/// The caller stores only the bcrypt hash; the cleartext is returned once.
pub fn generate_temporary_password() -> String {
    let mut rng = rand::thread_rng();

    (0..TEMPORARY_PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..PASSWORD_CHARSET.len());
            PASSWORD_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() {
        let hashed = hash_password("sunflower-42").expect("hash");
        assert!(verify_password("sunflower-42", &hashed).expect("verify"));
        assert!(!verify_password("sunflower-43", &hashed).expect("verify"));
    }

    #[test]
    fn generated_passwords_use_the_charset() {
        let password = generate_temporary_password();
        assert_eq!(password.len(), TEMPORARY_PASSWORD_LENGTH);
        assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
    }

    #[test]
    fn generated_passwords_differ() {
        assert_ne!(generate_temporary_password(), generate_temporary_password());
    }
}
