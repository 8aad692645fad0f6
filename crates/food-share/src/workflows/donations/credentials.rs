use sha2::{Digest, Sha256};
use uuid::Uuid;

const SEPARATOR: char = '$';

/// Salted SHA-256 digest stored as `salt$hex`.
pub(crate) fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = digest_hex(&salt, password);
    format!("{salt}{SEPARATOR}{digest}")
}

pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(SEPARATOR) {
        Some((salt, expected)) => digest_hex(salt, password) == expected,
        None => false,
    }
}

fn digest_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
