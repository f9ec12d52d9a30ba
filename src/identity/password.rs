/// 비밀번호 해시: `salt$sha256(salt || password)` (hex)
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digests_match(&digest(salt, password), expected),
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// 길이가 같으면 내용과 무관하게 모든 바이트를 비교한다
fn digests_match(actual: &str, expected: &str) -> bool {
    if actual.len() != expected.len() {
        return false;
    }
    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let stored = hash_password("12345");
        assert!(verify_password("12345", &stored));
        assert!(!verify_password("54321", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn digest_comparison() {
        let d = digest("salt", "pw");
        assert!(digests_match(&d, &d.clone()));
        assert!(!digests_match(&d, &digest("salt", "other")));
        assert!(!digests_match(&d, &d[1..]));
        assert!(!digests_match("", "0"));
        assert!(!verify_password("12345", "salt$"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "no-separator"));
    }
}
