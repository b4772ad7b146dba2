//! Random password generation

use rand::Rng;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%&";

/// Default password length
pub const DEFAULT_LENGTH: usize = 18;

/// Generate a random password from letters, digits and `!@#$%&`
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_length() {
        assert_eq!(generate(DEFAULT_LENGTH).len(), 18);
        assert_eq!(generate(32).len(), 32);
        assert_eq!(generate(0).len(), 0);
    }

    #[test]
    fn test_only_allowed_characters() {
        let password = generate(256);
        assert!(password.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn test_two_passwords_differ() {
        assert_ne!(generate(32), generate(32));
    }
}
