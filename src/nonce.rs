//! Single-use nonce generation.
//!
//! The remote service uses nonces as anti-CSRF proof: every query must carry
//! a nonce in the query string and matching nonces in the cookie header.
//! Nonces are decimal strings drawn from a cryptographically strong source;
//! the requirement is unguessability, and callers must not rely on anything
//! beyond length and character class.

use rand::Rng;

use crate::config::NONCE_LENGTH;

/// Generates a pseudorandom decimal token of exactly `length` digits.
pub fn generate_nonce(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..=9u8)))
        .collect()
}

/// The cookie nonce and query nonce for one query, generated together.
///
/// The remote endpoint validates a `pch_nonceX=X` cookie assignment for the
/// cookie nonce and a `pch_nonceY=Y` assignment for the query nonce, with
/// the query nonce repeated in the `pch_nonce` query parameter. Producing
/// both header values from one place keeps the pair from ever being
/// generated inconsistently.
#[derive(Debug, Clone)]
pub struct NoncePair {
    cookie: String,
    query: String,
}

impl NoncePair {
    /// Generates a fresh pair of independent nonces.
    pub fn generate() -> Self {
        Self {
            cookie: generate_nonce(NONCE_LENGTH),
            query: generate_nonce(NONCE_LENGTH),
        }
    }

    /// The nonce that accompanies the request as the `pch_nonce` parameter.
    pub fn query_nonce(&self) -> &str {
        &self.query
    }

    /// Renders the combined `Cookie` header value for this pair.
    pub fn cookie_header(&self) -> String {
        format!(
            "pch_nonce{0}={0}; pch_nonce{1}={1}",
            self.cookie, self.query
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_nonce_exact_length() {
        for length in [1, 2, 10, 100, 255] {
            assert_eq!(generate_nonce(length).len(), length);
        }
    }

    #[test]
    fn test_generate_nonce_decimal_digits_only() {
        let nonce = generate_nonce(1000);
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_nonce_not_constant() {
        // 100 digits of randomness; a collision here means the generator is broken
        assert_ne!(generate_nonce(100), generate_nonce(100));
    }

    #[test]
    fn test_nonce_pair_uses_default_length() {
        let pair = NoncePair::generate();
        assert_eq!(pair.query_nonce().len(), NONCE_LENGTH);
    }

    #[test]
    fn test_cookie_header_repeats_each_nonce() {
        let pair = NoncePair {
            cookie: "111".to_string(),
            query: "222".to_string(),
        };
        assert_eq!(pair.cookie_header(), "pch_nonce111=111; pch_nonce222=222");
    }
}
