//! Short code generation and validation utilities.
//!
//! Short codes are derived from the storage-assigned record identity with a
//! Base62 positional encoding, so distinct identities never collide and no
//! retry logic is needed. Custom aliases supplied by users are validated here
//! as well.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Base62 alphabet. Order defines the value of each symbol and therefore the
/// lexical ordering of codes: `a` = 0 .. `z` = 25, `A` = 26 .. `Z` = 51,
/// `0` = 52 .. `9` = 61.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const BASE: i64 = ALPHABET.len() as i64;

/// Reserved words that cannot be used as custom aliases (case-insensitive).
///
/// These collide with system endpoints and would shadow them in routing.
const RESERVED_ALIASES: &[&str] = &[
    "api", "admin", "health", "docs", "redoc", "openapi", "static", "assets",
];

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("alias regex is valid"));

/// Errors produced by a [`CodeEncoder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Negative identity, empty code, or a code whose value does not fit in `i64`.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Code contains a character outside the alphabet.
    #[error("Invalid encoding: character {character:?} at position {position} is not in the alphabet")]
    InvalidEncoding { character: char, position: usize },
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::bad_request(err.to_string(), json!({}))
    }
}

/// Capability interface for turning record identities into short codes.
///
/// Only [`Base62Encoder`] exists today; callers depend on the trait so other
/// schemes can be added without touching them.
pub trait CodeEncoder: Send + Sync {
    /// Encodes a non-negative identity.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::InvalidArgument`] for negative input.
    fn encode(&self, n: i64) -> Result<String, EncodeError>;

    /// Decodes a code back to its identity. Used for diagnostics only, never
    /// on the redirect path.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::InvalidEncoding`] for non-alphabet characters and
    /// [`EncodeError::InvalidArgument`] for empty or overflowing codes.
    fn decode(&self, code: &str) -> Result<i64, EncodeError>;
}

/// Base62 encoder over [`ALPHABET`].
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::{Base62Encoder, CodeEncoder};
///
/// let encoder = Base62Encoder;
/// assert_eq!(encoder.encode(0).unwrap(), "a");
/// assert_eq!(encoder.encode(125).unwrap(), "cb");
/// assert_eq!(encoder.decode("cb").unwrap(), 125);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Base62Encoder;

impl CodeEncoder for Base62Encoder {
    fn encode(&self, n: i64) -> Result<String, EncodeError> {
        if n < 0 {
            return Err(EncodeError::InvalidArgument(format!(
                "identity must be non-negative, got {n}"
            )));
        }

        if n == 0 {
            return Ok((ALPHABET[0] as char).to_string());
        }

        let mut num = n;
        let mut digits = Vec::with_capacity(11);
        while num > 0 {
            digits.push(ALPHABET[(num % BASE) as usize]);
            num /= BASE;
        }
        digits.reverse();

        Ok(digits.into_iter().map(char::from).collect())
    }

    fn decode(&self, code: &str) -> Result<i64, EncodeError> {
        if code.is_empty() {
            return Err(EncodeError::InvalidArgument("code must not be empty".into()));
        }

        let mut num: i64 = 0;
        for (position, character) in code.chars().enumerate() {
            let digit = symbol_value(character)
                .ok_or(EncodeError::InvalidEncoding { character, position })?;

            num = num
                .checked_mul(BASE)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| {
                    EncodeError::InvalidArgument(format!("code {code:?} overflows a 64-bit identity"))
                })?;
        }

        Ok(num)
    }
}

fn symbol_value(c: char) -> Option<i64> {
    match c {
        'a'..='z' => Some(c as i64 - 'a' as i64),
        'A'..='Z' => Some(c as i64 - 'A' as i64 + 26),
        '0'..='9' => Some(c as i64 - '0' as i64 + 52),
        _ => None,
    }
}

/// Generates short codes for newly created records.
///
/// Codes shorter than `min_length` are left-padded with the alphabet's first
/// symbol. Padding is value-neutral, so the padded code still decodes to the
/// same identity.
pub struct ShortCodeGenerator {
    encoder: Box<dyn CodeEncoder>,
    min_length: usize,
}

impl ShortCodeGenerator {
    /// Creates a Base62 generator with the given minimum length.
    pub fn new(min_length: usize) -> Self {
        Self::with_encoder(Box::new(Base62Encoder), min_length)
    }

    pub fn with_encoder(encoder: Box<dyn CodeEncoder>, min_length: usize) -> Self {
        Self {
            encoder,
            min_length,
        }
    }

    /// Derives the short code for a storage identity.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::InvalidArgument`] if `id` is negative.
    pub fn generate(&self, id: i64) -> Result<String, EncodeError> {
        let code = self.encoder.encode(id)?;
        if code.len() >= self.min_length {
            return Ok(code);
        }

        let mut padded = String::with_capacity(self.min_length);
        padded.extend(std::iter::repeat_n(
            ALPHABET[0] as char,
            self.min_length - code.len(),
        ));
        padded.push_str(&code);
        Ok(padded)
    }

    pub fn decode(&self, code: &str) -> Result<i64, EncodeError> {
        self.encoder.decode(code)
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Default for ShortCodeGenerator {
    fn default() -> Self {
        Self::new(6)
    }
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Must not be a reserved word (checked first, case-insensitive)
/// - Length: `min_length..=max_length` characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(
    alias: &str,
    min_length: usize,
    max_length: usize,
) -> Result<(), AppError> {
    if RESERVED_ALIASES.contains(&alias.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            format!("'{alias}' is a reserved keyword and cannot be used as a custom alias"),
            json!({ "alias": alias }),
        ));
    }

    let len = alias.chars().count();
    if len < min_length {
        return Err(AppError::bad_request(
            format!("Custom alias must be at least {min_length} characters"),
            json!({ "provided_length": len }),
        ));
    }

    if len > max_length {
        return Err(AppError::bad_request(
            format!("Custom alias must be at most {max_length} characters"),
            json!({ "provided_length": len }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, numbers, hyphens, and underscores",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
