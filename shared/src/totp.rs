//! Time-based one-time codes (RFC 6238) as produced by authenticator apps.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::validation::normalize_code;

type HmacSha1 = Hmac<Sha1>;

pub const PERIOD_SECS: u64 = 30;
pub const DIGITS: u32 = 6;
/// Accepted clock drift, in time steps on either side.
pub const WINDOW: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    Malformed,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    Empty,
    InvalidBase32(String),
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretError::Empty => write!(f, "TOTP secret is empty"),
            SecretError::InvalidBase32(e) => write!(f, "TOTP secret is not valid base32: {}", e),
        }
    }
}

impl std::error::Error for SecretError {}

#[derive(Clone)]
pub struct TotpVerifier {
    key: Vec<u8>,
    encoded: String,
}

impl fmt::Debug for TotpVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpVerifier").field("key", &"<redacted>").finish()
    }
}

impl TotpVerifier {
    /// Accepts the secret the way authenticator apps display it: any case,
    /// with spaces and optional `=` padding.
    pub fn from_base32(secret: &str) -> Result<Self, SecretError> {
        let cleaned: String = secret
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if cleaned.is_empty() {
            return Err(SecretError::Empty);
        }

        let key = BASE32_NOPAD
            .decode(cleaned.as_bytes())
            .map_err(|e| SecretError::InvalidBase32(e.to_string()))?;

        Ok(Self { key, encoded: cleaned })
    }

    pub fn secret_base32(&self) -> &str {
        &self.encoded
    }

    fn code_for_counter(&self, counter: u64) -> String {
        let mut mac = HmacSha1::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        // Dynamic truncation
        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = u32::from_be_bytes([
            digest[offset] & 0x7f,
            digest[offset + 1],
            digest[offset + 2],
            digest[offset + 3],
        ]);

        format!("{:0width$}", binary % 10u32.pow(DIGITS), width = DIGITS as usize)
    }

    pub fn generate_at(&self, unix_secs: u64) -> String {
        self.code_for_counter(unix_secs / PERIOD_SECS)
    }

    pub fn check_at(&self, code: &str, unix_secs: u64) -> Result<(), CodeError> {
        let code = normalize_code(code).ok_or(CodeError::Malformed)?;

        let counter = unix_secs / PERIOD_SECS;
        let first = counter.saturating_sub(WINDOW);
        let last = counter.saturating_add(WINDOW);

        if (first..=last).any(|c| self.code_for_counter(c) == code) {
            Ok(())
        } else {
            Err(CodeError::Mismatch)
        }
    }

    pub fn verify_at(&self, code: &str, unix_secs: u64) -> bool {
        self.check_at(code, unix_secs).is_ok()
    }

    pub fn verify(&self, code: &str) -> bool {
        self.verify_at(code, unix_now())
    }

    /// `otpauth://` URI understood by authenticator apps when scanned or pasted.
    pub fn provisioning_uri(&self, label: &str, issuer: &str) -> String {
        format!(
            "otpauth://totp/{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
            escape_spaces(label),
            self.encoded,
            escape_spaces(issuer),
            DIGITS,
            PERIOD_SECS
        )
    }
}

fn escape_spaces(value: &str) -> String {
    value.replace(' ', "%20")
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
