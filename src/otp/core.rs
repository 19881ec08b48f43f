//! Shared OTP primitives — HMAC dispatch and RFC 4226 §5.3 dynamic
//! truncation, secret validation, base-32 secret handling.

use crate::otp::types::*;
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HMAC + dynamic truncation (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute HMAC(key, message) using the specified algorithm.
pub(crate) fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => {
            let mut mac =
                Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Plain (un-keyed) digest, used for the OCRA password field.
pub(crate) fn compute_digest(data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => Sha1::digest(data).to_vec(),
        Algorithm::Sha256 => Sha256::digest(data).to_vec(),
        Algorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Dynamic truncation per RFC 4226 §5.3.
///
/// `digits` must be ≥ 1; OCRA's digits-0 "raw digest" mode is handled
/// before truncation is reached. The modulus is computed in `u64` so the
/// 10-digit OCRA case does not overflow.
pub(crate) fn truncate(hmac_result: &[u8], digits: u32) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let binary = ((hmac_result[offset] as u32 & 0x7f) << 24)
        | ((hmac_result[offset + 1] as u32) << 16)
        | ((hmac_result[offset + 2] as u32) << 8)
        | (hmac_result[offset + 3] as u32);
    let modulus = 10u64.pow(digits);
    let code = binary as u64 % modulus;
    format!("{:0>width$}", code, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Configuration validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Check the minimum-length invariant on a raw secret.
pub(crate) fn validate_secret(secret: &[u8]) -> Result<(), OtpError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(OtpError::new(
            OtpErrorKind::SecretTooShort,
            format!("Secret must be at least {} bytes long", MIN_SECRET_LEN),
        )
        .with_detail(format!("got {} bytes", secret.len())));
    }
    Ok(())
}

/// Check the HOTP/TOTP digit-count invariant (6–8).
pub(crate) fn validate_digits(digits: u32) -> Result<(), OtpError> {
    if !(6..=8).contains(&digits) {
        return Err(OtpError::new(
            OtpErrorKind::InvalidOutputLength,
            "Codes must be between 6 and 8 characters long",
        )
        .with_detail(format!("got {}", digits)));
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Secret helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Encode raw bytes to base-32 (no padding, uppercase).
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
}

/// Decode a base-32 secret (with or without spaces/dashes, case-insensitive).
pub fn decode_secret(b32: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = b32.replace(' ', "").replace('-', "").to_uppercase();
    // Pad to multiple of 8 if needed
    let padded = pad_base32(&cleaned);
    base32::decode(base32::Alphabet::Rfc4648 { padding: true }, &padded)
        .or_else(|| base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &cleaned))
        .ok_or_else(|| OtpError::new(OtpErrorKind::InvalidSecret, "Invalid base-32 secret"))
}

/// Pad a base-32 string to a multiple of 8 with '='.
fn pad_base32(s: &str) -> String {
    let remainder = s.len() % 8;
    if remainder == 0 {
        s.to_string()
    } else {
        let pad_count = 8 - remainder;
        format!("{}{}", s, "=".repeat(pad_count))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Utility helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Current unix timestamp in seconds.
pub(crate) fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Constant-time comparison (to prevent timing attacks on code verification).
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
