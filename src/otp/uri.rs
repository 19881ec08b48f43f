//! `otpauth://` provisioning URI generation per the Google Authenticator
//! key-URI format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Only generation is provided; these URIs are consumed by QR encoders and
//! authenticator apps. Parameter order is fixed and the `issuer` parameter
//! is omitted entirely when no issuer is given.

use crate::otp::types::Algorithm;

/// Build an `otpauth://hotp/...` URI.
///
/// `otpauth://hotp/<label>?counter=<c>&digits=<d>&issuer=<i>&secret=<base32>`
pub fn hotp_uri(
    account: &str,
    issuer: Option<&str>,
    counter: u64,
    digits: u32,
    secret_b32: &str,
) -> String {
    let mut params = vec![
        format!("counter={}", counter),
        format!("digits={}", digits),
    ];
    if let Some(iss) = issuer {
        params.push(format!("issuer={}", url_encode(iss)));
    }
    params.push(format!("secret={}", secret_b32));

    format!("otpauth://hotp/{}?{}", label(account, issuer), params.join("&"))
}

/// Build an `otpauth://totp/...` URI.
///
/// `otpauth://totp/<label>?algorithm=<alg>&digits=<d>&issuer=<i>&period=<step>&secret=<base32>`
pub fn totp_uri(
    account: &str,
    issuer: Option<&str>,
    algorithm: Algorithm,
    digits: u32,
    period: i64,
    secret_b32: &str,
) -> String {
    let mut params = vec![
        format!("algorithm={}", algorithm.uri_name()),
        format!("digits={}", digits),
    ];
    if let Some(iss) = issuer {
        params.push(format!("issuer={}", url_encode(iss)));
    }
    params.push(format!("period={}", period));
    params.push(format!("secret={}", secret_b32));

    format!("otpauth://totp/{}?{}", label(account, issuer), params.join("&"))
}

/// Label is `issuer:account` (percent-encoded as a whole) when an issuer is
/// present, else just the account.
fn label(account: &str, issuer: Option<&str>) -> String {
    match issuer {
        Some(iss) => url_encode(&format!("{}:{}", iss, account)),
        None => url_encode(account),
    }
}

fn url_encode(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            b' ' => output.push_str("%20"),
            b'@' => output.push_str("%40"),
            _ => output.push_str(&format!("%{:02X}", byte)),
        }
    }
    output
}
