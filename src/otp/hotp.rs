//! HOTP engine — RFC 4226 counter-based codes.

use crate::otp::core;
use crate::otp::types::*;
use crate::otp::uri;
use std::fmt;

type ElementMapper = Box<dyn Fn(u64) -> u64 + Send + Sync>;

/// Counter-based one-time password engine (HMAC-SHA-1, per RFC 4226).
///
/// The engine is stateless: the counter is supplied on every call and its
/// persistence is the caller's responsibility.
pub struct Hotp {
    secret: Vec<u8>,
    digits: u32,
    /// Maps a counter index to the value that is actually encoded.
    /// Identity unless the caller installs a custom mapping.
    mapper: Option<ElementMapper>,
}

impl fmt::Debug for Hotp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the secret.
        f.debug_struct("Hotp")
            .field("secret_len", &self.secret.len())
            .field("digits", &self.digits)
            .field("custom_mapper", &self.mapper.is_some())
            .finish()
    }
}

impl Hotp {
    /// Create an engine over a raw secret (≥ 20 bytes) with the given digit
    /// count (6–8).
    pub fn new(secret: impl Into<Vec<u8>>, digits: u32) -> Result<Self, OtpError> {
        let secret = secret.into();
        core::validate_secret(&secret)?;
        core::validate_digits(digits)?;
        Ok(Self {
            secret,
            digits,
            mapper: None,
        })
    }

    /// Builder: install a counter-to-element mapping applied before the
    /// moving factor is encoded (e.g. a lookup-table indirection). Defaults
    /// to identity.
    pub fn with_element_mapper(
        mut self,
        mapper: impl Fn(u64) -> u64 + Send + Sync + 'static,
    ) -> Self {
        self.mapper = Some(Box::new(mapper));
        self
    }

    /// Number of digits in generated codes.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    fn element_for(&self, index: u64) -> u64 {
        match &self.mapper {
            Some(f) => f(index),
            None => index,
        }
    }

    /// Generate the code for a counter value.
    pub fn generate(&self, counter: u64) -> String {
        let message = self.element_for(counter).to_be_bytes();
        let hs = core::compute_hmac(&self.secret, &message, Algorithm::Sha1);
        core::truncate(&hs, self.digits)
    }

    /// Verify a candidate code against the window
    /// `counter ..= counter + ahead`, scanning in ascending order.
    ///
    /// Returns the offset of the matching counter from `counter` (0 =
    /// exact). The caller should advance its stored counter past the match.
    /// Comparison is constant-time; a miss yields
    /// [`OtpErrorKind::InvalidCode`].
    pub fn verify(&self, counter: u64, candidate: &str, ahead: u64) -> Result<u64, OtpError> {
        let until = counter.saturating_add(ahead);
        log::trace!("HOTP verify scan: window {}..={}", counter, until);

        for i in counter..=until {
            let generated = self.generate(i);
            if core::constant_time_eq(generated.as_bytes(), candidate.as_bytes()) {
                return Ok(i - counter);
            }
        }

        log::debug!(
            "HOTP verify miss: no match in window of {} counters",
            until - counter + 1
        );
        Err(OtpError::new(
            OtpErrorKind::InvalidCode,
            "Code did not match any counter in the window",
        ))
    }

    /// Unpadded base-32 form of the secret, for provisioning display.
    pub fn base32_secret(&self) -> String {
        core::encode_secret(&self.secret)
    }

    /// `otpauth://hotp/...` provisioning URI for QR display.
    pub fn provisioning_uri(&self, account: &str, issuer: Option<&str>, counter: u64) -> String {
        uri::hotp_uri(account, issuer, counter, self.digits, &self.base32_secret())
    }
}
