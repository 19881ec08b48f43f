//! TOTP engine — RFC 6238 time-based codes.

use crate::otp::core;
use crate::otp::types::*;
use crate::otp::uri;
use std::fmt;

/// Time-based one-time password engine (RFC 6238).
///
/// Defaults: 6 digits, SHA-1, 30-second step, time reference 0. All time
/// handling is explicit at the `*_at` layer; the plain methods read the
/// system clock.
#[derive(Clone)]
pub struct Totp {
    secret: Vec<u8>,
    digits: u32,
    algorithm: Algorithm,
    time_step: i64,
    time_reference: i64,
}

impl fmt::Debug for Totp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the secret.
        f.debug_struct("Totp")
            .field("secret_len", &self.secret.len())
            .field("digits", &self.digits)
            .field("algorithm", &self.algorithm)
            .field("time_step", &self.time_step)
            .field("time_reference", &self.time_reference)
            .finish()
    }
}

impl Totp {
    /// Create an engine over a raw secret (≥ 20 bytes) with defaults.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, OtpError> {
        let secret = secret.into();
        core::validate_secret(&secret)?;
        Ok(Self {
            secret,
            digits: 6,
            algorithm: Algorithm::default(),
            time_step: 30,
            time_reference: 0,
        })
    }

    /// Builder: set digit count (6–8).
    pub fn with_digits(mut self, digits: u32) -> Result<Self, OtpError> {
        core::validate_digits(digits)?;
        self.digits = digits;
        Ok(self)
    }

    /// Builder: set the HMAC algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Builder: set the time step in seconds (must be positive).
    pub fn with_time_step(mut self, time_step: i64) -> Result<Self, OtpError> {
        if time_step <= 0 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidTimeStep,
                "Time step must be greater than zero",
            )
            .with_detail(format!("got {}", time_step)));
        }
        self.time_step = time_step;
        Ok(self)
    }

    /// Builder: set the epoch offset subtracted from the clock (default 0).
    pub fn with_time_reference(mut self, time_reference: i64) -> Self {
        self.time_reference = time_reference;
        self
    }

    /// Number of digits in generated codes.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Configured HMAC algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Configured time step in seconds.
    pub fn time_step(&self) -> i64 {
        self.time_step
    }

    // ── Time-step math ───────────────────────────────────────────

    /// Time-step counter at the given unix time. Floored division, so times
    /// before the reference step toward negative infinity.
    pub fn current_time_step_at(&self, now: i64) -> i64 {
        (now - self.time_reference).div_euclid(self.time_step)
    }

    /// Time-step counter at the current system time.
    pub fn current_time_step(&self) -> i64 {
        self.current_time_step_at(core::current_unix_time() as i64)
    }

    /// Seconds until the step containing `now` rolls over.
    pub fn seconds_remaining_at(&self, now: i64) -> i64 {
        self.time_step - (now - self.time_reference).rem_euclid(self.time_step)
    }

    /// Seconds until the current step rolls over.
    pub fn seconds_remaining(&self) -> i64 {
        self.seconds_remaining_at(core::current_unix_time() as i64)
    }

    // ── Generation ───────────────────────────────────────────────

    fn code_for_step(&self, step: i64) -> String {
        let hs = core::compute_hmac(&self.secret, &step.to_be_bytes(), self.algorithm);
        core::truncate(&hs, self.digits)
    }

    /// Generate the code for the step containing the given unix time.
    pub fn generate_at(&self, now: i64) -> String {
        self.code_for_step(self.current_time_step_at(now))
    }

    /// Generate the code for the current system time.
    pub fn generate(&self) -> String {
        self.generate_at(core::current_unix_time() as i64)
    }

    // ── Verification ─────────────────────────────────────────────

    /// Verify a candidate against the window `t−behind ..= t+ahead` around
    /// the step `t` containing `now`, scanning in ascending order.
    ///
    /// Returns the matching step's offset from `t` (negative = the caller's
    /// clock is ahead of the token). Comparison is constant-time; a miss
    /// yields [`OtpErrorKind::InvalidCode`].
    pub fn verify_at(
        &self,
        now: i64,
        candidate: &str,
        behind: u32,
        ahead: u32,
    ) -> Result<i64, OtpError> {
        let t = self.current_time_step_at(now);
        log::trace!(
            "TOTP verify scan: step {} window -{}/+{}",
            t,
            behind,
            ahead
        );

        for i in (t - behind as i64)..=(t + ahead as i64) {
            let generated = self.code_for_step(i);
            if core::constant_time_eq(generated.as_bytes(), candidate.as_bytes()) {
                return Ok(i - t);
            }
        }

        log::debug!(
            "TOTP verify miss: no match in window of {} steps",
            behind as u64 + ahead as u64 + 1
        );
        Err(OtpError::new(
            OtpErrorKind::InvalidCode,
            "Code did not match any time step in the window",
        ))
    }

    /// Verify against the current system time.
    pub fn verify(&self, candidate: &str, behind: u32, ahead: u32) -> Result<i64, OtpError> {
        self.verify_at(core::current_unix_time() as i64, candidate, behind, ahead)
    }

    // ── Export ───────────────────────────────────────────────────

    /// Unpadded base-32 form of the secret, for provisioning display.
    pub fn base32_secret(&self) -> String {
        core::encode_secret(&self.secret)
    }

    /// `otpauth://totp/...` provisioning URI for QR display.
    pub fn provisioning_uri(&self, account: &str, issuer: Option<&str>) -> String {
        uri::totp_uri(
            account,
            issuer,
            self.algorithm,
            self.digits,
            self.time_step,
            &self.base32_secret(),
        )
    }
}
