//! OCRA engine — RFC 6287 challenge-response codes.
//!
//! A suite string such as `OCRA-1:HOTP-SHA256-8:C-QN08-PSHA1` declares the
//! HMAC algorithm, the truncation digit count, and which data-input fields
//! (counter, challenge, password, session data, timestamp) participate in
//! the computation. The suite string itself is hashed as a literal prefix
//! of the data input, so parsed suites keep it verbatim.

use crate::otp::core;
use crate::otp::types::*;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// Second suite component: `HOTP-SHA{1,256,512}-{0,4-9,10}`.
    static ref CRYPTO_FUNCTION_RE: Regex =
        Regex::new(r"^HOTP-SHA(?P<sha>1|256|512)-(?P<digits>1?0|[4-9])$").unwrap();

    /// Third suite component: `[C-]Q{A,N,H}{04-64}[-PSHA{1,256,512}][-S{040-512}][-T{1-59}{S,M}|{1-48}H]`.
    static ref DATA_INPUT_RE: Regex = Regex::new(
        r"^(?P<counter>C-)?Q(?P<format>A|N|H)(?P<qlen>0[4-9]|[1-5]\d|6[0-4])(-PSHA(?P<psha>1|256|512))?(-S(?P<slen>0[4-9]\d|[1-4]\d{2}|50\d|51[0-2]))?(-T(?P<tstep>([1-9]|[1-5]\d)[SM]|([1-9]|[1-3]\d|4[0-8])H))?$"
    )
    .unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Challenge format
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How the suite's challenge question is encoded into the data input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeFormat {
    /// `A` — raw text bytes.
    Alphanumeric,
    /// `N` — decimal digits, converted to hex and packed as binary.
    Numeric,
    /// `H` — hex digits, packed as binary.
    Hex,
}

impl ChallengeFormat {
    fn letter(&self) -> char {
        match self {
            Self::Alphanumeric => 'A',
            Self::Numeric => 'N',
            Self::Hex => 'H',
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Suite
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A parsed OCRA suite. Immutable; `Display` re-derives the original suite
/// string byte-for-byte from the parsed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcraSuite {
    raw: String,
    algorithm: Algorithm,
    digits: u32,
    uses_counter: bool,
    challenge_format: ChallengeFormat,
    challenge_max_length: u32,
    password_algorithm: Option<Algorithm>,
    session_length: Option<u32>,
    time_step: Option<u32>,
}

impl OcraSuite {
    /// Parse a suite string per RFC 6287 §6.
    pub fn parse(suite: &str) -> Result<Self, OtpError> {
        let components: Vec<&str> = suite.split(':').collect();
        if components.len() != 3 {
            log::debug!("suite rejected: {} components", components.len());
            return Err(OtpError::new(OtpErrorKind::InvalidSuite, "Invalid suite")
                .with_detail("expected 3 colon-separated components"));
        }
        let (algorithm_tag, crypto_function, data_input) =
            (components[0], components[1], components[2]);

        if algorithm_tag != "OCRA-1" {
            log::debug!("suite rejected: unknown algorithm tag");
            return Err(OtpError::new(OtpErrorKind::InvalidSuite, "Invalid algorithm")
                .with_detail(algorithm_tag));
        }

        let crypto_caps = CRYPTO_FUNCTION_RE.captures(crypto_function).ok_or_else(|| {
            log::debug!("suite rejected: crypto function");
            OtpError::new(
                OtpErrorKind::InvalidCryptoFunction,
                "Invalid cryptography function",
            )
            .with_detail(crypto_function)
        })?;

        let data_caps = DATA_INPUT_RE.captures(data_input).ok_or_else(|| {
            log::debug!("suite rejected: data input");
            OtpError::new(OtpErrorKind::InvalidDataInput, "Invalid data input")
                .with_detail(data_input)
        })?;

        let algorithm = sha_number_to_algorithm(&crypto_caps["sha"]);
        // The grammar admits only 0, 4–9 and 10.
        let digits: u32 = crypto_caps["digits"].parse().expect("digits match is numeric");

        let time_step = data_caps.name("tstep").map(|m| {
            let t = m.as_str();
            let (magnitude, unit) = t.split_at(t.len() - 1);
            let magnitude: u32 = magnitude.parse().expect("magnitude match is numeric");
            match unit {
                "S" => magnitude,
                "M" => magnitude * 60,
                _ => magnitude * 3600,
            }
        });

        Ok(Self {
            raw: suite.to_string(),
            algorithm,
            digits,
            uses_counter: data_caps.name("counter").is_some(),
            challenge_format: match &data_caps["format"] {
                "A" => ChallengeFormat::Alphanumeric,
                "N" => ChallengeFormat::Numeric,
                _ => ChallengeFormat::Hex,
            },
            challenge_max_length: data_caps["qlen"].parse().expect("qlen match is numeric"),
            password_algorithm: data_caps.name("psha").map(|m| sha_number_to_algorithm(m.as_str())),
            session_length: data_caps
                .name("slen")
                .map(|m| m.as_str().parse().expect("slen match is numeric")),
            time_step,
        })
    }

    /// The verbatim suite string (hashed as the data-input prefix).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// HMAC algorithm for the final computation.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Response digit count; 0 means "no truncation, raw digest".
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Whether the data input includes an 8-byte counter.
    pub fn uses_counter(&self) -> bool {
        self.uses_counter
    }

    /// Challenge encoding declared by the `Q` field.
    pub fn challenge_format(&self) -> ChallengeFormat {
        self.challenge_format
    }

    /// Declared maximum challenge length (4–64). Informational: mutual
    /// challenge flows concatenate two challenges and exceed it by design,
    /// so the engine does not enforce it.
    pub fn challenge_max_length(&self) -> u32 {
        self.challenge_max_length
    }

    /// Hash applied to the password material, when the suite declares `P`.
    pub fn password_algorithm(&self) -> Option<Algorithm> {
        self.password_algorithm
    }

    /// Declared session-data length (40–512), when the suite declares `S`.
    pub fn session_length(&self) -> Option<u32> {
        self.session_length
    }

    /// Timestamp step in seconds, when the suite declares `T`.
    pub fn time_step(&self) -> Option<u32> {
        self.time_step
    }
}

fn sha_number_to_algorithm(sha: &str) -> Algorithm {
    match sha {
        "1" => Algorithm::Sha1,
        "256" => Algorithm::Sha256,
        _ => Algorithm::Sha512,
    }
}

impl FromStr for OcraSuite {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OcraSuite {
    /// Reconstructs the suite string from the parsed fields. Always equal
    /// to [`OcraSuite::as_str`] for a suite produced by `parse`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OCRA-1:HOTP-{}-{}:", self.algorithm, self.digits)?;
        if self.uses_counter {
            write!(f, "C-")?;
        }
        write!(
            f,
            "Q{}{:02}",
            self.challenge_format.letter(),
            self.challenge_max_length
        )?;
        if let Some(p) = self.password_algorithm {
            write!(f, "-P{}", p)?;
        }
        if let Some(s) = self.session_length {
            write!(f, "-S{:03}", s)?;
        }
        if let Some(t) = self.time_step {
            // The grammar caps S and M magnitudes at 59, so every parsed
            // value maps back to a unique magnitude/unit pair.
            if t % 3600 == 0 {
                write!(f, "-T{}H", t / 3600)?;
            } else if t % 60 == 0 {
                write!(f, "-T{}M", t / 60)?;
            } else {
                write!(f, "-T{}S", t)?;
            }
        }
        Ok(())
    }
}

impl Serialize for OcraSuite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for OcraSuite {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-invocation data inputs, supplied fresh on every `generate`/`verify`
/// call and never retained by the engine. Which fields are required is
/// determined by the parsed suite; a declared field left unset fails with
/// [`OtpErrorKind::MissingContext`].
#[derive(Clone, Default)]
pub struct OcraContext {
    counter: Option<u64>,
    challenge: Option<String>,
    password: Option<Vec<u8>>,
    session_data: Option<Vec<u8>>,
}

impl fmt::Debug for OcraContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Password material stays out of logs.
        f.debug_struct("OcraContext")
            .field("counter", &self.counter)
            .field("challenge", &self.challenge)
            .field("has_password", &self.password.is_some())
            .field("session_data_len", &self.session_data.as_ref().map(Vec::len))
            .finish()
    }
}

impl OcraContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: counter value for `C` suites.
    pub fn with_counter(mut self, counter: u64) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Builder: challenge question (format per the suite's `Q` field).
    pub fn with_challenge(mut self, challenge: impl Into<String>) -> Self {
        self.challenge = Some(challenge.into());
        self
    }

    /// Builder: raw password material for `P` suites. The engine hashes it
    /// with the suite's declared algorithm.
    pub fn with_password(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Builder: session data for `S` suites. Matching the declared length
    /// is the caller's contract; the bytes are appended verbatim.
    pub fn with_session_data(mut self, session_data: impl Into<Vec<u8>>) -> Self {
        self.session_data = Some(session_data.into());
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Response
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of an OCRA computation: a decimal code, or the raw HMAC digest
/// for digits-0 suites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcraResponse {
    Code(String),
    Digest(Vec<u8>),
}

impl OcraResponse {
    /// The response as bytes, for transport or comparison.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Code(code) => code.as_bytes(),
            Self::Digest(digest) => digest,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Engine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Challenge-response one-time password engine (RFC 6287).
pub struct Ocra {
    secret: Vec<u8>,
    suite: OcraSuite,
}

impl fmt::Debug for Ocra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the secret.
        f.debug_struct("Ocra")
            .field("secret_len", &self.secret.len())
            .field("suite", &self.suite.raw)
            .finish()
    }
}

impl Ocra {
    /// Create an engine over a raw secret (≥ 20 bytes) and a suite string,
    /// parsed eagerly.
    pub fn new(secret: impl Into<Vec<u8>>, suite: &str) -> Result<Self, OtpError> {
        Self::with_suite(secret, OcraSuite::parse(suite)?)
    }

    /// Create an engine from an already-parsed suite.
    pub fn with_suite(secret: impl Into<Vec<u8>>, suite: OcraSuite) -> Result<Self, OtpError> {
        let secret = secret.into();
        core::validate_secret(&secret)?;
        Ok(Self { secret, suite })
    }

    /// The parsed suite.
    pub fn suite(&self) -> &OcraSuite {
        &self.suite
    }

    /// Compute the response for a context at the given unix time. The
    /// timestamp only participates when the suite declares `T`.
    pub fn generate_at(&self, ctx: &OcraContext, now: u64) -> Result<OcraResponse, OtpError> {
        let mut data_input = Vec::with_capacity(self.suite.raw.len() + 1 + 128 + 8 + 64);
        data_input.extend_from_slice(self.suite.raw.as_bytes());
        data_input.push(0);

        if self.suite.uses_counter {
            let counter = ctx.counter.ok_or_else(|| {
                OtpError::new(
                    OtpErrorKind::MissingContext,
                    "Suite requires a counter but none was supplied",
                )
            })?;
            data_input.extend_from_slice(&counter.to_be_bytes());
        }

        let challenge = ctx.challenge.as_deref().ok_or_else(|| {
            OtpError::new(
                OtpErrorKind::MissingContext,
                "Suite requires a challenge but none was supplied",
            )
        })?;
        let mut question = self.encode_challenge(challenge)?;
        question.resize(128, 0);
        data_input.extend_from_slice(&question);

        if let Some(algo) = self.suite.password_algorithm {
            let password = ctx.password.as_deref().ok_or_else(|| {
                OtpError::new(
                    OtpErrorKind::MissingContext,
                    "Suite requires password material but none was supplied",
                )
            })?;
            data_input.extend_from_slice(&core::compute_digest(password, algo));
        }

        if self.suite.session_length.is_some() {
            let session_data = ctx.session_data.as_deref().ok_or_else(|| {
                OtpError::new(
                    OtpErrorKind::MissingContext,
                    "Suite requires session data but none was supplied",
                )
            })?;
            // Declared length is a caller contract; bytes go in verbatim.
            data_input.extend_from_slice(session_data);
        }

        if let Some(step) = self.suite.time_step {
            data_input.extend_from_slice(&(now / step as u64).to_be_bytes());
        }

        let hs = core::compute_hmac(&self.secret, &data_input, self.suite.algorithm);
        if self.suite.digits == 0 {
            Ok(OcraResponse::Digest(hs))
        } else {
            Ok(OcraResponse::Code(core::truncate(&hs, self.suite.digits)))
        }
    }

    /// Compute the response at the current system time.
    pub fn generate(&self, ctx: &OcraContext) -> Result<OcraResponse, OtpError> {
        self.generate_at(ctx, core::current_unix_time())
    }

    /// One-shot verification: constant-time compare of the computed
    /// response against a candidate. OCRA has no search window.
    pub fn verify_at(
        &self,
        ctx: &OcraContext,
        candidate: &[u8],
        now: u64,
    ) -> Result<(), OtpError> {
        let response = self.generate_at(ctx, now)?;
        if core::constant_time_eq(response.as_bytes(), candidate) {
            Ok(())
        } else {
            log::debug!("OCRA verify miss for suite {}", self.suite.raw);
            Err(OtpError::new(
                OtpErrorKind::InvalidCode,
                "Response did not match",
            ))
        }
    }

    /// Verify at the current system time.
    pub fn verify(&self, ctx: &OcraContext, candidate: &[u8]) -> Result<(), OtpError> {
        self.verify_at(ctx, candidate, core::current_unix_time())
    }

    /// Unpadded base-32 form of the secret, for provisioning display.
    pub fn base32_secret(&self) -> String {
        core::encode_secret(&self.secret)
    }

    /// Encode the challenge per the suite's format. The encoded field is
    /// NUL-padded to 128 bytes by the caller; anything longer cannot fit
    /// the fixed layout and is rejected.
    fn encode_challenge(&self, challenge: &str) -> Result<Vec<u8>, OtpError> {
        let encoded = match self.suite.challenge_format {
            ChallengeFormat::Alphanumeric => challenge.as_bytes().to_vec(),
            ChallengeFormat::Numeric => {
                let value: u128 = challenge.parse().map_err(|_| {
                    OtpError::new(
                        OtpErrorKind::InvalidChallenge,
                        "Numeric challenge must be a decimal integer",
                    )
                    .with_detail(format!("{} chars", challenge.len()))
                })?;
                // Hex representation without leading zeros, right-padded to
                // an even number of nibbles.
                let mut hex_digits = format!("{:x}", value);
                if hex_digits.len() % 2 == 1 {
                    hex_digits.push('0');
                }
                hex::decode(&hex_digits).expect("even-length hex digits")
            }
            ChallengeFormat::Hex => {
                let mut hex_digits = challenge.to_string();
                if hex_digits.len() % 2 == 1 {
                    hex_digits.push('0');
                }
                hex::decode(&hex_digits).map_err(|_| {
                    OtpError::new(
                        OtpErrorKind::InvalidChallenge,
                        "Hex challenge contains non-hex characters",
                    )
                })?
            }
        };
        if encoded.len() > 128 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidChallenge,
                "Encoded challenge exceeds the 128-byte field",
            )
            .with_detail(format!("{} bytes", encoded.len())));
        }
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── RFC 6287 Appendix C keys ─────────────────────────────────

    const KEY20: &[u8] = b"12345678901234567890";
    const KEY32: &[u8] = b"12345678901234567890123456789012";
    const KEY64: &[u8] =
        b"1234567890123456789012345678901234567890123456789012345678901234";
    const PIN: &[u8] = b"1234";

    // ── Suite parsing: acceptance ────────────────────────────────

    #[test]
    fn parse_minimal_suite() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        assert_eq!(suite.algorithm(), Algorithm::Sha1);
        assert_eq!(suite.digits(), 6);
        assert!(!suite.uses_counter());
        assert_eq!(suite.challenge_format(), ChallengeFormat::Numeric);
        assert_eq!(suite.challenge_max_length(), 8);
        assert_eq!(suite.password_algorithm(), None);
        assert_eq!(suite.session_length(), None);
        assert_eq!(suite.time_step(), None);
    }

    #[test]
    fn parse_full_suite() {
        let suite =
            OcraSuite::parse("OCRA-1:HOTP-SHA512-8:C-QA10-PSHA256-S064-T1M").unwrap();
        assert_eq!(suite.algorithm(), Algorithm::Sha512);
        assert_eq!(suite.digits(), 8);
        assert!(suite.uses_counter());
        assert_eq!(suite.challenge_format(), ChallengeFormat::Alphanumeric);
        assert_eq!(suite.challenge_max_length(), 10);
        assert_eq!(suite.password_algorithm(), Some(Algorithm::Sha256));
        assert_eq!(suite.session_length(), Some(64));
        assert_eq!(suite.time_step(), Some(60));
    }

    #[test]
    fn parse_digit_zero_and_ten() {
        assert_eq!(OcraSuite::parse("OCRA-1:HOTP-SHA1-0:QH40").unwrap().digits(), 0);
        assert_eq!(OcraSuite::parse("OCRA-1:HOTP-SHA1-10:QN08").unwrap().digits(), 10);
    }

    #[test]
    fn parse_time_step_units() {
        assert_eq!(
            OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08-T59S").unwrap().time_step(),
            Some(59)
        );
        assert_eq!(
            OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08-T30M").unwrap().time_step(),
            Some(1800)
        );
        assert_eq!(
            OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08-T48H").unwrap().time_step(),
            Some(48 * 3600)
        );
    }

    // ── Suite parsing: rejection table ───────────────────────────

    #[test]
    fn reject_component_count() {
        for bad in ["OCRA-1:HOTP-SHA1-6", "OCRA-1:HOTP-SHA1-6:QN08:extra", ""] {
            let err = OcraSuite::parse(bad).unwrap_err();
            assert_eq!(err.kind, OtpErrorKind::InvalidSuite, "suite {:?}", bad);
        }
    }

    #[test]
    fn reject_algorithm_tag() {
        let err = OcraSuite::parse("OCRA-2:HOTP-SHA1-6:QN08").unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidSuite);
        let err = OcraSuite::parse("ocra-1:HOTP-SHA1-6:QN08").unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidSuite);
    }

    #[test]
    fn reject_crypto_function() {
        for bad in [
            "OCRA-1:HOTP-SHA1-3:QN08",   // digits below 4
            "OCRA-1:HOTP-SHA1-11:QN08",  // digits above 10
            "OCRA-1:HOTP-MD5-6:QN08",    // unknown hash
            "OCRA-1:TOTP-SHA1-6:QN08",   // wrong family
            "OCRA-1:HOTP-SHA384-6:QN08", // unsupported width
        ] {
            let err = OcraSuite::parse(bad).unwrap_err();
            assert_eq!(err.kind, OtpErrorKind::InvalidCryptoFunction, "suite {:?}", bad);
        }
    }

    #[test]
    fn reject_data_input() {
        for bad in [
            "OCRA-1:HOTP-SHA1-6:C",              // no challenge field
            "OCRA-1:HOTP-SHA1-6:QN03",           // challenge length below 4
            "OCRA-1:HOTP-SHA1-6:QN65",           // challenge length above 64
            "OCRA-1:HOTP-SHA1-6:QZ08",           // unknown format letter
            "OCRA-1:HOTP-SHA1-6:QN08-PSHA384",   // bad password hash
            "OCRA-1:HOTP-SHA1-6:QN08-S039",      // session below 040
            "OCRA-1:HOTP-SHA1-6:QN08-S513",      // session above 512
            "OCRA-1:HOTP-SHA1-6:QN08-T60S",      // seconds magnitude above 59
            "OCRA-1:HOTP-SHA1-6:QN08-T49H",      // hours magnitude above 48
            "OCRA-1:HOTP-SHA1-6:QN08-T0M",       // zero magnitude
            "OCRA-1:HOTP-SHA1-6:PSHA1-QN08",     // fields out of order
            "OCRA-1:HOTP-SHA1-6:QN08-C",         // counter marker misplaced
        ] {
            let err = OcraSuite::parse(bad).unwrap_err();
            assert_eq!(err.kind, OtpErrorKind::InvalidDataInput, "suite {:?}", bad);
        }
    }

    // ── Suite round-trip ─────────────────────────────────────────

    #[test]
    fn display_roundtrip() {
        for raw in [
            "OCRA-1:HOTP-SHA1-6:QN08",
            "OCRA-1:HOTP-SHA256-8:C-QN08-PSHA1",
            "OCRA-1:HOTP-SHA512-8:QA10-T1M",
            "OCRA-1:HOTP-SHA1-0:QH40",
            "OCRA-1:HOTP-SHA256-10:C-QA04-PSHA512-S128-T2H",
            "OCRA-1:HOTP-SHA1-6:QN08-S040",
            "OCRA-1:HOTP-SHA1-6:QN08-T59M",
        ] {
            let suite = OcraSuite::parse(raw).unwrap();
            assert_eq!(suite.to_string(), raw);
            assert_eq!(suite.as_str(), raw);
        }
    }

    #[test]
    fn parse_idempotence() {
        let a = OcraSuite::parse("OCRA-1:HOTP-SHA256-8:C-QN08-PSHA1").unwrap();
        let b = OcraSuite::parse("OCRA-1:HOTP-SHA256-8:C-QN08-PSHA1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn suite_serde_as_string() {
        let suite = OcraSuite::parse("OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let json = serde_json::to_string(&suite).unwrap();
        assert_eq!(json, "\"OCRA-1:HOTP-SHA1-6:QN08\"");
        let back: OcraSuite = serde_json::from_str(&json).unwrap();
        assert_eq!(back, suite);
        assert!(serde_json::from_str::<OcraSuite>("\"bogus\"").is_err());
    }

    // ── RFC 6287 Appendix C: one-way challenge-response ──────────

    #[test]
    fn rfc6287_one_way_sha1() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let expected = [
            "237653", "243178", "653583", "740991", "608993",
            "388898", "816933", "224598", "750600", "294470",
        ];
        for (i, exp) in expected.iter().enumerate() {
            let challenge = format!("{:0>8}", i as u64 * 11111111);
            let ctx = OcraContext::new().with_challenge(challenge);
            assert_eq!(
                ocra.generate_at(&ctx, 0).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "challenge index {}",
                i
            );
        }
    }

    #[test]
    fn rfc6287_one_way_sha256_pin() {
        let ocra = Ocra::new(KEY32, "OCRA-1:HOTP-SHA256-8:QN08-PSHA1").unwrap();
        let expected = ["83238735", "01501458", "17957585", "86776967", "86807031"];
        for (i, exp) in expected.iter().enumerate() {
            let challenge = format!("{:0>8}", i as u64 * 11111111);
            let ctx = OcraContext::new().with_challenge(challenge).with_password(PIN);
            assert_eq!(
                ocra.generate_at(&ctx, 0).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "challenge index {}",
                i
            );
        }
    }

    #[test]
    fn rfc6287_one_way_sha256_counter_pin() {
        let ocra = Ocra::new(KEY32, "OCRA-1:HOTP-SHA256-8:C-QN08-PSHA1").unwrap();
        let expected = [
            "65347737", "86775851", "78192410", "71565254", "10104329",
            "65983500", "70069104", "91771096", "75011558", "08522129",
        ];
        for (counter, exp) in expected.iter().enumerate() {
            let ctx = OcraContext::new()
                .with_counter(counter as u64)
                .with_challenge("12345678")
                .with_password(PIN);
            assert_eq!(
                ocra.generate_at(&ctx, 0).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "counter {}",
                counter
            );
        }
    }

    #[test]
    fn rfc6287_one_way_sha512_counter() {
        let ocra = Ocra::new(KEY64, "OCRA-1:HOTP-SHA512-8:C-QN08").unwrap();
        let expected = [
            "07016083", "63947962", "70123924", "25341727", "33203315",
            "34205738", "44343969", "51946085", "20403879", "31409299",
        ];
        for (i, exp) in expected.iter().enumerate() {
            let ctx = OcraContext::new()
                .with_counter(i as u64)
                .with_challenge(format!("{:0>8}", i as u64 * 11111111));
            assert_eq!(
                ocra.generate_at(&ctx, 0).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "counter {}",
                i
            );
        }
    }

    // ── RFC 6287 Appendix C: timed signatures ────────────────────

    #[test]
    fn rfc6287_timed_signature_sha512() {
        // T = 1206446760 (the RFC's fixed sample time), one-minute step.
        let ocra = Ocra::new(KEY64, "OCRA-1:HOTP-SHA512-8:QA10-T1M").unwrap();
        let expected = [
            ("SIG1000000", "77537423"),
            ("SIG1100000", "31970405"),
            ("SIG1200000", "10235557"),
            ("SIG1300000", "95213541"),
            ("SIG1400000", "65360607"),
        ];
        for (challenge, exp) in expected {
            let ctx = OcraContext::new().with_challenge(challenge);
            assert_eq!(
                ocra.generate_at(&ctx, 1206446760).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "challenge {}",
                challenge
            );
        }
    }

    // ── RFC 6287 Appendix C: mutual challenge-response ───────────
    // Both sides use QA08 with 16-character concatenated challenges;
    // the declared maximum challenge length is informational only.

    #[test]
    fn rfc6287_mutual_server_responses() {
        let ocra = Ocra::new(KEY32, "OCRA-1:HOTP-SHA256-8:QA08").unwrap();
        let expected = [
            ("CLI22220SRV11110", "28247970"),
            ("CLI22221SRV11111", "01984843"),
            ("CLI22222SRV11112", "65387857"),
        ];
        for (challenge, exp) in expected {
            let ctx = OcraContext::new().with_challenge(challenge);
            assert_eq!(
                ocra.generate_at(&ctx, 0).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "challenge {}",
                challenge
            );
        }
    }

    #[test]
    fn rfc6287_mutual_client_responses() {
        let ocra = Ocra::new(KEY32, "OCRA-1:HOTP-SHA256-8:QA08").unwrap();
        let expected = [
            ("SRV11110CLI22220", "15510767"),
            ("SRV11111CLI22221", "90175646"),
            ("SRV11112CLI22222", "33777207"),
        ];
        for (challenge, exp) in expected {
            let ctx = OcraContext::new().with_challenge(challenge);
            assert_eq!(
                ocra.generate_at(&ctx, 0).unwrap(),
                OcraResponse::Code(exp.to_string()),
                "challenge {}",
                challenge
            );
        }
    }

    // ── Data-input assembly details ──────────────────────────────

    #[test]
    fn digits_zero_returns_raw_digest() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-0:QN08").unwrap();
        let ctx = OcraContext::new().with_challenge("12345678");
        match ocra.generate_at(&ctx, 0).unwrap() {
            OcraResponse::Digest(d) => assert_eq!(d.len(), 20),
            OcraResponse::Code(_) => panic!("expected raw digest"),
        }
    }

    #[test]
    fn numeric_zero_challenge_packs_to_one_byte() {
        // dechex(0) = "0", padded to "00", one NUL byte — the all-zeros
        // challenge from the SHA1 vector table exercises this path.
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let ctx = OcraContext::new().with_challenge("00000000");
        assert_eq!(
            ocra.generate_at(&ctx, 0).unwrap(),
            OcraResponse::Code("237653".to_string())
        );
    }

    #[test]
    fn hex_challenge_odd_length_pads_right() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QH08").unwrap();
        let odd = OcraContext::new().with_challenge("ABC");
        let padded = OcraContext::new().with_challenge("ABC0");
        assert_eq!(
            ocra.generate_at(&odd, 0).unwrap(),
            ocra.generate_at(&padded, 0).unwrap()
        );
    }

    #[test]
    fn invalid_challenges_rejected() {
        let numeric = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let ctx = OcraContext::new().with_challenge("not a number");
        assert_eq!(
            numeric.generate_at(&ctx, 0).unwrap_err().kind,
            OtpErrorKind::InvalidChallenge
        );

        let hex = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QH08").unwrap();
        let ctx = OcraContext::new().with_challenge("XYZ1");
        assert_eq!(
            hex.generate_at(&ctx, 0).unwrap_err().kind,
            OtpErrorKind::InvalidChallenge
        );
    }

    #[test]
    fn oversized_challenge_rejected() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QA64").unwrap();
        let ctx = OcraContext::new().with_challenge("x".repeat(129));
        assert_eq!(
            ocra.generate_at(&ctx, 0).unwrap_err().kind,
            OtpErrorKind::InvalidChallenge
        );
    }

    #[test]
    fn session_data_appended_verbatim() {
        // Declared S064 but 4 bytes supplied: the engine does not enforce
        // the declared length, it only requires presence.
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08-S064").unwrap();
        let short = OcraContext::new()
            .with_challenge("12345678")
            .with_session_data(&b"abcd"[..]);
        let long = OcraContext::new()
            .with_challenge("12345678")
            .with_session_data(vec![b'a'; 64]);
        let a = ocra.generate_at(&short, 0).unwrap();
        let b = ocra.generate_at(&long, 0).unwrap();
        assert_ne!(a, b);
    }

    // ── Missing context ──────────────────────────────────────────

    #[test]
    fn missing_context_fields_fail_fast() {
        let ctx_q = OcraContext::new().with_challenge("12345678");

        let counter_suite = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:C-QN08").unwrap();
        assert_eq!(
            counter_suite.generate_at(&ctx_q, 0).unwrap_err().kind,
            OtpErrorKind::MissingContext
        );

        let pin_suite = Ocra::new(KEY32, "OCRA-1:HOTP-SHA256-8:QN08-PSHA1").unwrap();
        assert_eq!(
            pin_suite.generate_at(&ctx_q, 0).unwrap_err().kind,
            OtpErrorKind::MissingContext
        );

        let session_suite = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08-S064").unwrap();
        assert_eq!(
            session_suite.generate_at(&ctx_q, 0).unwrap_err().kind,
            OtpErrorKind::MissingContext
        );

        let no_challenge = OcraContext::new();
        let plain = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        assert_eq!(
            plain.generate_at(&no_challenge, 0).unwrap_err().kind,
            OtpErrorKind::MissingContext
        );
    }

    // ── Verification ─────────────────────────────────────────────

    #[test]
    fn verify_roundtrip_and_miss() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let ctx = OcraContext::new().with_challenge("12345678");
        let response = ocra.generate_at(&ctx, 0).unwrap();
        assert!(ocra.verify_at(&ctx, response.as_bytes(), 0).is_ok());
        let err = ocra.verify_at(&ctx, b"000000", 0).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidCode);
    }

    // ── Construction ─────────────────────────────────────────────

    #[test]
    fn short_secret_rejected() {
        let err = Ocra::new(&b"short"[..], "OCRA-1:HOTP-SHA1-6:QN08").unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::SecretTooShort);
    }

    #[test]
    fn determinism() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        let ctx = OcraContext::new().with_challenge("99999999");
        assert_eq!(
            ocra.generate_at(&ctx, 0).unwrap(),
            ocra.generate_at(&ctx, 0).unwrap()
        );
    }

    #[test]
    fn debug_hides_secret_and_password() {
        let ocra = Ocra::new(KEY20, "OCRA-1:HOTP-SHA1-6:QN08").unwrap();
        assert!(!format!("{:?}", ocra).contains("12345678901234567890"));
        let ctx = OcraContext::new().with_password(&b"hunter2"[..]);
        assert!(!format!("{:?}", ctx).contains("hunter2"));
    }
}
