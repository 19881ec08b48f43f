//! # otpkit – HOTP / TOTP / OCRA one-time passwords
//!
//! One-time password engines over a shared HMAC dynamic-truncation core:
//!
//! - **RFC 4226** – HOTP counter-based codes with look-ahead window verification
//! - **RFC 6238** – TOTP time-based codes (SHA-1, SHA-256, SHA-512) with drift windows
//! - **RFC 6287** – OCRA challenge-response codes driven by parsed suite strings
//! - **Base-32** – Unpadded RFC 4648 secret export, tolerant import
//! - **otpauth:// URIs** – Provisioning URI generation for QR display
//!
//! Engines are immutable after construction and safe to share across threads;
//! every moving factor (counter, time, challenge context) is an explicit
//! parameter at call time.

pub mod otp;
