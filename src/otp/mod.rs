//! OTP crate: sub-modules.

pub mod types;
pub mod core;
pub mod hotp;
pub mod totp;
pub mod ocra;
pub mod uri;

// Re-export top-level items for convenience.
pub use types::*;
pub use hotp::Hotp;
pub use totp::Totp;
pub use ocra::{ChallengeFormat, Ocra, OcraContext, OcraResponse, OcraSuite};
