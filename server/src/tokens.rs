//! One-time codes, reset tokens and webhook signatures.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const OTP_TTL_MINUTES: i64 = 10;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;
const RESET_TOKEN_BYTES: usize = 32;

/// Random 6-digit numeric passcode without a leading zero.
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

/// 32 random bytes, hex-encoded. Only the hash of this value is stored.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Checks a hex HMAC-SHA256 `signature` over `body`. The comparison is
/// constant time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
