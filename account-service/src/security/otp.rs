/// One-time passcode generation and comparison.
/// Codes are fixed-width 6-digit strings; comparison is constant-time.
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use subtle::ConstantTimeEq;

pub const OTP_LENGTH: usize = 6;

/// Generate a fresh code, uniformly distributed over [100000, 999999].
/// Each call draws independently; codes carry no relation to earlier ones.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(100_000..=999_999).to_string()
}

/// Expiry instant for a code issued now
pub fn expiry(now: DateTime<Utc>, ttl_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(ttl_minutes)
}

/// Constant-time equality over the stored and candidate codes.
/// Both sides are strings, so "007123" and "7123" never compare equal.
pub fn codes_match(stored: &str, candidate: &str) -> bool {
    if stored.len() != candidate.len() {
        return false;
    }
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}
