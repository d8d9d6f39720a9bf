pub mod jwt;
/// Security utilities: password hashing, session tokens, verification codes
pub mod otp;
pub mod password;

pub use jwt::{Claims, TokenIssuer};
pub use otp::{codes_match, generate_otp, OTP_LENGTH};
pub use password::{hash_password, verify_password};
