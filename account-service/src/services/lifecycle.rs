/// Account Lifecycle Manager
///
/// Owns the verification state transitions of an account:
/// Unregistered -> PendingVerification -> Verified (terminal).
/// The only writer of the verification sub-state; profile handlers never
/// touch it. All operations are a single account-row round trip plus, for
/// register/resend, one mail-dispatch round trip. No locking: concurrent
/// registrations race on the email unique index, concurrent resends are
/// last-write-wins.
use crate::db::user_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::User;
use crate::security::{self, otp, TokenIssuer};
use crate::services::EmailService;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AccountLifecycle {
    db: PgPool,
    mailer: EmailService,
    tokens: TokenIssuer,
    otp_ttl_minutes: i64,
}

/// Outcome of a successful login
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: i64,
}

impl AccountLifecycle {
    pub fn new(db: PgPool, mailer: EmailService, tokens: TokenIssuer, otp_ttl_minutes: i64) -> Self {
        Self {
            db,
            mailer,
            tokens,
            otp_ttl_minutes,
        }
    }

    /// Create an account in the pending-verification state and dispatch
    /// the verification code.
    ///
    /// The account row persists even when mail delivery fails; resend is
    /// the recovery path for that partial state.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if user_repo::email_exists(&self.db, email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = security::hash_password(password)?;
        let code = otp::generate_otp();
        let expires = otp::expiry(Utc::now(), self.otp_ttl_minutes);

        let user = user_repo::create_account(&self.db, name, email, &password_hash, &code, expires)
            .await
            .map_err(|e| {
                // Racing registration slipped past the existence check
                if is_unique_violation(&e) {
                    AppError::Conflict("Email is already registered".to_string())
                } else {
                    AppError::from(e)
                }
            })?;

        if let Err(e) = self
            .mailer
            .send_otp_email(email, &code, self.otp_ttl_minutes)
            .await
        {
            warn!(
                user_id = %user.id,
                email = %mask_email(email),
                error = %e,
                "account created but verification code delivery failed"
            );
            return Err(e);
        }

        info!(
            user_id = %user.id,
            email = %mask_email(email),
            "account registered, verification code sent"
        );

        Ok(user)
    }

    /// Authenticate and issue a session token. No writes to the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let user = user_repo::find_by_email(&self.db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account with this email".to_string()))?;

        if !user.is_verified {
            return Err(AppError::Unverified);
        }

        if !security::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, &user.email)?;

        info!(user_id = %user.id, "login succeeded");

        Ok(LoginOutcome {
            token,
            expires_in: self.tokens.expires_in(),
        })
    }

    /// Verify an account with a submitted code. Succeeds at most once per
    /// account; afterwards the account is verified irreversibly.
    pub async fn verify_otp(&self, email: &str, candidate: &str) -> Result<()> {
        let user = user_repo::find_by_email(&self.db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account with this email".to_string()))?;

        check_verification(&user, candidate, Utc::now())?;

        user_repo::mark_verified(&self.db, user.id).await?;

        info!(
            user_id = %user.id,
            email = %mask_email(email),
            "email verified"
        );

        Ok(())
    }

    /// Issue a fresh verification code, invalidating any previous one,
    /// and dispatch it.
    ///
    /// The new code stays persisted even when delivery fails; a later
    /// resend simply overwrites it.
    pub async fn resend_otp(&self, email: &str) -> Result<()> {
        let user = user_repo::find_by_email(&self.db, email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account with this email".to_string()))?;

        if user.is_verified {
            return Err(AppError::AlreadyVerified);
        }

        let code = otp::generate_otp();
        let expires = otp::expiry(Utc::now(), self.otp_ttl_minutes);

        user_repo::set_verification_code(&self.db, user.id, &code, expires).await?;

        self.mailer
            .send_otp_email(email, &code, self.otp_ttl_minutes)
            .await?;

        info!(
            user_id = %user.id,
            email = %mask_email(email),
            "verification code reissued"
        );

        Ok(())
    }
}

/// Decide whether a submitted code verifies the account.
///
/// Order of failures: already verified, then missing/mismatched code,
/// then expiry. Expiry is strict: a request at the exact expiry instant
/// fails.
fn check_verification(user: &User, candidate: &str, now: DateTime<Utc>) -> Result<()> {
    if user.is_verified {
        return Err(AppError::AlreadyVerified);
    }

    let stored = user.otp.as_deref().ok_or(AppError::InvalidOtp)?;
    if !otp::codes_match(stored, candidate) {
        return Err(AppError::InvalidOtp);
    }

    match user.otp_expires {
        Some(expires) if now < expires => Ok(()),
        _ => Err(AppError::OtpExpired),
    }
}

/// Mask email for logging
fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let local = &email[..at_pos];
        let domain = &email[at_pos..];
        if local.len() <= 2 {
            format!("**{}", domain)
        } else {
            format!("{}***{}", &local[..1], domain)
        }
    } else {
        "***@***".to_string()
    }
}
