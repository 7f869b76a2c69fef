//! Issues and consumes one-time codes inside the caller's transaction.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};
use uuid::Uuid;

use tabaudit_core::config::OtpConfig;
use tabaudit_core::error::{AppError, ErrorKind, OtpRejection, RuleViolation};
use tabaudit_core::result::AppResult;
use tabaudit_database::db_error;
use tabaudit_database::repositories::OtpRepository;
use tabaudit_entity::otp::{AssignmentOtp, OneTimeCode, ReturnVerification, is_well_formed};

use super::generator::generate_code;

/// Generates, validates and consumes assignment and return codes.
///
/// Every method works on a connection that is already inside a
/// transaction, so issuing or consuming a code commits or rolls back
/// together with the state change it gates.
#[derive(Debug, Clone)]
pub struct OtpIssuer {
    otp_repo: Arc<OtpRepository>,
    config: OtpConfig,
}

impl OtpIssuer {
    /// Creates a new issuer.
    pub fn new(otp_repo: Arc<OtpRepository>, config: OtpConfig) -> Self {
        Self { otp_repo, config }
    }

    /// Lifetime of an assignment code.
    pub fn assignment_ttl(&self) -> Duration {
        Duration::hours(self.config.assignment_ttl_hours)
    }

    /// Lifetime of a return verification code.
    pub fn return_ttl(&self) -> Duration {
        Duration::minutes(self.config.return_ttl_minutes)
    }

    /// Issue a fresh assignment code for a tab type.
    pub async fn issue_assignment_code(
        &self,
        conn: &mut PgConnection,
        tab_type_id: Uuid,
        created_by: Option<Uuid>,
    ) -> AppResult<AssignmentOtp> {
        let expires_at = Utc::now() + self.assignment_ttl();

        for attempt in 1..=self.config.max_generation_attempts {
            let code = generate_code(self.config.code_length);
            if self.otp_repo.assignment_code_is_live(&mut *conn, &code).await? {
                debug!(attempt, "Assignment code collided with a live code");
                continue;
            }

            // The insert runs in a savepoint: a unique violation from a
            // concurrent issuer must not abort the outer transaction.
            let mut savepoint = conn
                .begin()
                .await
                .map_err(|e| db_error("Failed to open savepoint", e))?;
            match self
                .otp_repo
                .insert_assignment(&mut *savepoint, tab_type_id, &code, created_by, expires_at)
                .await
            {
                Ok(otp) => {
                    savepoint
                        .commit()
                        .await
                        .map_err(|e| db_error("Failed to release savepoint", e))?;
                    return Ok(otp);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    debug!(attempt, "Assignment code lost a uniqueness race");
                    savepoint
                        .rollback()
                        .await
                        .map_err(|e| db_error("Failed to roll back savepoint", e))?;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.config.max_generation_attempts,
            "Gave up generating a unique assignment code"
        );
        Err(AppError::internal("Could not generate a unique code"))
    }

    /// Issue a fresh return verification code for a held device.
    pub async fn issue_return_code(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
        holder: Uuid,
    ) -> AppResult<ReturnVerification> {
        let expires_at = Utc::now() + self.return_ttl();

        for attempt in 1..=self.config.max_generation_attempts {
            let code = generate_code(self.config.code_length);
            if self.otp_repo.return_code_is_live(&mut *conn, &code).await? {
                debug!(attempt, "Return code collided with a live code");
                continue;
            }

            let mut savepoint = conn
                .begin()
                .await
                .map_err(|e| db_error("Failed to open savepoint", e))?;
            match self
                .otp_repo
                .insert_return(&mut *savepoint, device_id, holder, &code, expires_at)
                .await
            {
                Ok(verification) => {
                    savepoint
                        .commit()
                        .await
                        .map_err(|e| db_error("Failed to release savepoint", e))?;
                    return Ok(verification);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    debug!(attempt, "Return code lost a uniqueness race");
                    savepoint
                        .rollback()
                        .await
                        .map_err(|e| db_error("Failed to roll back savepoint", e))?;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.config.max_generation_attempts,
            "Gave up generating a unique return code"
        );
        Err(AppError::internal("Could not generate a unique code"))
    }

    /// Consume an assignment code for `user_id`.
    ///
    /// Exactly one of any number of concurrent callers succeeds; the
    /// others fail with the precise reason the code is no longer valid.
    pub async fn consume_assignment_code(
        &self,
        conn: &mut PgConnection,
        code: &str,
        user_id: Uuid,
    ) -> AppResult<AssignmentOtp> {
        let code = code.trim();
        if !is_well_formed(code, self.config.code_length) {
            return Err(reject(OtpRejection::NotFound));
        }

        if let Some(otp) = self
            .otp_repo
            .consume_assignment(&mut *conn, code, user_id)
            .await?
        {
            return Ok(otp);
        }

        let reason = match self.otp_repo.find_assignment_by_code(conn, code).await? {
            None => OtpRejection::NotFound,
            // The store rejected it at its own clock; a record that still
            // looks live here expired in between.
            Some(otp) => otp.check(Utc::now()).err().unwrap_or(OtpRejection::Expired),
        };
        Err(reject(reason))
    }

    /// Verify a return code for a device and its holder, consuming it.
    ///
    /// The newest unverified matching code decides: none means
    /// `InvalidOtp`, past expiry means `OtpExpired`, and losing a
    /// concurrent verification means `InvalidOtp`. Success also retires
    /// every other pending code for the device.
    pub async fn consume_return_code(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
        holder: Uuid,
        code: &str,
    ) -> AppResult<ReturnVerification> {
        let code = code.trim();
        if !is_well_formed(code, self.config.code_length) {
            return Err(AppError::rule(RuleViolation::InvalidOtp));
        }

        let verification = self
            .otp_repo
            .find_latest_return(&mut *conn, device_id, holder, code)
            .await?
            .ok_or_else(|| AppError::rule(RuleViolation::InvalidOtp))?;

        match verification.check(Utc::now()) {
            Ok(()) => {}
            Err(OtpRejection::Expired) => return Err(AppError::rule(RuleViolation::OtpExpired)),
            Err(_) => return Err(AppError::rule(RuleViolation::InvalidOtp)),
        }

        if !self.otp_repo.mark_verified(&mut *conn, verification.id).await? {
            return Err(AppError::rule(RuleViolation::InvalidOtp));
        }

        // Older codes from re-initiated returns die with this one.
        let retired = self.otp_repo.void_pending_returns(conn, device_id).await?;
        if retired > 0 {
            debug!(device_id = %device_id, retired, "Retired superseded return codes");
        }
        Ok(verification)
    }
}

fn reject(reason: OtpRejection) -> AppError {
    AppError::rule(RuleViolation::InvalidOrExpiredOtp { reason })
}
