//! PostgreSQL implementation of EntitlementStore.
//!
//! The `purchases` table carries a UNIQUE constraint on
//! `(user_id, course_id)`; every write here is an upsert against that
//! constraint, which is what makes concurrent grants for the same pair
//! converge on a single row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::enrollment::{Entitlement, PurchaseStatus};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::EntitlementStore;

/// PostgreSQL implementation of the EntitlementStore port.
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a purchase.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    user_id: i64,
    course_id: i64,
    status: String,
    external_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Entitlement {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let status = PurchaseStatus::parse(&row.status).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status: {}", e))
        })?;

        Ok(Entitlement {
            user_id: UserId::new(row.user_id),
            course_id: CourseId::new(row.course_id),
            status,
            external_reference: row.external_reference,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const PURCHASE_COLUMNS: &str =
    "user_id, course_id, status, external_reference, created_at, updated_at";

/// Maps a failed insert to NotFound when a foreign key did not resolve.
fn map_write_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("purchases_user_id_fkey") => {
                return DomainError::new(ErrorCode::UserNotFound, "User not found");
            }
            Some("purchases_course_id_fkey") => {
                return DomainError::new(ErrorCode::CourseNotFound, "Course not found");
            }
            _ => {}
        }
    }
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to write purchase: {}", e),
    )
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn grant(
        &self,
        user_id: UserId,
        course_id: CourseId,
        external_reference: Option<&str>,
    ) -> Result<Entitlement, DomainError> {
        // Upsert: a duplicate key is "already granted", never an error. An
        // existing approved row keeps its original reference.
        let row: PurchaseRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO purchases (user_id, course_id, status, external_reference)
            VALUES ($1, $2, 'approved', $3)
            ON CONFLICT (user_id, course_id) DO UPDATE SET
                status = 'approved',
                external_reference = COALESCE(purchases.external_reference, EXCLUDED.external_reference),
                updated_at = now()
            RETURNING {}
            "#,
            PURCHASE_COLUMNS
        ))
        .bind(user_id.as_i64())
        .bind(course_id.as_i64())
        .bind(external_reference)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn revoke(&self, user_id: UserId, course_id: CourseId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM purchases WHERE user_id = $1 AND course_id = $2")
            .bind(user_id.as_i64())
            .bind(course_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to revoke purchase: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EntitlementNotFound,
                "Entitlement not found",
            ));
        }

        Ok(())
    }

    async fn has(&self, user_id: UserId, course_id: CourseId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM purchases
                WHERE user_id = $1 AND course_id = $2 AND status = 'approved'
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(course_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to check access: {}", e),
            )
        })
    }

    async fn find(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Entitlement>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM purchases WHERE user_id = $1 AND course_id = $2",
            PURCHASE_COLUMNS
        ))
        .bind(user_id.as_i64())
        .bind(course_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find purchase: {}", e),
            )
        })?;

        row.map(Entitlement::try_from).transpose()
    }

    async fn mark_pending(
        &self,
        user_id: UserId,
        course_id: CourseId,
        external_reference: &str,
    ) -> Result<Entitlement, DomainError> {
        // An approved row is never downgraded by a new checkout attempt.
        let row: PurchaseRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO purchases (user_id, course_id, status, external_reference)
            VALUES ($1, $2, 'pending', $3)
            ON CONFLICT (user_id, course_id) DO UPDATE SET
                status = CASE
                    WHEN purchases.status = 'approved' THEN purchases.status
                    ELSE 'pending'
                END,
                external_reference = CASE
                    WHEN purchases.status = 'approved' THEN purchases.external_reference
                    ELSE EXCLUDED.external_reference
                END,
                updated_at = now()
            RETURNING {}
            "#,
            PURCHASE_COLUMNS
        ))
        .bind(user_id.as_i64())
        .bind(course_id.as_i64())
        .bind(external_reference)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn mark_failed(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Entitlement>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(&format!(
            r#"
            UPDATE purchases SET status = 'failed', updated_at = now()
            WHERE user_id = $1 AND course_id = $2 AND status <> 'approved'
            RETURNING {}
            "#,
            PURCHASE_COLUMNS
        ))
        .bind(user_id.as_i64())
        .bind(course_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark purchase failed: {}", e),
            )
        })?;

        row.map(Entitlement::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Entitlement>, DomainError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM purchases WHERE user_id = $1 ORDER BY created_at",
            PURCHASE_COLUMNS
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list purchases: {}", e),
            )
        })?;

        rows.into_iter().map(Entitlement::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_row_converts_to_entitlement() {
        let row = PurchaseRow {
            user_id: 7,
            course_id: 1,
            status: "approved".to_string(),
            external_reference: Some("evt_1".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let entitlement = Entitlement::try_from(row).unwrap();
        assert_eq!(entitlement.user_id, UserId::new(7));
        assert!(entitlement.is_approved());
    }

    #[test]
    fn purchase_row_with_bad_status_fails() {
        let row = PurchaseRow {
            user_id: 7,
            course_id: 1,
            status: "refunded".to_string(),
            external_reference: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(Entitlement::try_from(row).is_err());
    }
}
