//! ClientDirectory - 顾客目录
//!
//! Customers are keyed by national id and upserted on first reference. An
//! upsert never blanks a stored field with a missing input.

use std::sync::Arc;

use shared::models::{Customer, CustomerComment, CustomerHistoryEntry, CustomerUpsert};
use sqlx::{SqliteConnection, SqlitePool};

use crate::core::{EngineError, EngineResult};
use crate::db::repository::{RepoError, customer, occupancy, order};
use crate::utils::Clock;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional, validate_comment,
    validate_optional_text, validate_required_text,
};

/// Lines returned by [`ClientDirectory::history`]
pub const HISTORY_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct ClientDirectory {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl ClientDirectory {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Insert or update a customer, returning its id
    pub async fn upsert(&self, data: CustomerUpsert) -> EngineResult<i64> {
        let data = normalize(data)?;
        let id = customer::upsert(&self.pool, &data, self.clock.now_millis()).await?;
        tracing::debug!(customer_id = id, "Customer upserted");
        Ok(id)
    }

    pub async fn find_by_national_id(&self, national_id: &str) -> EngineResult<Customer> {
        customer::find_by_national_id(&self.pool, national_id)
            .await?
            .ok_or_else(|| EngineError::customer_not_found(national_id))
    }

    /// Most recent ordered lines of a customer
    pub async fn history(&self, national_id: &str) -> EngineResult<Vec<CustomerHistoryEntry>> {
        let customer = self.find_by_national_id(national_id).await?;
        Ok(order::history_for_customer(&self.pool, customer.id, HISTORY_LIMIT).await?)
    }

    /// Append a feedback comment linked to the customer's latest visit
    pub async fn record_comment(&self, national_id: &str, comment: &str) -> EngineResult<CustomerComment> {
        let comment = comment.trim();
        validate_comment(comment)?;

        let now = self.clock.now_millis();
        let mut tx = self.pool.begin().await?;
        let customer_id = customer::lock_by_national_id(&mut *tx, national_id, now)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => EngineError::customer_not_found(national_id),
                other => other.into(),
            })?;
        let latest = occupancy::latest_for_customer(&mut *tx, customer_id).await?;
        let saved = customer::insert_comment(&mut *tx, customer_id, latest, comment, now).await?;
        tx.commit().await?;

        tracing::info!(customer_id, occupancy_id = ?latest, "Customer comment recorded");
        Ok(saved)
    }
}

/// Upsert inside the caller's transaction
pub async fn upsert_in(conn: &mut SqliteConnection, data: CustomerUpsert, now: i64) -> EngineResult<i64> {
    let data = normalize(data)?;
    Ok(customer::upsert(conn, &data, now).await?)
}

/// Validate and trim an upsert payload
fn normalize(data: CustomerUpsert) -> EngineResult<CustomerUpsert> {
    let national_id = data.national_id.trim().to_string();
    validate_required_text(&national_id, "national_id", MAX_SHORT_TEXT_LEN)?;

    let data = CustomerUpsert {
        national_id,
        name: normalize_optional(data.name),
        phone: normalize_optional(data.phone),
        email: normalize_optional(data.email),
    };
    validate_optional_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.email, "email", MAX_EMAIL_LEN)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::utils::ManualClock;
    use shared::error::ErrorCode;

    async fn directory() -> ClientDirectory {
        let db = DbService::in_memory().await.unwrap();
        ClientDirectory::new(db.pool, Arc::new(ManualClock::new(1_000)))
    }

    fn upsert(national_id: &str, name: Option<&str>, phone: Option<&str>) -> CustomerUpsert {
        CustomerUpsert {
            national_id: national_id.into(),
            name: name.map(Into::into),
            phone: phone.map(Into::into),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let dir = directory().await;
        let a = dir.upsert(upsert("1001", Some("Ana"), None)).await.unwrap();
        let b = dir.upsert(upsert("1001", Some("Ana"), None)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_upsert_never_blanks_existing_fields() {
        let dir = directory().await;
        dir.upsert(upsert("1001", Some("Ana"), Some("555-0101"))).await.unwrap();
        dir.upsert(upsert("1001", None, Some("  "))).await.unwrap();

        let c = dir.find_by_national_id("1001").await.unwrap();
        assert_eq!(c.name.as_deref(), Some("Ana"));
        assert_eq!(c.phone.as_deref(), Some("555-0101"));

        dir.upsert(upsert("1001", Some("Ana María"), None)).await.unwrap();
        let c = dir.find_by_national_id("1001").await.unwrap();
        assert_eq!(c.name.as_deref(), Some("Ana María"));
    }

    #[tokio::test]
    async fn test_upsert_requires_national_id() {
        let dir = directory().await;
        let err = dir.upsert(upsert("   ", Some("Ana"), None)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn test_unknown_customer_not_found() {
        let dir = directory().await;
        let err = dir.find_by_national_id("nope").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CustomerNotFound);
    }

    #[tokio::test]
    async fn test_record_comment() {
        let dir = directory().await;
        let id = dir.upsert(upsert("1001", Some("Ana"), None)).await.unwrap();

        let saved = dir.record_comment("1001", "  Great cookies ").await.unwrap();
        assert_eq!(saved.customer_id, id);
        assert_eq!(saved.comment, "Great cookies");
        assert_eq!(saved.occupancy_id, None);

        let err = dir.record_comment("1001", &"x".repeat(151)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CommentTooLong);

        let err = dir.record_comment("2002", "hello").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CustomerNotFound);
    }

    #[tokio::test]
    async fn test_history_of_customer_without_orders_is_empty() {
        let dir = directory().await;
        dir.upsert(upsert("1001", Some("Ana"), None)).await.unwrap();
        assert!(dir.history("1001").await.unwrap().is_empty());

        let err = dir.history("2002").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CustomerNotFound);
    }
}
