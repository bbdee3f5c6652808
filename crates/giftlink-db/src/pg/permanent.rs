//! Permanent grant queries

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::PermanentGrantRow;
use crate::pg::PgAccessLedger;
use crate::repo::{CreatePermanentGrant, PermanentGrantRepository};

#[async_trait]
impl PermanentGrantRepository for PgAccessLedger {
    async fn find_active_permanent(&self, user_id: Uuid) -> DbResult<Option<PermanentGrantRow>> {
        let grant = sqlx::query_as::<_, PermanentGrantRow>(
            r#"
            SELECT id, user_id, purchased_at, amount_paid_cents, active, created_at
            FROM permanent_grants
            WHERE user_id = $1 AND active
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(grant)
    }

    async fn grant_permanent(&self, grant: CreatePermanentGrant) -> DbResult<PermanentGrantRow> {
        let row = sqlx::query_as::<_, PermanentGrantRow>(
            r#"
            INSERT INTO permanent_grants (id, user_id, amount_paid_cents)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, purchased_at, amount_paid_cents, active, created_at
            "#,
        )
        .bind(grant.id)
        .bind(grant.user_id)
        .bind(grant.amount_paid_cents)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    async fn revoke_permanent(&self, user_id: Uuid) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE permanent_grants
            SET active = FALSE
            WHERE user_id = $1 AND active
            "#,
        )
        .bind(user_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
