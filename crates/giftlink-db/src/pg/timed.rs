//! Timed grant queries

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::TimedGrantRow;
use crate::pg::PgAccessLedger;
use crate::repo::{CreateTimedGrant, TimedGrantRepository};

#[async_trait]
impl TimedGrantRepository for PgAccessLedger {
    async fn find_active_timed(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DbResult<Option<TimedGrantRow>> {
        let grant = sqlx::query_as::<_, TimedGrantRow>(
            r#"
            SELECT id, user_id, kind, start_time, end_time, active, created_at
            FROM timed_grants
            WHERE user_id = $1 AND active AND end_time > $2
            ORDER BY end_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        Ok(grant)
    }

    async fn grant_timed(&self, grant: CreateTimedGrant) -> DbResult<TimedGrantRow> {
        let row = sqlx::query_as::<_, TimedGrantRow>(
            r#"
            INSERT INTO timed_grants (id, user_id, kind, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, kind, start_time, end_time, active, created_at
            "#,
        )
        .bind(grant.id)
        .bind(grant.user_id)
        .bind(&grant.kind)
        .bind(grant.start_time)
        .bind(grant.end_time)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    async fn expire_timed(&self, user_id: Uuid, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE timed_grants
            SET active = FALSE
            WHERE user_id = $1 AND active AND end_time <= $2
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
