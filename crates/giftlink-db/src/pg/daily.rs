//! Daily free counter queries

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::DailyFreeRow;
use crate::pg::PgAccessLedger;
use crate::repo::DailyFreeRepository;

#[async_trait]
impl DailyFreeRepository for PgAccessLedger {
    async fn free_used_on(&self, user_id: Uuid, day: NaiveDate) -> DbResult<i64> {
        let result: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT used_count
            FROM daily_free_counters
            WHERE user_id = $1 AND day = $2
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_optional(self.pool())
        .await?;

        Ok(result.map_or(0, |r| r.0))
    }

    async fn try_use_free(&self, user_id: Uuid, day: NaiveDate, limit: i64) -> DbResult<bool> {
        // Upsert and increment in one statement; the WHERE clause makes the
        // conflict arm a no-op once the counter reaches the limit, so the
        // affected-row count distinguishes "claimed" from "already at limit".
        let result = sqlx::query(
            r#"
            INSERT INTO daily_free_counters (id, user_id, day, used_count)
            VALUES (gen_random_uuid(), $1, $2, 1)
            ON CONFLICT (user_id, day)
            DO UPDATE SET used_count = daily_free_counters.used_count + 1
            WHERE daily_free_counters.used_count < $3
            "#,
        )
        .bind(user_id)
        .bind(day)
        .bind(limit)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn free_counter(&self, user_id: Uuid, day: NaiveDate) -> DbResult<Option<DailyFreeRow>> {
        let row = sqlx::query_as::<_, DailyFreeRow>(
            r#"
            SELECT id, user_id, day, used_count, created_at
            FROM daily_free_counters
            WHERE user_id = $1 AND day = $2
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }
}
