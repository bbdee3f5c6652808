//! Token balance queries

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::TokenBalanceRow;
use crate::pg::PgAccessLedger;
use crate::repo::TokenBalanceRepository;

#[async_trait]
impl TokenBalanceRepository for PgAccessLedger {
    async fn token_balance(&self, user_id: Uuid) -> DbResult<Option<TokenBalanceRow>> {
        let row = sqlx::query_as::<_, TokenBalanceRow>(
            r#"
            SELECT user_id, tokens, total_consumed, updated_at
            FROM token_balances
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    async fn credit_tokens(&self, user_id: Uuid, amount: i64) -> DbResult<TokenBalanceRow> {
        let row = sqlx::query_as::<_, TokenBalanceRow>(
            r#"
            INSERT INTO token_balances (user_id, tokens)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET tokens = token_balances.tokens + EXCLUDED.tokens,
                          updated_at = NOW()
            RETURNING user_id, tokens, total_consumed, updated_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    async fn try_spend_token(&self, user_id: Uuid) -> DbResult<bool> {
        // Decrement and account in one guarded statement; tokens can never
        // go negative because the predicate and the write are one operation.
        let result = sqlx::query(
            r#"
            UPDATE token_balances
            SET tokens = tokens - 1,
                total_consumed = total_consumed + 1,
                updated_at = NOW()
            WHERE user_id = $1 AND tokens > 0
            "#,
        )
        .bind(user_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
