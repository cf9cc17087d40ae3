use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Context, Direction, Payment};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::connection::DbConnection;
use crate::storage::traits::PaymentStorage;

/// Payment storage backed by the `payments`/`accounts` tables and the
/// `send_payment_proc` stored procedure.
#[derive(Clone)]
pub struct PostgresStorage {
    db: DbConnection,
}

impl PostgresStorage {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn close(&self) {
        self.db.close().await;
    }

    fn payment_from_row(row: &PgRow) -> Result<Payment> {
        let id: i64 = row.try_get("id")?;
        let direction: i16 = row.try_get("direction")?;
        let direction = u16::try_from(direction)
            .map_err(|_| anyhow!("negative payment direction: {}", direction))
            .and_then(|d| Direction::try_from(d).map_err(|e| anyhow!(e)))?;

        Ok(Payment {
            id: u64::try_from(id).map_err(|_| anyhow!("negative payment id: {}", id))?,
            from_account: row.try_get("from_account")?,
            amount: row.try_get::<Decimal, _>("amount")?,
            to_account: row.try_get("to_account")?,
            direction,
            dt: row.try_get::<Option<DateTime<Utc>>, _>("dt")?,
        })
    }
}

#[async_trait]
impl PaymentStorage for PostgresStorage {
    async fn get_all_payments(&self, ctx: &Context) -> Result<Vec<Payment>> {
        let rows = ctx
            .run(
                sqlx::query(
                    r#"
                    SELECT id::BIGINT AS id, from_account, to_account,
                           amount::NUMERIC AS amount, direction::SMALLINT AS direction,
                           dt::TIMESTAMPTZ AS dt
                    FROM payments
                    "#,
                )
                .fetch_all(self.db.pool()),
            )
            .await?
            .context("failed to get payments")?;

        rows.iter().map(Self::payment_from_row).collect()
    }

    async fn send_payment(&self, ctx: &Context, payment: &Payment) -> Result<()> {
        ctx.run(
            sqlx::query("CALL send_payment_proc($1, $2, $3, $4)")
                .bind(&payment.from_account)
                .bind(&payment.to_account)
                .bind(payment.amount)
                .bind(u16::from(payment.direction) as i16)
                .execute(self.db.pool()),
        )
        .await?
        .context("failed to call send_payment_proc")?;
        Ok(())
    }

    async fn get_available_accounts(&self, ctx: &Context) -> Result<Vec<String>> {
        let rows = ctx
            .run(sqlx::query("SELECT id::TEXT AS id FROM accounts").fetch_all(self.db.pool()))
            .await?
            .context("failed to get accounts")?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("id").map_err(Into::into))
            .collect()
    }
}
