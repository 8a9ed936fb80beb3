//! # Till Repository
//!
//! Database operations for denomination stock and order settlement.
//!
//! ## Settlement Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     settle_order (one transaction)                      │
//! │                                                                         │
//! │  1. FREEZE STOCK                                                        │
//! │     └── SELECT denominations → TillSnapshot                             │
//! │                                                                         │
//! │  2. RUN ENGINE                                                          │
//! │     └── till_core::settle_with(total, payment, snapshot, legal)         │
//! │     └── Err → rollback, nothing persisted                               │
//! │                                                                         │
//! │  3. WRITE BACK                                                          │
//! │     └── paid lines:   available_count += count (row created if new)     │
//! │     └── change lines: available_count -= count                          │
//! │     └── INSERT settlement + settlement_lines                            │
//! │                                                                         │
//! │  4. COMMIT                                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine reads the snapshot frozen in step 1 and the write-back runs on
//! the same transaction, so the counts it reasoned about are the counts it
//! mutates. The `available_count >= 0` schema constraint rejects any
//! decrement past zero that would slip through regardless.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::settle::{settle_with, SettleOptions};
use till_core::{DenominationSet, Money, PaymentLine, Settlement, StockLevel, TillSnapshot};

/// Repository for denomination stock and settlement commits.
#[derive(Debug, Clone)]
pub struct TillRepository {
    pool: SqlitePool,
}

impl TillRepository {
    /// Creates a new TillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TillRepository { pool }
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Reads the full denomination stock, largest value first.
    ///
    /// Zero-count rows are included: values the shop knows anchor the
    /// top-up suggestion bound even when no pieces are currently held.
    pub async fn snapshot(&self) -> DbResult<TillSnapshot> {
        let rows: Vec<DenominationRow> = sqlx::query_as::<_, DenominationRow>(
            r#"
            SELECT id, value, available_count, created_at, updated_at
            FROM denominations
            ORDER BY value DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(TillSnapshot::new(rows.iter().map(stock_level).collect()))
    }

    /// Creates a zero-count stock row for every legal value that has none
    /// yet. Returns how many rows were created.
    ///
    /// Run at startup so the drawer's known-value set matches configured
    /// legal tender before any cash arrives.
    pub async fn ensure_denominations(&self, legal: &DenominationSet) -> DbResult<u64> {
        let now = Utc::now();
        let mut created = 0;

        for value in legal.values_desc() {
            let result = sqlx::query(
                r#"
                INSERT INTO denominations (id, value, available_count, created_at, updated_at)
                VALUES (?, ?, 0, ?, ?)
                ON CONFLICT(value) DO NOTHING
                "#,
            )
            .bind(generate_id())
            .bind(value)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;
            created += result.rows_affected();
        }

        debug!(created, legal = legal.len(), "Ensured denomination rows");
        Ok(created)
    }

    /// Adds pieces of one denomination to the drawer (float top-up),
    /// creating the stock row if the value is new.
    ///
    /// Counts must be positive; cash only leaves the drawer through
    /// settlements.
    pub async fn deposit(&self, value: i64, count: i64) -> DbResult<StockLevel> {
        if count <= 0 {
            return Err(DbError::CheckViolation {
                message: format!("deposit count must be positive, got {count}"),
            });
        }

        let now = Utc::now();
        let row: DenominationRow = sqlx::query_as::<_, DenominationRow>(
            r#"
            INSERT INTO denominations (id, value, available_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(value) DO UPDATE SET
                available_count = available_count + excluded.available_count,
                updated_at = excluded.updated_at
            RETURNING id, value, available_count, created_at, updated_at
            "#,
        )
        .bind(generate_id())
        .bind(value)
        .bind(count)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(value = row.value, count = row.available_count, "Deposited stock");
        Ok(stock_level(&row))
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Settles an order with default engine options. See [`settle_order_with`].
    ///
    /// [`settle_order_with`]: TillRepository::settle_order_with
    pub async fn settle_order(
        &self,
        order_ref: &str,
        total: Money,
        payment: &[PaymentLine],
        legal: &DenominationSet,
    ) -> DbResult<SettlementReceipt> {
        self.settle_order_with(order_ref, total, payment, legal, &SettleOptions::default())
            .await
    }

    /// Runs the change engine against current stock and commits the outcome
    /// atomically: stock deltas, settlement header, and per-denomination
    /// lines all land in one transaction.
    ///
    /// An engine refusal surfaces as [`DbError::Rejected`] and rolls the
    /// transaction back, leaving stock untouched. `order_ref` is unique;
    /// settling the same order twice fails the second commit.
    pub async fn settle_order_with(
        &self,
        order_ref: &str,
        total: Money,
        payment: &[PaymentLine],
        legal: &DenominationSet,
        options: &SettleOptions,
    ) -> DbResult<SettlementReceipt> {
        debug!(order_ref = %order_ref, total = %total, lines = payment.len(), "Settling order");

        let mut tx = self.pool.begin().await?;

        // Freeze stock inside the transaction so the engine and the
        // write-back see the same counts.
        let rows: Vec<DenominationRow> = sqlx::query_as::<_, DenominationRow>(
            r#"
            SELECT id, value, available_count, created_at, updated_at
            FROM denominations
            ORDER BY value DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let snapshot = TillSnapshot::new(rows.iter().map(stock_level).collect());

        // A refusal here propagates out before any write; dropping the
        // transaction rolls it back.
        let settlement = settle_with(total, payment, &snapshot, legal, options)?;

        let mut row_ids: HashMap<i64, String> =
            rows.into_iter().map(|row| (row.value, row.id)).collect();
        let now = Utc::now();

        // Tendered cash enters the drawer first. A legal value the shop has
        // no row for yet gets one, so every line below resolves a storage id.
        for line in &settlement.paid {
            match row_ids.get(&line.value) {
                Some(id) => {
                    sqlx::query(
                        r#"
                        UPDATE denominations
                        SET available_count = available_count + ?, updated_at = ?
                        WHERE id = ?
                        "#,
                    )
                    .bind(line.count)
                    .bind(now)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    let id = generate_id();
                    sqlx::query(
                        r#"
                        INSERT INTO denominations (id, value, available_count, created_at, updated_at)
                        VALUES (?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(&id)
                    .bind(line.value)
                    .bind(line.count)
                    .bind(now)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                    row_ids.insert(line.value, id);
                }
            }
        }

        // Change leaves the drawer. Every change value is in `row_ids` by
        // now (it came from stock or from the paid pass above); the schema
        // rejects any decrement past zero.
        for line in &settlement.change {
            let Some(id) = row_ids.get(&line.value) else {
                return Err(DbError::not_found("Denomination", line.value.to_string()));
            };

            let result = sqlx::query(
                r#"
                UPDATE denominations
                SET available_count = available_count - ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(line.count)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Denomination", id));
            }
        }

        let settlement_id = generate_id();
        sqlx::query(
            r#"
            INSERT INTO settlements (id, order_ref, total_minor, paid_minor, change_minor, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&settlement_id)
        .bind(order_ref)
        .bind(total.minor())
        .bind(settlement.paid_amount.minor())
        .bind(settlement.balance.minor())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (direction, lines) in [("paid", &settlement.paid), ("change", &settlement.change)] {
            for line in lines.iter() {
                let Some(denomination_id) = row_ids.get(&line.value) else {
                    return Err(DbError::not_found("Denomination", line.value.to_string()));
                };

                sqlx::query(
                    r#"
                    INSERT INTO settlement_lines (id, settlement_id, denomination_id, value, count, direction, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(generate_id())
                .bind(&settlement_id)
                .bind(denomination_id)
                .bind(line.value)
                .bind(line.count)
                .bind(direction)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!(
            order_ref = %order_ref,
            settlement_id = %settlement_id,
            paid = %settlement.paid_amount,
            change = %settlement.balance,
            "Order settled"
        );

        Ok(SettlementReceipt {
            settlement_id,
            order_ref: order_ref.to_string(),
            settlement,
        })
    }
}

// =============================================================================
// Record Types
// =============================================================================

/// One denomination stock row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DenominationRow {
    pub id: String,
    pub value: i64,
    pub available_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What [`TillRepository::settle_order`] persisted: the engine outcome plus
/// the settlement's storage identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub settlement_id: String,
    pub order_ref: String,
    pub settlement: Settlement,
}

// =============================================================================
// Helpers
// =============================================================================

fn stock_level(row: &DenominationRow) -> StockLevel {
    StockLevel::with_id(row.id.clone(), row.value, row.available_count)
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use till_core::CoreError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn pairs(snapshot: &TillSnapshot) -> Vec<(i64, i64)> {
        snapshot
            .entries()
            .iter()
            .map(|row| (row.value, row.count))
            .collect()
    }

    async fn count(db: &Database, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_denominations_is_idempotent() {
        let db = test_db().await;
        let till = db.till();
        let legal = DenominationSet::default();

        let created = till.ensure_denominations(&legal).await.unwrap();
        assert_eq!(created, 9);

        let created_again = till.ensure_denominations(&legal).await.unwrap();
        assert_eq!(created_again, 0);

        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(snapshot.entries().len(), 9);
        assert!(snapshot.entries().iter().all(|row| row.count == 0));
        assert!(snapshot
            .entries()
            .iter()
            .all(|row| row.denomination_id.is_some()));
    }

    #[tokio::test]
    async fn test_deposit_creates_then_accumulates() {
        let db = test_db().await;
        let till = db.till();

        let first = till.deposit(100, 2).await.unwrap();
        assert_eq!(first.count, 2);

        let second = till.deposit(100, 3).await.unwrap();
        assert_eq!(second.count, 5);
        assert_eq!(second.denomination_id, first.denomination_id);

        till.deposit(50, 1).await.unwrap();

        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(pairs(&snapshot), vec![(100, 5), (50, 1)]);
    }

    #[tokio::test]
    async fn test_deposit_rejects_non_positive_count() {
        let db = test_db().await;
        let till = db.till();

        let err = till.deposit(100, 0).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_settle_order_commits_stock_and_lines() {
        let db = test_db().await;
        let till = db.till();
        let legal = DenominationSet::default();

        till.deposit(100, 1).await.unwrap();
        till.deposit(50, 1).await.unwrap();
        till.deposit(20, 2).await.unwrap();

        let receipt = till
            .settle_order(
                "ORD-1001",
                Money::from_major(30),
                &[PaymentLine::new(200, 1)],
                &legal,
            )
            .await
            .unwrap();

        assert_eq!(receipt.order_ref, "ORD-1001");
        assert_eq!(receipt.settlement.paid_amount, Money::from_major(200));
        assert_eq!(receipt.settlement.balance, Money::from_major(170));

        let change: Vec<(i64, i64)> = receipt
            .settlement
            .change
            .iter()
            .map(|line| (line.value, line.count))
            .collect();
        assert_eq!(change, vec![(100, 1), (50, 1), (20, 1)]);

        // The tendered 200 had no stock row; settlement created one.
        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(pairs(&snapshot), vec![(200, 1), (100, 0), (50, 0), (20, 1)]);

        assert_eq!(count(&db, "SELECT COUNT(*) FROM settlements").await, 1);
        assert_eq!(
            count(
                &db,
                "SELECT COUNT(*) FROM settlement_lines WHERE direction = 'paid'"
            )
            .await,
            1
        );
        assert_eq!(
            count(
                &db,
                "SELECT COUNT(*) FROM settlement_lines WHERE direction = 'change'"
            )
            .await,
            3
        );
        // Every line resolved a real denomination row.
        assert_eq!(
            count(
                &db,
                "SELECT COUNT(*) FROM settlement_lines l \
                 JOIN denominations d ON d.id = l.denomination_id"
            )
            .await,
            4
        );
    }

    #[tokio::test]
    async fn test_settle_order_single_note_change_drawer_state() {
        let db = test_db().await;
        let till = db.till();
        let legal = DenominationSet::default();

        till.deposit(100, 1).await.unwrap();
        till.deposit(50, 1).await.unwrap();
        till.deposit(20, 2).await.unwrap();

        let receipt = till
            .settle_order(
                "ORD-1002",
                Money::from_major(180),
                &[PaymentLine::new(200, 1)],
                &legal,
            )
            .await
            .unwrap();

        assert_eq!(receipt.settlement.balance, Money::from_major(20));
        let change: Vec<(i64, i64)> = receipt
            .settlement
            .change
            .iter()
            .map(|line| (line.value, line.count))
            .collect();
        assert_eq!(change, vec![(20, 1)]);

        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(pairs(&snapshot), vec![(200, 1), (100, 1), (50, 1), (20, 1)]);
    }

    #[tokio::test]
    async fn test_settle_order_rejection_rolls_back() {
        let db = test_db().await;
        let till = db.till();
        let legal = DenominationSet::default();

        till.deposit(20, 1).await.unwrap();

        let err = till
            .settle_order(
                "ORD-2001",
                Money::from_major(100),
                &[PaymentLine::new(50, 1)],
                &legal,
            )
            .await
            .unwrap_err();

        assert!(err.is_rejection());
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientPayment { .. })
        ));

        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(pairs(&snapshot), vec![(20, 1)]);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM settlements").await, 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM settlement_lines").await, 0);
    }

    #[tokio::test]
    async fn test_settle_order_same_ref_fails_second_commit() {
        let db = test_db().await;
        let till = db.till();
        let legal = DenominationSet::default();

        till.deposit(10, 5).await.unwrap();

        let receipt = till
            .settle_order(
                "ORD-3001",
                Money::from_major(10),
                &[PaymentLine::new(10, 1)],
                &legal,
            )
            .await
            .unwrap();
        assert!(receipt.settlement.change.is_empty());

        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(pairs(&snapshot), vec![(10, 6)]);

        let err = till
            .settle_order(
                "ORD-3001",
                Money::from_major(10),
                &[PaymentLine::new(10, 1)],
                &legal,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The duplicate's stock increment rolled back with it.
        let snapshot = till.snapshot().await.unwrap();
        assert_eq!(pairs(&snapshot), vec![(10, 6)]);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM settlements").await, 1);
    }
}
