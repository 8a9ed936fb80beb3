//! # Settlement Repository
//!
//! Read access to persisted settlements and their denomination lines.
//!
//! Settlements are written only by the till repository's commit sequence;
//! this side never mutates them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;
use till_core::Money;

/// Repository for settlement queries.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    pool: SqlitePool,
}

impl SettlementRepository {
    /// Creates a new SettlementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementRepository { pool }
    }

    /// Gets a settlement by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SettlementRecord>> {
        let record = sqlx::query_as::<_, SettlementRecord>(
            r#"
            SELECT id, order_ref, total_minor, paid_minor, change_minor, created_at
            FROM settlements
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets the settlement for an order reference, if the order has been
    /// settled.
    pub async fn get_by_order_ref(&self, order_ref: &str) -> DbResult<Option<SettlementRecord>> {
        let record = sqlx::query_as::<_, SettlementRecord>(
            r#"
            SELECT id, order_ref, total_minor, paid_minor, change_minor, created_at
            FROM settlements
            WHERE order_ref = ?
            "#,
        )
        .bind(order_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a settlement's denomination lines, tendered side first, largest
    /// value first within each side.
    pub async fn lines(&self, settlement_id: &str) -> DbResult<Vec<SettlementLineRecord>> {
        let lines = sqlx::query_as::<_, SettlementLineRecord>(
            r#"
            SELECT id, settlement_id, denomination_id, value, count, direction, created_at
            FROM settlement_lines
            WHERE settlement_id = ?
            ORDER BY direction DESC, value DESC
            "#,
        )
        .bind(settlement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets the most recent settlements, newest first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<SettlementRecord>> {
        let records = sqlx::query_as::<_, SettlementRecord>(
            r#"
            SELECT id, order_ref, total_minor, paid_minor, change_minor, created_at
            FROM settlements
            ORDER BY created_at DESC, id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Record Types
// =============================================================================

/// One settled order as stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    pub id: String,
    pub order_ref: String,
    pub total_minor: i64,
    pub paid_minor: i64,
    pub change_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Order total as money.
    pub fn total(&self) -> Money {
        Money::from_minor(self.total_minor)
    }

    /// Amount tendered as money.
    pub fn paid(&self) -> Money {
        Money::from_minor(self.paid_minor)
    }

    /// Change handed back as money.
    pub fn change(&self) -> Money {
        Money::from_minor(self.change_minor)
    }
}

/// One denomination movement within a settlement. `direction` is `paid` for
/// cash entering the drawer and `change` for cash leaving it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLineRecord {
    pub id: String,
    pub settlement_id: String,
    pub denomination_id: String,
    pub value: i64,
    pub count: i64,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use till_core::{DenominationSet, PaymentLine};

    async fn settled_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let till = db.till();
        let legal = DenominationSet::default();

        till.deposit(20, 3).await.unwrap();
        let receipt = till
            .settle_order(
                "ORD-7001",
                Money::from_major(160),
                &[PaymentLine::new(100, 2)],
                &legal,
            )
            .await
            .unwrap();

        (db, receipt.settlement_id)
    }

    #[tokio::test]
    async fn test_get_by_order_ref_round_trips_amounts() {
        let (db, settlement_id) = settled_db().await;

        let record = db
            .settlements()
            .get_by_order_ref("ORD-7001")
            .await
            .unwrap()
            .expect("settled order");

        assert_eq!(record.id, settlement_id);
        assert_eq!(record.total(), Money::from_major(160));
        assert_eq!(record.paid(), Money::from_major(200));
        assert_eq!(record.change(), Money::from_major(40));

        assert!(db
            .settlements()
            .get_by_order_ref("ORD-MISSING")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lines_order_paid_side_first() {
        let (db, settlement_id) = settled_db().await;

        let lines = db.settlements().lines(&settlement_id).await.unwrap();
        let shape: Vec<(&str, i64, i64)> = lines
            .iter()
            .map(|line| (line.direction.as_str(), line.value, line.count))
            .collect();

        assert_eq!(shape, vec![("paid", 100, 2), ("change", 20, 2)]);
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let (db, _) = settled_db().await;
        let till = db.till();
        let legal = DenominationSet::default();

        till.settle_order(
            "ORD-7002",
            Money::from_major(20),
            &[PaymentLine::new(20, 1)],
            &legal,
        )
        .await
        .unwrap();

        let records = db.settlements().recent(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .any(|record| record.order_ref == "ORD-7002"));

        let one = db.settlements().recent(1).await.unwrap();
        assert_eq!(one.len(), 1);
    }

    #[tokio::test]
    async fn test_record_wire_shape() {
        let (db, _) = settled_db().await;

        let record = db
            .settlements()
            .get_by_order_ref("ORD-7001")
            .await
            .unwrap()
            .expect("settled order");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["orderRef"], "ORD-7001");
        assert_eq!(json["totalMinor"], 16000);
        assert_eq!(json["paidMinor"], 20000);
        assert_eq!(json["changeMinor"], 4000);
    }
}
