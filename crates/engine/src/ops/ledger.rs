//! Ledger store access.
//!
//! Every function takes the caller's open `DatabaseTransaction`, so a whole
//! create/delete (ledger rows, items, balance, aggregates) commits or rolls
//! back as one unit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    EngineError, Item, MoneyCents, NewItem, ResultEngine, Transaction, TransactionKind, items,
    transactions::{self, NewTransaction},
};

use super::Engine;

/// Upper bound of ids bound into one `IN (...)`; SQLite caps bind variables.
const ITEM_BATCH_SIZE: usize = 1000;

/// A `(kind, amount, created_at)` projection of one ledger row.
pub(super) struct LedgerRow {
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub created_at: DateTime<Utc>,
}

impl Engine {
    pub(super) async fn insert_transaction(
        &self,
        db: &DatabaseTransaction,
        new: &NewTransaction<'_>,
    ) -> ResultEngine<Transaction> {
        let model = transactions::ActiveModel::from(new).insert(db).await?;
        Transaction::try_from(model)
    }

    /// Inserts the line items of `transaction_id`, pricing each one.
    pub(super) async fn insert_items(
        &self,
        db: &DatabaseTransaction,
        transaction_id: i64,
        new_items: &[NewItem],
        at: DateTime<Utc>,
    ) -> ResultEngine<Vec<Item>> {
        if new_items.is_empty() {
            return Err(EngineError::InvalidItems(
                "items must not be empty".to_string(),
            ));
        }

        let mut out = Vec::with_capacity(new_items.len());
        for item in new_items {
            let model = items::ActiveModel::new_for(transaction_id, item, at)?
                .insert(db)
                .await?;
            out.push(Item::from(model));
        }
        Ok(out)
    }

    pub(super) async fn find_transaction_by_id(
        &self,
        db: &DatabaseTransaction,
        transaction_id: i64,
    ) -> ResultEngine<Option<transactions::Model>> {
        transactions::Entity::find_by_id(transaction_id)
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Lists the ledger of `user_id` by ascending id (insertion order).
    pub(super) async fn select_transactions(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_asc(transactions::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        if let Some(offset) = offset {
            query = query.offset(offset);
        }

        query
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Loads the items of all `transaction_ids` grouped by parent
    /// transaction, one query per [`ITEM_BATCH_SIZE`] ids.
    pub(super) async fn items_for_transactions(
        &self,
        db: &DatabaseTransaction,
        transaction_ids: &[i64],
    ) -> ResultEngine<HashMap<i64, Vec<Item>>> {
        let mut grouped: HashMap<i64, Vec<Item>> = HashMap::new();

        for batch in transaction_ids.chunks(ITEM_BATCH_SIZE) {
            let models = items::Entity::find()
                .filter(items::Column::TransactionId.is_in(batch.iter().copied()))
                .order_by_asc(items::Column::Id)
                .all(db)
                .await?;
            for model in models {
                grouped
                    .entry(model.transaction_id)
                    .or_default()
                    .push(Item::from(model));
            }
        }
        Ok(grouped)
    }

    /// Deletes the items of a transaction, then the transaction row.
    pub(super) async fn delete_transaction_row(
        &self,
        db: &DatabaseTransaction,
        transaction_id: i64,
    ) -> ResultEngine<()> {
        items::Entity::delete_many()
            .filter(items::Column::TransactionId.eq(transaction_id))
            .exec(db)
            .await?;
        let result = transactions::Entity::delete_by_id(transaction_id)
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "transaction not exists".to_string(),
            ));
        }
        Ok(())
    }

    pub(super) async fn count_transactions(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<u64> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .count(db)
            .await
            .map_err(Into::into)
    }

    /// Projects the ledger of `user_id` to `(kind, amount, created_at)`,
    /// optionally only rows created at or after `since`.
    pub(super) async fn ledger_rows(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<LedgerRow>> {
        let mut query = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Kind)
            .column(transactions::Column::AmountMinor)
            .column(transactions::Column::CreatedAt)
            .filter(transactions::Column::UserId.eq(user_id));
        if let Some(since) = since {
            query = query.filter(transactions::Column::CreatedAt.gte(since));
        }

        let rows: Vec<(i32, i64, DateTime<Utc>)> = query.into_tuple().all(db).await?;
        rows.into_iter()
            .map(|(kind, amount_minor, created_at)| {
                Ok(LedgerRow {
                    kind: TransactionKind::try_from(kind)?,
                    amount: MoneyCents::new(amount_minor),
                    created_at,
                })
            })
            .collect()
    }
}
