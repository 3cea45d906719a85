use chrono::Utc;
use sea_orm::TransactionTrait;

use crate::{MoneyCents, ResultEngine, TransactionKind};

use super::{
    super::{Engine, compute_new_balance, with_tx},
    TransactionDeleted,
};

impl Engine {
    /// Deletes a transaction of `user_id` with its items and reverts its
    /// effect on the owner balance.
    ///
    /// Reverting an income may leave the balance negative.
    pub async fn delete_transaction(
        &self,
        transaction_id: i64,
        user_id: i64,
    ) -> ResultEngine<TransactionDeleted> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_transaction(&db_tx, transaction_id, user_id)
                .await?;
            let kind = TransactionKind::try_from(model.kind)?;
            let amount = MoneyCents::new(model.amount_minor);

            let owner = self.require_user(&db_tx, user_id).await?;
            let new_balance = compute_new_balance(
                MoneyCents::new(owner.balance_minor),
                kind.inverse(),
                amount,
            )?;

            self.delete_transaction_row(&db_tx, transaction_id).await?;
            self.apply_balance_change(&db_tx, user_id, new_balance, Utc::now())
                .await?;
            self.refresh_aggregates(&db_tx, user_id).await?;

            tracing::debug!(
                user_id,
                transaction_id,
                kind = kind.as_str(),
                %amount,
                balance = %new_balance,
                "transaction deleted"
            );

            Ok(TransactionDeleted {
                amount,
                balance: new_balance,
            })
        })
    }
}
