use sea_orm::TransactionTrait;

use crate::{
    CreateTransactionCmd, EngineError, MoneyCents, ResultEngine, TransactionAmount,
    TransactionKind, items::itemized_total, transactions::NewTransaction,
};

use super::{
    super::{Engine, compute_new_balance, normalize_optional_text, with_tx},
    TransactionCreated,
};

/// Validates the amount source and returns the transaction total.
fn resolve_amount(amount: &TransactionAmount) -> ResultEngine<MoneyCents> {
    match amount {
        TransactionAmount::Direct(value) => {
            if value.is_negative() {
                return Err(EngineError::InvalidAmount(
                    "amount must be >= 0".to_string(),
                ));
            }
            Ok(*value)
        }
        TransactionAmount::Itemized(items) => {
            if items.is_empty() {
                return Err(EngineError::InvalidItems(
                    "items must not be empty".to_string(),
                ));
            }
            for item in items {
                item.validate()?;
            }
            itemized_total(items)
        }
    }
}

impl Engine {
    /// Records a transaction and moves the owner balance accordingly.
    ///
    /// The ledger row, its items, the new balance and the refreshed
    /// aggregates are written in one DB transaction. An outcome larger than
    /// the current balance fails with `InsufficientFunds` before any write.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<TransactionCreated> {
        let amount = resolve_amount(&cmd.amount)?;
        let description = normalize_optional_text(cmd.description.as_deref());
        let at = cmd.created_at;

        with_tx!(self, |db_tx| {
            let owner = self.require_user(&db_tx, cmd.user_id).await?;
            let balance = MoneyCents::new(owner.balance_minor);
            if cmd.kind == TransactionKind::Outcome && balance < amount {
                return Err(EngineError::InsufficientFunds(format!(
                    "balance {balance} is lower than {amount}"
                )));
            }
            let new_balance = compute_new_balance(balance, cmd.kind, amount)?;

            let transaction = self
                .insert_transaction(
                    &db_tx,
                    &NewTransaction {
                        user_id: cmd.user_id,
                        kind: cmd.kind,
                        category: cmd.category.unwrap_or_default(),
                        description: description.as_deref(),
                        amount,
                        at,
                    },
                )
                .await?;

            let items = match &cmd.amount {
                TransactionAmount::Direct(_) => Vec::new(),
                TransactionAmount::Itemized(new_items) => {
                    self.insert_items(&db_tx, transaction.id, new_items, at)
                        .await?
                }
            };

            self.apply_balance_change(&db_tx, cmd.user_id, new_balance, at)
                .await?;
            self.refresh_aggregates(&db_tx, cmd.user_id).await?;

            tracing::debug!(
                user_id = cmd.user_id,
                transaction_id = transaction.id,
                kind = cmd.kind.as_str(),
                %amount,
                balance = %new_balance,
                "transaction created"
            );

            Ok(TransactionCreated {
                id: transaction.id,
                amount,
                balance: new_balance,
                items,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::NewItem;

    use super::*;

    #[test]
    fn negative_direct_amount_is_rejected() {
        let err = resolve_amount(&TransactionAmount::Direct(MoneyCents::new(-1))).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn empty_items_are_rejected() {
        let err = resolve_amount(&TransactionAmount::Itemized(Vec::new())).unwrap_err();
        assert!(matches!(err, EngineError::InvalidItems(_)));
    }

    #[test]
    fn itemized_amount_is_derived() {
        let items = vec![
            NewItem {
                name: "coffee".to_string(),
                category: None,
                price: MoneyCents::new(350),
                quantity: 2,
            },
            NewItem {
                name: "croissant".to_string(),
                category: None,
                price: MoneyCents::new(180),
                quantity: 1,
            },
        ];
        assert_eq!(
            resolve_amount(&TransactionAmount::Itemized(items)),
            Ok(MoneyCents::new(880))
        );
    }
}
