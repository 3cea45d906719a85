use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine, TransactionKind, users};

use super::Engine;

/// Computes the balance after applying `amount` in the direction of `kind`.
///
/// Income adds, outcome subtracts. Reversing a transaction is the same call
/// with [`TransactionKind::inverse`].
///
/// ```rust
/// use engine::{MoneyCents, TransactionKind, compute_new_balance};
///
/// let balance = MoneyCents::new(100_00);
/// let after = compute_new_balance(balance, TransactionKind::Outcome, MoneyCents::new(30_00)).unwrap();
/// assert_eq!(after, MoneyCents::new(70_00));
/// ```
pub fn compute_new_balance(
    current: MoneyCents,
    kind: TransactionKind,
    amount: MoneyCents,
) -> ResultEngine<MoneyCents> {
    let next = match kind {
        TransactionKind::Income => current.checked_add(amount),
        TransactionKind::Outcome => current.checked_sub(amount),
    };
    next.ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))
}

impl Engine {
    /// Overwrites the stored balance of `user_id`.
    ///
    /// `new_balance` must come from a balance read inside the same `db`
    /// transaction.
    pub(super) async fn apply_balance_change(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
        new_balance: MoneyCents,
        at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let user = users::ActiveModel {
            id: ActiveValue::Set(user_id),
            balance_minor: ActiveValue::Set(new_balance.cents()),
            updated_at: ActiveValue::Set(at),
            ..Default::default()
        };
        user.update(db).await?;
        Ok(())
    }
}
