use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, transactions, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Loads a transaction and checks it belongs to `user_id`.
    ///
    /// A missing row is `KeyNotFound`; a row owned by someone else is
    /// `Forbidden`.
    pub(super) async fn require_owned_transaction(
        &self,
        db: &DatabaseTransaction,
        transaction_id: i64,
        user_id: i64,
    ) -> ResultEngine<transactions::Model> {
        let model = self
            .find_transaction_by_id(db, transaction_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(
                "transaction belongs to another user".to_string(),
            ));
        }
        Ok(model)
    }
}
