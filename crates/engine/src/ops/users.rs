use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    CreateUserCmd, EngineError, FinancialProfile, ResultEngine, UpdateUserCmd, User,
    financial_profiles,
    passwords::{hash_password, verify_password},
    users,
};

use super::{Engine, with_tx};

const DEFAULT_AGE: i32 = 17;

/// A user together with their financial profile, if one was created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    pub user: User,
    pub profile: Option<FinancialProfile>,
}

impl Engine {
    /// Creates a user account with an opening balance.
    pub async fn create_user(&self, cmd: CreateUserCmd) -> ResultEngine<User> {
        let username = cmd.username.trim().to_string();
        if username.is_empty() {
            return Err(EngineError::InvalidUser(
                "username must not be empty".to_string(),
            ));
        }
        if cmd.password.is_empty() {
            return Err(EngineError::InvalidUser(
                "password must not be empty".to_string(),
            ));
        }
        if cmd.initial_balance.is_negative() {
            return Err(EngineError::InvalidAmount(
                "initial balance must be >= 0".to_string(),
            ));
        }
        let password = hash_password(&cmd.password)?;
        let now = Utc::now();

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                id: ActiveValue::NotSet,
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password),
                full_name: ActiveValue::Set(cmd.full_name.trim().to_string()),
                age: ActiveValue::Set(cmd.age.unwrap_or(DEFAULT_AGE)),
                balance_minor: ActiveValue::Set(cmd.initial_balance.cents()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(user_id = model.id, %username, "user created");
            Ok(User::from(model))
        })
    }

    /// Returns the user matching `username` and `password`, if any.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(&self.database)
            .await?;

        Ok(model
            .filter(|model| verify_password(password, &model.password))
            .map(User::from))
    }

    /// Edits username, full name and age of an existing user.
    ///
    /// A username taken by another account is `ExistingKey`.
    pub async fn update_user(&self, cmd: UpdateUserCmd) -> ResultEngine<User> {
        let username = cmd.username.as_deref().map(str::trim);
        if username.is_some_and(str::is_empty) {
            return Err(EngineError::InvalidUser(
                "username must not be empty".to_string(),
            ));
        }
        if cmd.age.is_some_and(|age| age < 0) {
            return Err(EngineError::InvalidUser("age must be >= 0".to_string()));
        }

        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, cmd.user_id).await?;

            if let Some(username) = username.filter(|name| *name != user.username) {
                let taken = users::Entity::find()
                    .filter(users::Column::Username.eq(username))
                    .one(&db_tx)
                    .await?;
                if taken.is_some() {
                    return Err(EngineError::ExistingKey(username.to_string()));
                }
            }

            let mut active: users::ActiveModel = user.into();
            if let Some(username) = username {
                active.username = ActiveValue::Set(username.to_string());
            }
            if let Some(full_name) = &cmd.full_name {
                active.full_name = ActiveValue::Set(full_name.trim().to_string());
            }
            if let Some(age) = cmd.age {
                active.age = ActiveValue::Set(age);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;

            tracing::debug!(user_id = model.id, "user updated");
            Ok(User::from(model))
        })
    }

    pub async fn user_detail(&self, user_id: i64) -> ResultEngine<UserDetail> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let profile = user
                .find_related(financial_profiles::Entity)
                .one(&db_tx)
                .await?;

            Ok(UserDetail {
                user: User::from(user),
                profile: profile.map(FinancialProfile::from),
            })
        })
    }
}
