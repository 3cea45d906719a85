//! Transaction primitives.
//!
//! A `Transaction` is a single ledger row owned by one user. Its amount moves
//! the owner balance up (income) or down (outcome). Itemized transactions
//! carry their line [`Item`](crate::Item)s.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, Item, MoneyCents, ResultEngine};

/// Direction of a transaction.
///
/// Persisted as an integer: `0` = income, `1` = outcome. The integer code
/// never leaves this module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Outcome,
}

impl TransactionKind {
    pub const fn code(self) -> i32 {
        match self {
            Self::Income => 0,
            Self::Outcome => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }

    /// The kind that undoes this one (used when a transaction is deleted).
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Income => Self::Outcome,
            Self::Outcome => Self::Income,
        }
    }
}

impl TryFrom<i32> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Income),
            1 => Ok(Self::Outcome),
            other => Err(EngineError::InvalidKind(format!(
                "unknown transaction kind code: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: Option<String>,
    pub amount: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub kind: i32,
    pub category: String,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::items::Entity")]
    Items,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload for a new ledger row; the id is assigned by the store.
pub(crate) struct NewTransaction<'a> {
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: Option<&'a str>,
    pub amount: MoneyCents,
    pub at: DateTime<Utc>,
}

impl From<&NewTransaction<'_>> for ActiveModel {
    fn from(tx: &NewTransaction<'_>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(tx.user_id),
            kind: ActiveValue::Set(tx.kind.code()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            description: ActiveValue::Set(tx.description.map(ToString::to_string)),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            created_at: ActiveValue::Set(tx.at),
            updated_at: ActiveValue::Set(tx.at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind)?,
            category: Category::try_from(model.category.as_str()).unwrap_or_default(),
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
            items: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_are_fixed() {
        assert_eq!(TransactionKind::Income.code(), 0);
        assert_eq!(TransactionKind::Outcome.code(), 1);
        assert_eq!(TransactionKind::try_from(0), Ok(TransactionKind::Income));
        assert_eq!(TransactionKind::try_from(1), Ok(TransactionKind::Outcome));
        assert!(TransactionKind::try_from(2).is_err());
    }

    #[test]
    fn inverse_swaps_direction() {
        assert_eq!(TransactionKind::Income.inverse(), TransactionKind::Outcome);
        assert_eq!(TransactionKind::Outcome.inverse(), TransactionKind::Income);
    }

    #[test]
    fn unknown_stored_category_falls_back_to_others() {
        let now = Utc::now();
        let model = Model {
            id: 1,
            user_id: 7,
            kind: 1,
            category: "legacy".to_string(),
            description: None,
            amount_minor: 250,
            created_at: now,
            updated_at: now,
        };
        let tx = Transaction::try_from(model).unwrap();
        assert_eq!(tx.kind, TransactionKind::Outcome);
        assert_eq!(tx.category, Category::Others);
        assert_eq!(tx.amount, MoneyCents::new(250));
    }
}
