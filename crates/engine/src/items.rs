//! Transaction line items.
//!
//! An [`Item`] belongs to exactly one itemized transaction and is created and
//! deleted together with it. `subtotal = price × quantity` is always computed
//! by the engine.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub transaction_id: i64,
    pub name: String,
    pub category: Category,
    pub price: MoneyCents,
    pub quantity: i64,
    pub subtotal: MoneyCents,
}

/// A line item as submitted by a client, before it is priced and stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: Option<Category>,
    pub price: MoneyCents,
    pub quantity: i64,
}

impl NewItem {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidItems(
                "item name must not be empty".to_string(),
            ));
        }
        if self.price.is_negative() {
            return Err(EngineError::InvalidItems(format!(
                "price of '{}' must be >= 0",
                self.name.trim()
            )));
        }
        if self.quantity <= 0 {
            return Err(EngineError::InvalidItems(format!(
                "quantity of '{}' must be > 0",
                self.name.trim()
            )));
        }
        Ok(())
    }

    pub(crate) fn subtotal(&self) -> ResultEngine<MoneyCents> {
        self.price
            .checked_mul(self.quantity)
            .ok_or_else(|| EngineError::InvalidAmount("item subtotal too large".to_string()))
    }
}

/// Sums `price × quantity` over `items`, rejecting overflow.
pub(crate) fn itemized_total(items: &[NewItem]) -> ResultEngine<MoneyCents> {
    items.iter().try_fold(MoneyCents::ZERO, |acc, item| {
        acc.checked_add(item.subtotal()?)
            .ok_or_else(|| EngineError::InvalidAmount("transaction total too large".to_string()))
    })
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transaction_id: i64,
    pub item_name: String,
    pub category: String,
    pub price_minor: i64,
    pub quantity: i64,
    pub subtotal_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_for(
        transaction_id: i64,
        item: &NewItem,
        at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: ActiveValue::NotSet,
            transaction_id: ActiveValue::Set(transaction_id),
            item_name: ActiveValue::Set(item.name.trim().to_string()),
            category: ActiveValue::Set(item.category.unwrap_or_default().as_str().to_string()),
            price_minor: ActiveValue::Set(item.price.cents()),
            quantity: ActiveValue::Set(item.quantity),
            subtotal_minor: ActiveValue::Set(item.subtotal()?.cents()),
            created_at: ActiveValue::Set(at),
            updated_at: ActiveValue::Set(at),
        })
    }
}

impl From<Model> for Item {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            transaction_id: model.transaction_id,
            name: model.item_name,
            category: Category::try_from(model.category.as_str()).unwrap_or_default(),
            price: MoneyCents::new(model.price_minor),
            quantity: model.quantity,
            subtotal: MoneyCents::new(model.subtotal_minor),
        }
    }
}
