//! Per-user financial profile.
//!
//! Holds two kinds of data:
//! - fields the user edits (monthly income, savings, debt, goals, risk);
//! - ledger aggregates (`total_income_minor` / `total_outcome_minor`), which
//!   are always recomputed from the `transactions` table and never edited.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskManagement {
    Low,
    Medium,
    High,
}

impl RiskManagement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for RiskManagement {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(EngineError::InvalidRisk(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub user_id: i64,
    pub monthly_income: Option<MoneyCents>,
    pub current_savings: Option<MoneyCents>,
    pub debt: Option<MoneyCents>,
    pub financial_goals: Option<String>,
    pub risk_management: Option<RiskManagement>,
    pub total_income: MoneyCents,
    pub total_outcome: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user_financial_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub monthly_income_minor: Option<i64>,
    pub current_savings_minor: Option<i64>,
    pub debt_minor: Option<i64>,
    pub financial_goals: Option<String>,
    pub risk_management: Option<String>,
    pub total_income_minor: i64,
    pub total_outcome_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Empty profile row with zeroed aggregates.
    pub(crate) fn empty_for(user_id: i64) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            monthly_income_minor: ActiveValue::Set(None),
            current_savings_minor: ActiveValue::Set(None),
            debt_minor: ActiveValue::Set(None),
            financial_goals: ActiveValue::Set(None),
            risk_management: ActiveValue::Set(None),
            total_income_minor: ActiveValue::Set(0),
            total_outcome_minor: ActiveValue::Set(0),
        }
    }
}

impl From<Model> for FinancialProfile {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            monthly_income: model.monthly_income_minor.map(MoneyCents::new),
            current_savings: model.current_savings_minor.map(MoneyCents::new),
            debt: model.debt_minor.map(MoneyCents::new),
            financial_goals: model.financial_goals,
            // Unknown stored values are dropped rather than failing reads.
            risk_management: model
                .risk_management
                .as_deref()
                .and_then(|raw| RiskManagement::try_from(raw).ok()),
            total_income: MoneyCents::new(model.total_income_minor),
            total_outcome: MoneyCents::new(model.total_outcome_minor),
        }
    }
}
