use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, FinancialProfile, MoneyCents, ResultEngine, RiskManagement,
    UpdateFinancialProfileCmd, financial_profiles,
};

use super::{
    Engine, normalize_optional_text,
    statistics::{YearMonth, sum_by_kind},
    with_tx,
};

/// Snapshot handed to advice consumers: the current month of the ledger,
/// the lifetime aggregates and what the user declared in their profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub user_id: i64,
    pub balance: MoneyCents,
    pub month_income: MoneyCents,
    pub month_outcome: MoneyCents,
    pub total_income: MoneyCents,
    pub total_outcome: MoneyCents,
    pub declared_monthly_income: Option<MoneyCents>,
    pub current_savings: Option<MoneyCents>,
    pub debt: Option<MoneyCents>,
    pub financial_goals: Option<String>,
    pub risk_management: Option<RiskManagement>,
}

fn ensure_non_negative(value: Option<MoneyCents>, label: &str) -> ResultEngine<()> {
    if value.is_some_and(MoneyCents::is_negative) {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}

impl Engine {
    async fn find_financial_profile(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<Option<financial_profiles::Model>> {
        financial_profiles::Entity::find()
            .filter(financial_profiles::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Returns the profile row of `user_id`, creating an empty one if absent.
    async fn ensure_financial_profile(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<financial_profiles::Model> {
        if let Some(model) = self.find_financial_profile(db, user_id).await? {
            return Ok(model);
        }
        financial_profiles::ActiveModel::empty_for(user_id)
            .insert(db)
            .await
            .map_err(Into::into)
    }

    /// Recomputes `total_income` / `total_outcome` of `user_id` from the
    /// ledger and stores them. Safe to run any number of times.
    pub(super) async fn refresh_aggregates(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<financial_profiles::Model> {
        let profile = self.ensure_financial_profile(db, user_id).await?;
        let rows = self.ledger_rows(db, user_id, None).await?;
        let (total_income, total_outcome) = sum_by_kind(&rows)?;

        let mut active: financial_profiles::ActiveModel = profile.into();
        active.total_income_minor = ActiveValue::Set(total_income.cents());
        active.total_outcome_minor = ActiveValue::Set(total_outcome.cents());
        let model = active.update(db).await?;

        tracing::debug!(
            user_id,
            %total_income,
            %total_outcome,
            "refreshed financial aggregates"
        );
        Ok(model)
    }

    /// Recomputes the aggregates of `user_id` in their own DB transaction.
    pub async fn refresh_financial_aggregates(
        &self,
        user_id: i64,
    ) -> ResultEngine<FinancialProfile> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model = self.refresh_aggregates(&db_tx, user_id).await?;
            Ok(FinancialProfile::from(model))
        })
    }

    pub async fn financial_profile(&self, user_id: i64) -> ResultEngine<Option<FinancialProfile>> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model = self.find_financial_profile(&db_tx, user_id).await?;
            Ok(model.map(FinancialProfile::from))
        })
    }

    /// Creates the profile if needed and overwrites its user-editable fields.
    ///
    /// Aggregates are left as they are.
    pub async fn update_financial_profile(
        &self,
        cmd: UpdateFinancialProfileCmd,
    ) -> ResultEngine<FinancialProfile> {
        ensure_non_negative(cmd.monthly_income, "monthly_income")?;
        ensure_non_negative(cmd.current_savings, "current_savings")?;
        ensure_non_negative(cmd.debt, "debt")?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            let profile = self.ensure_financial_profile(&db_tx, cmd.user_id).await?;

            let mut active: financial_profiles::ActiveModel = profile.into();
            active.monthly_income_minor = ActiveValue::Set(cmd.monthly_income.map(MoneyCents::cents));
            active.current_savings_minor =
                ActiveValue::Set(cmd.current_savings.map(MoneyCents::cents));
            active.debt_minor = ActiveValue::Set(cmd.debt.map(MoneyCents::cents));
            active.financial_goals =
                ActiveValue::Set(normalize_optional_text(cmd.financial_goals.as_deref()));
            active.risk_management = ActiveValue::Set(
                cmd.risk_management
                    .map(|risk| risk.as_str().to_string()),
            );
            let model = active.update(&db_tx).await?;

            Ok(FinancialProfile::from(model))
        })
    }

    /// Builds the advice snapshot for `user_id` as of `now`.
    ///
    /// Aggregates are refreshed first, in the same DB transaction.
    pub async fn financial_summary(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<FinancialSummary> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let profile = FinancialProfile::from(self.refresh_aggregates(&db_tx, user_id).await?);

            let month = YearMonth::of(now);
            let month_start = month.start()?;
            let next_month_start = month.shift(1).start()?;
            let rows = self.ledger_rows(&db_tx, user_id, Some(month_start)).await?;
            let (month_income, month_outcome) =
                sum_by_kind(rows.iter().filter(|row| row.created_at < next_month_start))?;

            Ok(FinancialSummary {
                user_id,
                balance: MoneyCents::new(user.balance_minor),
                month_income,
                month_outcome,
                total_income: profile.total_income,
                total_outcome: profile.total_outcome,
                declared_monthly_income: profile.monthly_income,
                current_savings: profile.current_savings,
                debt: profile.debt,
                financial_goals: profile.financial_goals,
                risk_management: profile.risk_management,
            })
        })
    }
}
