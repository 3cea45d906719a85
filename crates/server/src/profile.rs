//! Financial profile API endpoints

use api_types::profile::{
    FinancialProfileUpdate, FinancialProfileView, FinancialSummaryView, RiskManagement as ApiRisk,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::{
    EngineError, FinancialProfile, MoneyCents, RiskManagement, UpdateFinancialProfileCmd, User,
};

use crate::{ServerError, server::ServerState};

fn map_risk(risk: RiskManagement) -> ApiRisk {
    match risk {
        RiskManagement::Low => ApiRisk::Low,
        RiskManagement::Medium => ApiRisk::Medium,
        RiskManagement::High => ApiRisk::High,
    }
}

fn parse_risk(risk: ApiRisk) -> RiskManagement {
    match risk {
        ApiRisk::Low => RiskManagement::Low,
        ApiRisk::Medium => RiskManagement::Medium,
        ApiRisk::High => RiskManagement::High,
    }
}

pub(crate) fn profile_view(profile: FinancialProfile) -> FinancialProfileView {
    FinancialProfileView {
        monthly_income_minor: profile.monthly_income.map(MoneyCents::cents),
        current_savings_minor: profile.current_savings.map(MoneyCents::cents),
        debt_minor: profile.debt.map(MoneyCents::cents),
        financial_goals: profile.financial_goals,
        risk_management: profile.risk_management.map(map_risk),
        total_income_minor: profile.total_income.cents(),
        total_outcome_minor: profile.total_outcome.cents(),
    }
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<FinancialProfileView>, ServerError> {
    let profile = state
        .engine
        .financial_profile(user.id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("financial profile".to_string()))?;

    Ok(Json(profile_view(profile)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<FinancialProfileUpdate>,
) -> Result<Json<FinancialProfileView>, ServerError> {
    let cmd = UpdateFinancialProfileCmd {
        user_id: user.id,
        monthly_income: payload.monthly_income_minor.map(MoneyCents::new),
        current_savings: payload.current_savings_minor.map(MoneyCents::new),
        debt: payload.debt_minor.map(MoneyCents::new),
        financial_goals: payload.financial_goals,
        risk_management: payload.risk_management.map(parse_risk),
    };
    let profile = state.engine.update_financial_profile(cmd).await?;

    Ok(Json(profile_view(profile)))
}

/// Snapshot of the caller's finances for advice (current month, totals and
/// declared profile).
pub async fn summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<FinancialSummaryView>, ServerError> {
    let summary = state.engine.financial_summary(user.id, Utc::now()).await?;

    Ok(Json(FinancialSummaryView {
        balance_minor: summary.balance.cents(),
        month_income_minor: summary.month_income.cents(),
        month_outcome_minor: summary.month_outcome.cents(),
        total_income_minor: summary.total_income.cents(),
        total_outcome_minor: summary.total_outcome.cents(),
        declared_monthly_income_minor: summary.declared_monthly_income.map(MoneyCents::cents),
        current_savings_minor: summary.current_savings.map(MoneyCents::cents),
        debt_minor: summary.debt.map(MoneyCents::cents),
        financial_goals: summary.financial_goals,
        risk_management: summary.risk_management.map(map_risk),
    }))
}
