//! Statistics API endpoints

use api_types::stats::{HistoryQuery, MonthlyTotalsView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::User;

use crate::{ServerError, server::ServerState};

const DEFAULT_HISTORY_MONTHS: u32 = 5;

/// Handle requests for the monthly income/outcome history of the caller
pub async fn history(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MonthlyTotalsView>>, ServerError> {
    let months = query.months.unwrap_or(DEFAULT_HISTORY_MONTHS);
    let history = state
        .engine
        .monthly_history(user.id, months, Utc::now())
        .await?;

    Ok(Json(
        history
            .into_iter()
            .map(|month| MonthlyTotalsView {
                month: month.month,
                income_minor: month.income.cents(),
                outcome_minor: month.outcome.cents(),
            })
            .collect(),
    ))
}
