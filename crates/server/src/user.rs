//! User API endpoints

use api_types::user::{UserUpdate, UserView};
use axum::{Extension, Json, extract::State};
use engine::{UpdateUserCmd, User, UserDetail};

use crate::{ServerError, profile::profile_view, server::ServerState};

fn user_view(detail: UserDetail) -> UserView {
    UserView {
        id: detail.user.id,
        username: detail.user.username,
        full_name: detail.user.full_name,
        age: detail.user.age,
        balance_minor: detail.user.balance.cents(),
        financial_profile: detail.profile.map(profile_view),
    }
}

/// Returns the authenticated user with their financial profile.
pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let detail = state.engine.user_detail(user.id).await?;

    Ok(Json(user_view(detail)))
}

/// Edits username, full name and age. The balance only moves through
/// transactions.
pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let cmd = UpdateUserCmd {
        user_id: user.id,
        username: payload.username,
        full_name: payload.full_name,
        age: payload.age,
    };
    state.engine.update_user(cmd).await?;
    let detail = state.engine.user_detail(user.id).await?;

    Ok(Json(user_view(detail)))
}
