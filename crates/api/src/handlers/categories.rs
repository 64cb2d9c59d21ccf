use axum::extract::State;
use axum::Json;
use scrapedesk_core::category::Category;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Every category, for the job picker. Any signed-in user may list them.
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = state.categories.list().await?;
    Ok(Json(DataResponse { data: categories }))
}
