//! 报名 HTTP 路由处理函数。

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    api::{error::ApiError, response::ok_response, types::RegisterRequest},
    state::AppState,
};

/// 自助报名。
pub(crate) async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.register_guest(&req).await?;
    Ok(ok_response(
        "Thanks for registering",
        "We will review your request and get back to you",
        data,
    ))
}
