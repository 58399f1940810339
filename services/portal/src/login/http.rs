//! 登录 HTTP 路由处理函数。

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect},
};

use crate::{
    api::{
        error::ApiError,
        response::ok_response,
        types::{LoginQuery, LoginRequest, RequestCodeRequest},
    },
    state::AppState,
};

/// 申请 access code：校验邮箱并发送登录邮件。
pub(crate) async fn request_code_handler(
    State(state): State<AppState>,
    Json(req): Json<RequestCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.request_access_code(&req).await?;
    Ok(ok_response("Activation code sent", "Check your e-mail", data))
}

/// access code 登录（JSON）：返回宾客信息并下发会话 cookie。
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.login_with_access_code(&req).await?;
    let cookie = state.session_cookie_for(data.guest_id, &data.language);
    let message = format!("Welcome back {}!", data.display_name);
    Ok((
        [(SET_COOKIE, cookie)],
        ok_response(message, "Continue to the site", data),
    ))
}

/// 邮件登录链接落地：`/login?access_code=..&next=..`，成功后 303 跳转。
pub(crate) async fn login_link_handler(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.login_with_access_code(&query.into()).await?;
    let cookie = state.session_cookie_for(data.guest_id, &data.language);
    Ok(([(SET_COOKIE, cookie)], Redirect::to(&data.redirect_to)))
}

/// 当前会话宾客。
pub(crate) async fn me_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.current_guest(&headers).await?;
    Ok(ok_response("Logged in", "", data))
}
