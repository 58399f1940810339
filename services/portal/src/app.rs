//! Portal 应用装配：路由、CORS 与监听。

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{
    config::PortalConfig,
    login::{login_handler, login_link_handler, me_handler, request_code_handler},
    registration::register_handler,
    state::AppState,
};

/// Portal 入口：装配状态并启动 HTTP 路由。
pub(crate) async fn run(config: PortalConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    info!(
        "loaded {} guests from {}",
        state.guest_count().await,
        config.guest_store_path.display()
    );

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!(
        "portal listening on {}, access codes valid for {} days",
        config.addr, config.token_max_age_days
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// 路由表。
pub(crate) fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", get(login_link_handler))
        .route("/v1/login", post(login_handler))
        .route("/v1/login/request-code", post(request_code_handler))
        .route("/v1/me", get(me_handler))
        .route("/v1/register", post(register_handler))
        .layer(cors)
        .with_state(state)
}

/// 健康检查接口。
async fn healthz() -> &'static str {
    "ok"
}
