mod categories;
mod config;
mod posts;
mod settings;
mod uploads;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::app::App;

/// 配置后台管理路由。
///
/// 所有数据路由在未配置仓库时返回 401，不发起网络请求。
pub fn setup_route(app: App) -> Router {
    Router::new()
        .route("/config", get(config::status).post(config::configure))
        .route("/logout", post(config::logout))
        .route("/posts", get(posts::list).post(posts::create))
        .route(
            "/posts/{slug}",
            get(posts::get_one)
                .put(posts::update)
                .delete(posts::remove),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/settings", get(settings::get).put(settings::update))
        .route("/uploads", post(uploads::upload))
        .with_state(app)
}

pub async fn run_server(app: App) {
    let router = add_middlewares(setup_route(app));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("Listening on :3000");
    axum::serve(listener, router).await.unwrap();
}

fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(TraceLayer::new_for_http().on_failure(log_failure))
}
