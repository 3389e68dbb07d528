use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app::App;
use crate::content::Post;
use crate::error::Result;
use crate::store::PostStore;

#[derive(Debug, Serialize)]
pub struct PostRef {
    pub slug: String,
}

fn posts(app: &App) -> Result<PostStore<crate::github::GithubContents>> {
    Ok(PostStore::new(app.contents()?, app.posts_storage()))
}

/// 文章列表，按日期倒序。
pub async fn list(State(app): State<App>) -> Result<Json<Vec<Post>>> {
    posts(&app)?.list().await.map(Json)
}

/// 按 slug 获取单篇文章。
pub async fn get_one(
    Path(slug): Path<String>,
    State(app): State<App>,
) -> Result<Json<Post>> {
    posts(&app)?.get(&slug).await.map(Json)
}

/// 新建文章。
pub async fn create(
    State(app): State<App>,
    Json(post): Json<Post>,
) -> Result<(StatusCode, Json<PostRef>)> {
    let slug = posts(&app)?.create(post).await?;
    Ok((StatusCode::CREATED, Json(PostRef { slug })))
}

/// 整体覆盖一篇文章。
pub async fn update(
    Path(slug): Path<String>,
    State(app): State<App>,
    Json(post): Json<Post>,
) -> Result<Json<PostRef>> {
    let slug = posts(&app)?.update(&slug, post).await?;
    Ok(Json(PostRef { slug }))
}

/// 删除文章，Markdown 模式返回 501。
pub async fn remove(
    Path(slug): Path<String>,
    State(app): State<App>,
) -> Result<StatusCode> {
    posts(&app)?.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
